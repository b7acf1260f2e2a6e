/// State management module
///
/// This module handles all application state, including:
/// - Text scratchpad buffer and derived statistics (scratchpad.rs)
/// - Crop session parameters: zoom, aspect, format (cropper.rs)
/// - Crop rectangle selection and drag handling (selection.rs)

pub mod cropper;
pub mod scratchpad;
pub mod selection;
