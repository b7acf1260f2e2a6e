/// User interface module
///
/// View builders for the two tools plus the interactive crop canvas:
/// - Scratchpad layout: gutter, editor, statistics, actions (scratchpad.rs)
/// - Cropper layout: controls, stage, zoom and export actions (cropper.rs)
/// - Crop canvas program: drawing and mouse handling (crop_canvas.rs)

pub mod crop_canvas;
pub mod cropper;
pub mod scratchpad;
