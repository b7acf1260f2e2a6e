/// Crop export module
///
/// This module handles:
/// - Extracting the crop rectangle from the source raster
/// - Compositing the crop onto a padded background when zoomed out
/// - Encoding to PNG/JPEG/WEBP and writing the output file

pub mod compose;
pub mod encode;
