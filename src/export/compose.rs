/// Crop raster extraction and padded compositing
///
/// Pure raster operations: cut the crop rectangle out of the source, and when
/// the view is zoomed out, composite it centred on a larger black canvas. The
/// padding width follows the zoom factor: `(1 - zoom) * 50` pixels per side
/// below 1.0, nothing at or above it.
use image::{imageops, Rgba, RgbaImage};

use crate::state::selection::CropRect;

/// Padding per zoom step below 1.0, in pixels
const PADDING_BASE: f32 = 50.0;

/// Fill colour for the padded canvas (opaque black)
pub const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Padding in pixels for the given zoom factor
pub fn padding_for_zoom(zoom: f32) -> u32 {
    if zoom < 1.0 {
        ((1.0 - zoom) * PADDING_BASE).round() as u32
    } else {
        0
    }
}

/// Cut the crop rectangle out of the source raster
///
/// Returns `None` when the rectangle rounds to nothing.
pub fn extract_crop(source: &RgbaImage, region: CropRect) -> Option<RgbaImage> {
    let (x, y, w, h) = region.to_pixels(source.width(), source.height())?;
    Some(imageops::crop_imm(source, x, y, w, h).to_image())
}

/// Composite the crop centred on a black canvas grown by `padding` per side
pub fn pad_centered(crop: RgbaImage, padding: u32) -> RgbaImage {
    if padding == 0 {
        return crop;
    }

    let mut canvas = RgbaImage::from_pixel(
        crop.width() + 2 * padding,
        crop.height() + 2 * padding,
        BACKGROUND,
    );
    imageops::overlay(&mut canvas, &crop, i64::from(padding), i64::from(padding));
    canvas
}

/// Full compositing step: crop, then pad according to the zoom factor
pub fn compose(source: &RgbaImage, region: CropRect, zoom: f32) -> Option<RgbaImage> {
    let crop = extract_crop(source, region)?;
    Some(pad_centered(crop, padding_for_zoom(zoom)))
}
