/// Image encoding and file export
///
/// Encoding runs on `tokio::task::spawn_blocking` because the codecs are
/// CPU-bound; the file write itself goes through `tokio::fs`. PNG and WEBP
/// are lossless; JPEG uses a fixed quality of 92 and flattens transparency
/// onto the black export background first, since JPEG has no alpha channel.
use std::io::Cursor;
use std::path::PathBuf;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use thiserror::Error;
use tokio::task;

use crate::export::compose;
use crate::state::cropper::ExportFormat;
use crate::state::selection::CropRect;

/// Fixed JPEG quality factor
const JPEG_QUALITY: u8 = 92;

/// Failures in the export pipeline
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// The crop rectangle is missing or rounds to zero pixels
    #[error("nothing to export: the crop selection is empty")]
    EmptySelection,
    /// The codec rejected the raster
    #[error("failed to encode image: {0}")]
    Encode(String),
    /// Writing the output file failed
    #[error("failed to write {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
    /// The blocking encode task was cancelled or panicked
    #[error("export task failed: {0}")]
    TaskJoin(String),
}

/// Composite the current crop off the UI thread
///
/// Shared by file export and clipboard copy: both operate on the same padded
/// raster.
pub async fn composed_crop(
    source: RgbaImage,
    region: CropRect,
    zoom: f32,
) -> Result<RgbaImage, ExportError> {
    task::spawn_blocking(move || {
        compose::compose(&source, region, zoom).ok_or(ExportError::EmptySelection)
    })
    .await
    .map_err(|e| ExportError::TaskJoin(e.to_string()))?
}

/// Composite, encode, and write the crop to `path`
pub async fn export_image(
    source: RgbaImage,
    region: CropRect,
    zoom: f32,
    format: ExportFormat,
    path: PathBuf,
) -> Result<PathBuf, ExportError> {
    let bytes = task::spawn_blocking(move || {
        let composed =
            compose::compose(&source, region, zoom).ok_or(ExportError::EmptySelection)?;
        encode(&composed, format)
    })
    .await
    .map_err(|e| ExportError::TaskJoin(e.to_string()))??;

    write_file(path, bytes).await
}

/// Write the scratchpad buffer to `path`
pub async fn export_text(text: String, path: PathBuf) -> Result<PathBuf, ExportError> {
    write_file(path, text.into_bytes()).await
}

async fn write_file(path: PathBuf, bytes: Vec<u8>) -> Result<PathBuf, ExportError> {
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| ExportError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
    Ok(path)
}

/// Encode a raster in the selected output format
pub fn encode(image: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    let (width, height) = image.dimensions();

    match format {
        ExportFormat::Png => PngEncoder::new(Cursor::new(&mut bytes))
            .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
            .map_err(|e| ExportError::Encode(e.to_string()))?,
        ExportFormat::Jpeg => {
            let flat = flatten_onto_background(image);
            JpegEncoder::new_with_quality(Cursor::new(&mut bytes), JPEG_QUALITY)
                .write_image(flat.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| ExportError::Encode(e.to_string()))?
        }
        ExportFormat::Webp => WebPEncoder::new_lossless(Cursor::new(&mut bytes))
            .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
            .map_err(|e| ExportError::Encode(e.to_string()))?,
    }

    Ok(bytes)
}

/// Drop the alpha channel by compositing over the export background
fn flatten_onto_background(image: &RgbaImage) -> RgbImage {
    let background = compose::BACKGROUND;
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        let alpha = u16::from(pixel[3]);
        let blend = |fg: u8, bg: u8| {
            ((u16::from(fg) * alpha + u16::from(bg) * (255 - alpha)) / 255) as u8
        };
        image::Rgb([
            blend(pixel[0], background[0]),
            blend(pixel[1], background[1]),
            blend(pixel[2], background[2]),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(6, 4, |x, y| image::Rgba([x as u8 * 40, y as u8 * 60, 9, 255]))
    }

    #[test]
    fn test_png_magic_bytes() {
        let bytes = encode(&sample(), ExportFormat::Png).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_jpeg_magic_bytes() {
        let bytes = encode(&sample(), ExportFormat::Jpeg).unwrap();
        assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_webp_magic_bytes() {
        let bytes = encode(&sample(), ExportFormat::Webp).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn test_flatten_blends_alpha_onto_black() {
        let mut image = RgbaImage::new(1, 1);
        image.put_pixel(0, 0, image::Rgba([200, 100, 50, 127]));

        let flat = flatten_onto_background(&image);
        let pixel = flat.get_pixel(0, 0);
        // 127/255 of each channel survives against black
        assert_eq!(pixel, &image::Rgb([99, 49, 24]));
    }

    #[tokio::test]
    async fn test_export_with_empty_selection_fails() {
        let result = export_image(
            sample(),
            CropRect::default(),
            1.0,
            ExportFormat::Png,
            std::env::temp_dir().join("never-written.png"),
        )
        .await;

        assert!(matches!(result, Err(ExportError::EmptySelection)));
    }

    #[tokio::test]
    async fn test_export_text_writes_exact_bytes() {
        let path = std::env::temp_dir().join("clip-playground-text-export-test.txt");
        let written = export_text("alpha\nbeta".to_string(), path.clone())
            .await
            .unwrap();

        assert_eq!(written, path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "alpha\nbeta");
        let _ = std::fs::remove_file(&path);
    }
}
