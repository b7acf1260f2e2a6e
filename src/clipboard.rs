/// OS clipboard access
///
/// Thin async wrappers around `arboard`. The clipboard connection is created
/// per call: it is cheap, and `arboard::Clipboard` is not `Send`, so it cannot
/// cross the `spawn_blocking` boundary anyway. Each operation either completes
/// or fails with a `ClipboardError`; callers surface failures as a status
/// notice and leave their state untouched.
use std::borrow::Cow;

use arboard::{Clipboard, ImageData};
use image::RgbaImage;
use thiserror::Error;
use tokio::task;

/// Failures while talking to the OS clipboard
#[derive(Debug, Clone, Error)]
pub enum ClipboardError {
    /// The clipboard could not be opened or the platform denied access
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    /// The clipboard holds no text
    #[error("no text found in the clipboard")]
    NoText,
    /// The clipboard holds no image
    #[error("no image found in the clipboard")]
    NoImage,
    /// The clipboard reported an image that could not be decoded
    #[error("clipboard image could not be decoded")]
    InvalidImage,
    /// The blocking clipboard task was cancelled or panicked
    #[error("clipboard task failed: {0}")]
    TaskJoin(String),
}

/// Read the clipboard's plain-text contents
pub async fn read_text() -> Result<String, ClipboardError> {
    run_blocking(|| {
        let mut clipboard = open()?;
        clipboard.get_text().map_err(|e| match e {
            arboard::Error::ContentNotAvailable => ClipboardError::NoText,
            other => ClipboardError::Unavailable(other.to_string()),
        })
    })
    .await
}

/// Replace the clipboard contents with the given text
pub async fn write_text(text: String) -> Result<(), ClipboardError> {
    run_blocking(move || {
        let mut clipboard = open()?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    })
    .await
}

/// Read the first image on the clipboard, decoded to RGBA
pub async fn read_image() -> Result<RgbaImage, ClipboardError> {
    run_blocking(|| {
        let mut clipboard = open()?;
        let data = clipboard.get_image().map_err(|e| match e {
            arboard::Error::ContentNotAvailable => ClipboardError::NoImage,
            arboard::Error::ConversionFailure => ClipboardError::InvalidImage,
            other => ClipboardError::Unavailable(other.to_string()),
        })?;
        decode_image_data(data)
    })
    .await
}

/// Put an RGBA raster on the clipboard
pub async fn write_image(image: RgbaImage) -> Result<(), ClipboardError> {
    run_blocking(move || {
        let mut clipboard = open()?;
        clipboard
            .set_image(encode_image_data(image))
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    })
    .await
}

/// Run a blocking clipboard operation off the UI thread
async fn run_blocking<T, F>(f: F) -> Result<T, ClipboardError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ClipboardError> + Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| ClipboardError::TaskJoin(e.to_string()))?
}

fn open() -> Result<Clipboard, ClipboardError> {
    Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))
}

/// Convert arboard's RGBA byte layout into an `image` raster
fn decode_image_data(data: ImageData<'_>) -> Result<RgbaImage, ClipboardError> {
    let width = u32::try_from(data.width).map_err(|_| ClipboardError::InvalidImage)?;
    let height = u32::try_from(data.height).map_err(|_| ClipboardError::InvalidImage)?;

    RgbaImage::from_raw(width, height, data.bytes.into_owned())
        .ok_or(ClipboardError::InvalidImage)
}

/// Convert an `image` raster into arboard's clipboard layout
fn encode_image_data(image: RgbaImage) -> ImageData<'static> {
    ImageData {
        width: image.width() as usize,
        height: image.height() as usize,
        bytes: Cow::Owned(image.into_raw()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rejects_short_buffer() {
        let data = ImageData {
            width: 4,
            height: 4,
            bytes: Cow::Owned(vec![0u8; 7]),
        };
        assert!(matches!(
            decode_image_data(data),
            Err(ClipboardError::InvalidImage)
        ));
    }

    #[test]
    fn test_decode_matches_dimensions() {
        let data = ImageData {
            width: 3,
            height: 2,
            bytes: Cow::Owned(vec![128u8; 3 * 2 * 4]),
        };
        let image = decode_image_data(data).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.get_pixel(2, 1), &image::Rgba([128, 128, 128, 128]));
    }

    #[test]
    fn test_encode_preserves_layout() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, image::Rgba([1, 2, 3, 4]));
        image.put_pixel(1, 0, image::Rgba([5, 6, 7, 8]));

        let data = encode_image_data(image);
        assert_eq!((data.width, data.height), (2, 1));
        assert_eq!(data.bytes.as_ref(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
