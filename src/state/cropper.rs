/// Image crop playground state
///
/// Owns the pasted source image, the crop selection, and the view/export
/// parameters: aspect-ratio preset, clamped zoom, pan offset, and output
/// format. Everything resets on clear except the aspect and format choices.
use cgmath::Vector2;
use iced::widget::image::Handle;
use image::RgbaImage;

use crate::state::selection::{CropRect, CropSelection};

/// Zoom bounds for the crop view
pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 3.0;
const DEFAULT_ZOOM: f32 = 1.0;

/// Aspect-ratio presets for the crop rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    /// Unconstrained crop
    Free,
    Square,
    #[default]
    FourThirds,
    ThreeTwo,
    SixteenNine,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Free,
        AspectRatio::Square,
        AspectRatio::FourThirds,
        AspectRatio::ThreeTwo,
        AspectRatio::SixteenNine,
    ];

    /// Width over height, or `None` for a free crop
    pub fn ratio(&self) -> Option<f32> {
        match self {
            AspectRatio::Free => None,
            AspectRatio::Square => Some(1.0),
            AspectRatio::FourThirds => Some(4.0 / 3.0),
            AspectRatio::ThreeTwo => Some(3.0 / 2.0),
            AspectRatio::SixteenNine => Some(16.0 / 9.0),
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AspectRatio::Free => "Free",
            AspectRatio::Square => "1:1",
            AspectRatio::FourThirds => "4:3",
            AspectRatio::ThreeTwo => "3:2",
            AspectRatio::SixteenNine => "16:9",
        })
    }
}

/// Output encoding for exported crops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::Png,
        ExportFormat::Jpeg,
        ExportFormat::Webp,
    ];

    /// File extension used for the export filename
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Webp => "webp",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPG",
            ExportFormat::Webp => "WEBP",
        })
    }
}

/// A decoded clipboard image plus its display handle
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// RGBA raster used for cropping and export
    pub pixels: RgbaImage,
    /// iced handle for on-screen drawing
    pub handle: Handle,
}

impl SourceImage {
    pub fn new(pixels: RgbaImage) -> Self {
        let handle = Handle::from_rgba(pixels.width(), pixels.height(), pixels.to_vec());
        Self { pixels, handle }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// State for the image crop tool
pub struct CropperState {
    /// Pasted image, if any
    pub source: Option<SourceImage>,
    /// Crop rectangle and drag bookkeeping
    pub selection: CropSelection,
    /// Aspect constraint applied to the selection
    pub aspect: AspectRatio,
    /// View zoom, always within [`MIN_ZOOM`, `MAX_ZOOM`]
    pub zoom: f32,
    /// View pan offset in screen pixels
    pub pan: Vector2<f32>,
    /// Output encoding
    pub format: ExportFormat,
}

impl Default for CropperState {
    fn default() -> Self {
        Self {
            source: None,
            selection: CropSelection::default(),
            aspect: AspectRatio::default(),
            zoom: DEFAULT_ZOOM,
            pan: Vector2::new(0.0, 0.0),
            format: ExportFormat::default(),
        }
    }
}

impl CropperState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly pasted image and select the default crop
    ///
    /// The default crop is the largest centred rectangle satisfying the
    /// current aspect preset. View zoom and pan reset so the new image is
    /// fully visible.
    pub fn install_image(&mut self, pixels: RgbaImage) {
        let source = SourceImage::new(pixels);
        self.selection.reset();
        self.selection.region = Some(CropRect::fitted(
            source.width() as f32,
            source.height() as f32,
            self.aspect.ratio(),
        ));
        self.source = Some(source);
        self.zoom = DEFAULT_ZOOM;
        self.pan = Vector2::new(0.0, 0.0);
    }

    /// Change the aspect preset and re-derive the default crop
    pub fn set_aspect(&mut self, aspect: AspectRatio) {
        self.aspect = aspect;
        if let Some(source) = &self.source {
            self.selection.reset();
            self.selection.region = Some(CropRect::fitted(
                source.width() as f32,
                source.height() as f32,
                aspect.ratio(),
            ));
        }
    }

    /// Set the zoom, clamped to the allowed range
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Adjust the zoom by a wheel delta, clamped to the allowed range
    pub fn zoom_by(&mut self, delta: f32) {
        self.set_zoom(self.zoom + delta);
    }

    pub fn pan_by(&mut self, delta: Vector2<f32>) {
        self.pan += delta;
    }

    /// Drop the image and selection; zoom and pan reset, aspect and format
    /// choices survive
    pub fn clear(&mut self) {
        self.source = None;
        self.selection.reset();
        self.zoom = DEFAULT_ZOOM;
        self.pan = Vector2::new(0.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut state = CropperState::new();

        state.set_zoom(10.0);
        assert_eq!(state.zoom, MAX_ZOOM);

        state.set_zoom(0.01);
        assert_eq!(state.zoom, MIN_ZOOM);

        state.set_zoom(-4.0);
        assert_eq!(state.zoom, MIN_ZOOM);

        state.set_zoom(1.7);
        assert_eq!(state.zoom, 1.7);
    }

    #[test]
    fn test_zoom_by_accumulates_within_bounds() {
        let mut state = CropperState::new();
        for _ in 0..100 {
            state.zoom_by(0.1);
        }
        assert_eq!(state.zoom, MAX_ZOOM);

        for _ in 0..100 {
            state.zoom_by(-0.1);
        }
        assert_eq!(state.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_aspect_ratios() {
        assert_eq!(AspectRatio::Free.ratio(), None);
        assert_eq!(AspectRatio::Square.ratio(), Some(1.0));
        assert_eq!(AspectRatio::FourThirds.ratio(), Some(4.0 / 3.0));
        assert_eq!(AspectRatio::ThreeTwo.ratio(), Some(1.5));
        assert_eq!(AspectRatio::SixteenNine.ratio(), Some(16.0 / 9.0));
    }

    #[test]
    fn test_install_selects_default_crop() {
        let mut state = CropperState::new();
        state.set_zoom(2.0);
        state.install_image(checker(400, 300));

        // 4:3 default preset on a 4:3 image selects everything
        let region = state.selection.region.unwrap();
        assert_eq!(
            (region.x, region.y, region.width, region.height),
            (0.0, 0.0, 400.0, 300.0)
        );
        assert_eq!(state.zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn test_set_aspect_rederives_crop() {
        let mut state = CropperState::new();
        state.install_image(checker(400, 300));
        state.set_aspect(AspectRatio::Square);

        let region = state.selection.region.unwrap();
        assert_eq!(
            (region.x, region.y, region.width, region.height),
            (50.0, 0.0, 300.0, 300.0)
        );
    }

    #[test]
    fn test_clear_resets_image_and_zoom() {
        let mut state = CropperState::new();
        state.format = ExportFormat::Webp;
        state.install_image(checker(64, 64));
        state.set_zoom(2.5);

        state.clear();

        assert!(state.source.is_none());
        assert!(state.selection.region.is_none());
        assert_eq!(state.zoom, DEFAULT_ZOOM);
        // Format choice survives a clear
        assert_eq!(state.format, ExportFormat::Webp);
    }

    #[test]
    fn test_format_extensions() {
        assert_eq!(ExportFormat::Png.extension(), "png");
        assert_eq!(ExportFormat::Jpeg.extension(), "jpg");
        assert_eq!(ExportFormat::Webp.extension(), "webp");
    }
}
