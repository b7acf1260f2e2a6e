/// Interactive crop canvas
///
/// A `canvas::Program` that draws the pasted image under the current view
/// transform and the crop selection on top of it: dimmed surround, white
/// border, thirds guides, and eight drag handles. Mouse input maps back
/// through the same transform: left drag sweeps, resizes, or moves the
/// selection, right drag pans, and the wheel zooms.
use cgmath::Vector2;
use iced::advanced::image as raster;
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::state::cropper::SourceImage;
use crate::state::selection::{CropRect, CropSelection, DragHandle};
use crate::Message;

/// Drawn size of a drag handle, in screen pixels
const HANDLE_SIZE: f32 = 8.0;
/// Hit-test radius around a handle centre, in screen pixels
const HANDLE_HIT_SIZE: f32 = 12.0;
/// Dim layer over everything outside the selection
const OVERLAY_COLOR: Color = Color::from_rgba(0.0, 0.0, 0.0, 0.5);
/// Thirds guide lines inside the selection
const GUIDE_COLOR: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.3);
const BORDER_COLOR: Color = Color::WHITE;
const BORDER_WIDTH: f32 = 2.0;

/// Mapping between canvas (screen) and image pixel coordinates
///
/// The image is fit-scaled into the canvas, multiplied by the zoom factor,
/// centred, and shifted by the pan offset.
#[derive(Debug, Clone, Copy)]
pub struct ViewTransform {
    scale: f32,
    origin: Point,
}

impl ViewTransform {
    pub fn new(
        canvas_size: Size,
        img_width: f32,
        img_height: f32,
        zoom: f32,
        pan: Vector2<f32>,
    ) -> Self {
        let fit = (canvas_size.width / img_width).min(canvas_size.height / img_height);
        let scale = fit * zoom;
        let origin = Point::new(
            (canvas_size.width - img_width * scale) / 2.0 + pan.x,
            (canvas_size.height - img_height * scale) / 2.0 + pan.y,
        );
        Self { scale, origin }
    }

    /// Image pixel position to canvas coordinates
    pub fn to_canvas(&self, x: f32, y: f32) -> Point {
        Point::new(self.origin.x + x * self.scale, self.origin.y + y * self.scale)
    }

    /// Canvas position to image pixel coordinates (unclamped)
    pub fn to_image(&self, position: Point) -> (f32, f32) {
        (
            (position.x - self.origin.x) / self.scale,
            (position.y - self.origin.y) / self.scale,
        )
    }

    /// Crop rectangle to a canvas-space rectangle
    pub fn rect_to_canvas(&self, rect: CropRect) -> Rectangle {
        Rectangle::new(
            self.to_canvas(rect.x, rect.y),
            Size::new(rect.width * self.scale, rect.height * self.scale),
        )
    }
}

/// Per-widget interaction state (right-button panning only; selection drags
/// live in the application state)
#[derive(Debug, Clone, Default)]
pub struct PanState {
    pub is_panning: bool,
    pub last_position: Option<Point>,
}

/// Canvas program for one frame of the crop view
pub struct CropCanvas<'a> {
    source: &'a SourceImage,
    selection: &'a CropSelection,
    zoom: f32,
    pan: Vector2<f32>,
}

impl<'a> CropCanvas<'a> {
    pub fn new(
        source: &'a SourceImage,
        selection: &'a CropSelection,
        zoom: f32,
        pan: Vector2<f32>,
    ) -> Self {
        Self {
            source,
            selection,
            zoom,
            pan,
        }
    }

    fn transform(&self, canvas_size: Size) -> ViewTransform {
        ViewTransform::new(
            canvas_size,
            self.source.width() as f32,
            self.source.height() as f32,
            self.zoom,
            self.pan,
        )
    }

    /// Handle centre points in canvas coordinates
    fn handle_positions(rect: Rectangle) -> [(Point, DragHandle); 8] {
        let center_x = rect.x + rect.width / 2.0;
        let center_y = rect.y + rect.height / 2.0;
        let right = rect.x + rect.width;
        let bottom = rect.y + rect.height;

        [
            (Point::new(rect.x, rect.y), DragHandle::TopLeft),
            (Point::new(right, rect.y), DragHandle::TopRight),
            (Point::new(rect.x, bottom), DragHandle::BottomLeft),
            (Point::new(right, bottom), DragHandle::BottomRight),
            (Point::new(center_x, rect.y), DragHandle::Top),
            (Point::new(center_x, bottom), DragHandle::Bottom),
            (Point::new(rect.x, center_y), DragHandle::Left),
            (Point::new(right, center_y), DragHandle::Right),
        ]
    }

    /// Which part of the selection a canvas-space point grabs
    fn hit_test(&self, position: Point, transform: &ViewTransform) -> DragHandle {
        let Some(region) = self.selection.region else {
            return DragHandle::None;
        };
        let rect = transform.rect_to_canvas(region);

        for (center, handle) in Self::handle_positions(rect) {
            if (position.x - center.x).abs() <= HANDLE_HIT_SIZE
                && (position.y - center.y).abs() <= HANDLE_HIT_SIZE
            {
                return handle;
            }
        }

        if rect.contains(position) {
            return DragHandle::Move;
        }

        DragHandle::None
    }

    fn draw_dim_layer(&self, frame: &mut canvas::Frame, selection: Rectangle) {
        let size = frame.size();
        // Selection may hang off the canvas while zoomed in
        let sel_top = selection.y.clamp(0.0, size.height);
        let sel_bottom = (selection.y + selection.height).clamp(sel_top, size.height);
        let sel_left = selection.x.clamp(0.0, size.width);
        let sel_right = (selection.x + selection.width).clamp(sel_left, size.width);

        // Four strips around the selection
        if sel_top > 0.0 {
            frame.fill_rectangle(Point::ORIGIN, Size::new(size.width, sel_top), OVERLAY_COLOR);
        }
        if sel_bottom < size.height {
            frame.fill_rectangle(
                Point::new(0.0, sel_bottom),
                Size::new(size.width, size.height - sel_bottom),
                OVERLAY_COLOR,
            );
        }
        if sel_left > 0.0 {
            frame.fill_rectangle(
                Point::new(0.0, sel_top),
                Size::new(sel_left, sel_bottom - sel_top),
                OVERLAY_COLOR,
            );
        }
        if sel_right < size.width {
            frame.fill_rectangle(
                Point::new(sel_right, sel_top),
                Size::new(size.width - sel_right, sel_bottom - sel_top),
                OVERLAY_COLOR,
            );
        }
    }

    fn draw_guides(&self, frame: &mut canvas::Frame, rect: Rectangle) {
        let mut builder = canvas::path::Builder::new();
        for i in 1..3 {
            let x = rect.x + rect.width * i as f32 / 3.0;
            builder.move_to(Point::new(x, rect.y));
            builder.line_to(Point::new(x, rect.y + rect.height));

            let y = rect.y + rect.height * i as f32 / 3.0;
            builder.move_to(Point::new(rect.x, y));
            builder.line_to(Point::new(rect.x + rect.width, y));
        }
        frame.stroke(
            &builder.build(),
            Stroke::default().with_color(GUIDE_COLOR).with_width(1.0),
        );
    }
}

impl Program<Message> for CropCanvas<'_> {
    type State = PanState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let transform = self.transform(bounds.size());

        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::BLACK);

        // Source image under the view transform
        let image_rect = Rectangle::new(
            transform.to_canvas(0.0, 0.0),
            Size::new(
                self.source.width() as f32 * transform.scale,
                self.source.height() as f32 * transform.scale,
            ),
        );
        let mut image = raster::Image::new(self.source.handle.clone());
        image.filter_method = raster::FilterMethod::Linear;
        frame.draw_image(image_rect, image);

        // Selection overlay
        if let Some(region) = self.selection.region {
            let rect = transform.rect_to_canvas(region);

            self.draw_dim_layer(&mut frame, rect);
            frame.stroke(
                &Path::rectangle(rect.position(), rect.size()),
                Stroke::default()
                    .with_color(BORDER_COLOR)
                    .with_width(BORDER_WIDTH),
            );
            self.draw_guides(&mut frame, rect);

            for (center, _handle) in Self::handle_positions(rect) {
                frame.fill_rectangle(
                    Point::new(center.x - HANDLE_SIZE / 2.0, center.y - HANDLE_SIZE / 2.0),
                    Size::new(HANDLE_SIZE, HANDLE_SIZE),
                    BORDER_COLOR,
                );
            }
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let transform = self.transform(bounds.size());

        match event {
            // Mouse wheel zooms, matching the slider's clamped range
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if cursor.position_in(bounds).is_some() {
                    let zoom_delta = match delta {
                        mouse::ScrollDelta::Lines { y, .. } => y * 0.1,
                        mouse::ScrollDelta::Pixels { y, .. } => y * 0.01,
                    };
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::ZoomDelta(zoom_delta)),
                    );
                }
            }

            // Left press starts a selection gesture
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    let handle = self.hit_test(position, &transform);
                    let (x, y) = transform.to_image(position);
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::CropDragStart { handle, x, y }),
                    );
                }
            }

            // Right press starts a pan
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Right)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    state.is_panning = true;
                    state.last_position = Some(position);
                    return (canvas::event::Status::Captured, None);
                }
            }

            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if state.is_panning {
                    if let (Some(position), Some(last)) =
                        (cursor.position_in(bounds), state.last_position)
                    {
                        state.last_position = Some(position);
                        let delta = Vector2::new(position.x - last.x, position.y - last.y);
                        return (canvas::event::Status::Captured, Some(Message::Pan(delta)));
                    }
                } else if self.selection.is_dragging {
                    if let Some(position) = cursor.position_in(bounds) {
                        let (x, y) = transform.to_image(position);
                        return (
                            canvas::event::Status::Captured,
                            Some(Message::CropDragMove { x, y }),
                        );
                    }
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if self.selection.is_dragging {
                    return (canvas::event::Status::Captured, Some(Message::CropDragEnd));
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Right)) => {
                if state.is_panning {
                    state.is_panning = false;
                    state.last_position = None;
                    return (canvas::event::Status::Captured, None);
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if state.is_panning {
            return mouse::Interaction::Grabbing;
        }
        let Some(position) = cursor.position_in(bounds) else {
            return mouse::Interaction::default();
        };

        match self.hit_test(position, &self.transform(bounds.size())) {
            DragHandle::None => mouse::Interaction::Crosshair,
            DragHandle::Move => mouse::Interaction::Grab,
            DragHandle::Top | DragHandle::Bottom => mouse::Interaction::ResizingVertically,
            DragHandle::Left | DragHandle::Right => mouse::Interaction::ResizingHorizontally,
            _ => mouse::Interaction::Crosshair,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_centres_fitted_image() {
        // 800x600 canvas, 400x300 image, zoom 1 -> fit scale 2, no margin
        let t = ViewTransform::new(
            Size::new(800.0, 600.0),
            400.0,
            300.0,
            1.0,
            Vector2::new(0.0, 0.0),
        );
        assert_eq!(t.to_canvas(0.0, 0.0), Point::new(0.0, 0.0));
        assert_eq!(t.to_canvas(400.0, 300.0), Point::new(800.0, 600.0));
    }

    #[test]
    fn test_transform_zoom_out_adds_margins() {
        let t = ViewTransform::new(
            Size::new(800.0, 600.0),
            400.0,
            300.0,
            0.5,
            Vector2::new(0.0, 0.0),
        );
        // Image occupies the central quarter
        assert_eq!(t.to_canvas(0.0, 0.0), Point::new(200.0, 150.0));
        assert_eq!(t.to_canvas(400.0, 300.0), Point::new(600.0, 450.0));
    }

    #[test]
    fn test_transform_round_trip() {
        let t = ViewTransform::new(
            Size::new(640.0, 480.0),
            800.0,
            600.0,
            1.3,
            Vector2::new(12.0, -7.0),
        );
        let point = t.to_canvas(123.0, 456.0);
        let (x, y) = t.to_image(point);
        assert!((x - 123.0).abs() < 0.001);
        assert!((y - 456.0).abs() < 0.001);
    }

    #[test]
    fn test_rect_to_canvas_scales_dimensions() {
        let t = ViewTransform::new(
            Size::new(800.0, 600.0),
            400.0,
            300.0,
            1.0,
            Vector2::new(0.0, 0.0),
        );
        let rect = t.rect_to_canvas(CropRect::new(10.0, 20.0, 100.0, 50.0));
        assert_eq!(rect, Rectangle::new(Point::new(20.0, 40.0), Size::new(200.0, 100.0)));
    }
}
