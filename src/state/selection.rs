/// Crop rectangle selection
///
/// The selection lives in source-image pixel coordinates (f32 so drags stay
/// smooth at any zoom). Drag bookkeeping covers three gestures: sweeping out
/// a new rectangle, resizing via one of eight handles, and moving the whole
/// rectangle. Every update clamps to the image bounds, and an optional
/// width:height ratio is enforced while dragging.

/// Minimum selection edge, in image pixels
const MIN_SIZE: f32 = 1.0;

/// Which part of the selection a drag grabbed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragHandle {
    /// No handle: the drag sweeps out a new rectangle
    #[default]
    None,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
    /// Inside the rectangle: the drag moves it
    Move,
}

/// Crop rectangle in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Round to whole pixels, clamped to the image bounds
    ///
    /// Returns `None` when the rounded rectangle is degenerate.
    pub fn to_pixels(&self, img_width: u32, img_height: u32) -> Option<(u32, u32, u32, u32)> {
        let x = (self.x.round().max(0.0) as u32).min(img_width.saturating_sub(1));
        let y = (self.y.round().max(0.0) as u32).min(img_height.saturating_sub(1));
        let w = (self.width.round() as u32).min(img_width - x);
        let h = (self.height.round() as u32).min(img_height - y);

        (w > 0 && h > 0).then_some((x, y, w, h))
    }

    /// Largest rectangle of the given ratio that fits the image, centred
    ///
    /// With no ratio the whole image is selected. This is the default crop
    /// installed when an image is pasted or the aspect preset changes.
    pub fn fitted(img_width: f32, img_height: f32, ratio: Option<f32>) -> Self {
        match ratio {
            None => Self::new(0.0, 0.0, img_width, img_height),
            Some(r) => {
                let (w, h) = if img_width / img_height > r {
                    (img_height * r, img_height)
                } else {
                    (img_width, img_width / r)
                };
                Self::new((img_width - w) / 2.0, (img_height - h) / 2.0, w, h)
            }
        }
    }
}

/// Selection state plus in-flight drag bookkeeping
#[derive(Debug, Clone, Default)]
pub struct CropSelection {
    pub region: Option<CropRect>,
    pub is_dragging: bool,
    pub drag_handle: DragHandle,
    drag_start: Option<(f32, f32)>,
    drag_start_region: Option<CropRect>,
}

impl CropSelection {
    /// Begin sweeping out a new rectangle from the given point
    pub fn start_new_selection(&mut self, x: f32, y: f32) {
        self.region = Some(CropRect::new(x, y, 0.0, 0.0));
        self.is_dragging = true;
        self.drag_handle = DragHandle::None;
        self.drag_start = Some((x, y));
        self.drag_start_region = None;
    }

    /// Begin resizing or moving the existing rectangle
    pub fn start_handle_drag(&mut self, handle: DragHandle, x: f32, y: f32) {
        self.is_dragging = true;
        self.drag_handle = handle;
        self.drag_start = Some((x, y));
        self.drag_start_region = self.region;
    }

    pub fn end_drag(&mut self) {
        self.is_dragging = false;
        self.drag_handle = DragHandle::None;
        self.drag_start = None;
        self.drag_start_region = None;

        // Drop degenerate sweeps so a stray click doesn't leave a sliver
        if let Some(region) = self.region {
            if region.width < MIN_SIZE || region.height < MIN_SIZE {
                self.region = None;
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance the active drag to a new cursor position
    ///
    /// `ratio` locks the rectangle to a fixed width:height ratio while set.
    /// The rectangle never leaves `[0, img_width] x [0, img_height]`.
    pub fn update_drag(
        &mut self,
        x: f32,
        y: f32,
        img_width: f32,
        img_height: f32,
        ratio: Option<f32>,
    ) {
        if !self.is_dragging {
            return;
        }

        match self.drag_handle {
            DragHandle::None => {
                if let Some((start_x, start_y)) = self.drag_start {
                    self.region = Some(sweep_region(
                        start_x, start_y, x, y, img_width, img_height, ratio,
                    ));
                }
            }
            DragHandle::Move => {
                if let (Some((start_x, start_y)), Some(orig)) =
                    (self.drag_start, self.drag_start_region)
                {
                    let new_x = (orig.x + x - start_x).clamp(0.0, img_width - orig.width);
                    let new_y = (orig.y + y - start_y).clamp(0.0, img_height - orig.height);
                    self.region = Some(CropRect::new(new_x, new_y, orig.width, orig.height));
                }
            }
            handle => {
                if let (Some((start_x, start_y)), Some(orig)) =
                    (self.drag_start, self.drag_start_region)
                {
                    let dx = x - start_x;
                    let dy = y - start_y;
                    let resized = match ratio {
                        Some(r) => resize_locked(handle, orig, dx, dy, img_width, img_height, r),
                        None => resize_free(handle, orig, dx, dy, img_width, img_height),
                    };
                    self.region = Some(resized);
                }
            }
        }
    }
}

/// New-selection sweep from an anchor point to the cursor
fn sweep_region(
    anchor_x: f32,
    anchor_y: f32,
    x: f32,
    y: f32,
    img_width: f32,
    img_height: f32,
    ratio: Option<f32>,
) -> CropRect {
    let x = x.clamp(0.0, img_width);
    let y = y.clamp(0.0, img_height);

    match ratio {
        None => {
            let min_x = anchor_x.min(x);
            let min_y = anchor_y.min(y);
            CropRect::new(min_x, min_y, (x - anchor_x).abs(), (y - anchor_y).abs())
        }
        Some(r) => {
            // Drive the size by whichever axis the cursor moved further on,
            // then shrink to whatever fits on the anchor's side of the image.
            let dx = x - anchor_x;
            let dy = y - anchor_y;
            let avail_w = if dx >= 0.0 { img_width - anchor_x } else { anchor_x };
            let avail_h = if dy >= 0.0 { img_height - anchor_y } else { anchor_y };

            let w = dx.abs().max(dy.abs() * r).min(avail_w).min(avail_h * r);
            let h = w / r;

            let x0 = if dx >= 0.0 { anchor_x } else { anchor_x - w };
            let y0 = if dy >= 0.0 { anchor_y } else { anchor_y - h };
            CropRect::new(x0, y0, w, h)
        }
    }
}

/// Per-handle resize without an aspect constraint
fn resize_free(
    handle: DragHandle,
    orig: CropRect,
    dx: f32,
    dy: f32,
    img_width: f32,
    img_height: f32,
) -> CropRect {
    let right = orig.right();
    let bottom = orig.bottom();

    // Each edge moves independently; opposite edges stay put.
    let (mut x0, mut y0, mut x1, mut y1) = (orig.x, orig.y, right, bottom);

    match handle {
        DragHandle::TopLeft => {
            x0 = (orig.x + dx).clamp(0.0, right - MIN_SIZE);
            y0 = (orig.y + dy).clamp(0.0, bottom - MIN_SIZE);
        }
        DragHandle::TopRight => {
            x1 = (right + dx).clamp(orig.x + MIN_SIZE, img_width);
            y0 = (orig.y + dy).clamp(0.0, bottom - MIN_SIZE);
        }
        DragHandle::BottomLeft => {
            x0 = (orig.x + dx).clamp(0.0, right - MIN_SIZE);
            y1 = (bottom + dy).clamp(orig.y + MIN_SIZE, img_height);
        }
        DragHandle::BottomRight => {
            x1 = (right + dx).clamp(orig.x + MIN_SIZE, img_width);
            y1 = (bottom + dy).clamp(orig.y + MIN_SIZE, img_height);
        }
        DragHandle::Top => y0 = (orig.y + dy).clamp(0.0, bottom - MIN_SIZE),
        DragHandle::Bottom => y1 = (bottom + dy).clamp(orig.y + MIN_SIZE, img_height),
        DragHandle::Left => x0 = (orig.x + dx).clamp(0.0, right - MIN_SIZE),
        DragHandle::Right => x1 = (right + dx).clamp(orig.x + MIN_SIZE, img_width),
        DragHandle::None | DragHandle::Move => {}
    }

    CropRect::new(x0, y0, x1 - x0, y1 - y0)
}

/// Per-handle resize under a fixed width:height ratio
///
/// Corner drags anchor the opposite corner and are driven by the dominant
/// cursor axis. Edge drags keep the midpoint of the opposite edge fixed.
/// The size is always shrunk to fit the image.
fn resize_locked(
    handle: DragHandle,
    orig: CropRect,
    dx: f32,
    dy: f32,
    img_width: f32,
    img_height: f32,
    r: f32,
) -> CropRect {
    let right = orig.right();
    let bottom = orig.bottom();

    match handle {
        DragHandle::TopLeft | DragHandle::TopRight | DragHandle::BottomLeft
        | DragHandle::BottomRight => {
            // Opposite corner stays put
            let (anchor_x, anchor_y, sign_x, sign_y) = match handle {
                DragHandle::TopLeft => (right, bottom, -1.0, -1.0),
                DragHandle::TopRight => (orig.x, bottom, 1.0, -1.0),
                DragHandle::BottomLeft => (right, orig.y, -1.0, 1.0),
                _ => (orig.x, orig.y, 1.0, 1.0),
            };

            let desired_w = match handle {
                DragHandle::TopLeft | DragHandle::BottomLeft => orig.width - dx,
                _ => orig.width + dx,
            };
            let desired_h = match handle {
                DragHandle::TopLeft | DragHandle::TopRight => orig.height - dy,
                _ => orig.height + dy,
            };

            let avail_w = if sign_x > 0.0 { img_width - anchor_x } else { anchor_x };
            let avail_h = if sign_y > 0.0 { img_height - anchor_y } else { anchor_y };

            // Upper bound never drops below MIN_SIZE so the clamp stays valid
            // even when the anchor sits on the image edge.
            let max_w = avail_w.min(avail_h * r).max(MIN_SIZE);
            let w = desired_w.max(desired_h * r).clamp(MIN_SIZE, max_w);
            let h = w / r;

            let x0 = if sign_x > 0.0 { anchor_x } else { anchor_x - w };
            let y0 = if sign_y > 0.0 { anchor_y } else { anchor_y - h };
            CropRect::new(x0, y0, w, h)
        }
        DragHandle::Left | DragHandle::Right => {
            // Width drives; vertical centre is preserved
            let desired_w = match handle {
                DragHandle::Left => orig.width - dx,
                _ => orig.width + dx,
            };
            let center_y = orig.y + orig.height / 2.0;
            let avail_h = (center_y.min(img_height - center_y)) * 2.0;
            let avail_w = match handle {
                DragHandle::Left => right,
                _ => img_width - orig.x,
            };

            let w = desired_w.clamp(MIN_SIZE, avail_w.min(avail_h * r).max(MIN_SIZE));
            let h = w / r;
            let x0 = match handle {
                DragHandle::Left => right - w,
                _ => orig.x,
            };
            CropRect::new(x0, center_y - h / 2.0, w, h)
        }
        DragHandle::Top | DragHandle::Bottom => {
            // Height drives; horizontal centre is preserved
            let desired_h = match handle {
                DragHandle::Top => orig.height - dy,
                _ => orig.height + dy,
            };
            let center_x = orig.x + orig.width / 2.0;
            let avail_w = (center_x.min(img_width - center_x)) * 2.0;
            let avail_h = match handle {
                DragHandle::Top => bottom,
                _ => img_height - orig.y,
            };

            let h = desired_h.clamp(MIN_SIZE, avail_h.min(avail_w / r).max(MIN_SIZE));
            let w = h * r;
            let y0 = match handle {
                DragHandle::Top => bottom - h,
                _ => orig.y,
            };
            CropRect::new(center_x - w / 2.0, y0, w, h)
        }
        DragHandle::None | DragHandle::Move => orig,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_in_bounds(rect: CropRect, w: f32, h: f32) {
        assert!(rect.x >= 0.0, "x = {}", rect.x);
        assert!(rect.y >= 0.0, "y = {}", rect.y);
        assert!(rect.right() <= w + 0.001, "right = {}", rect.right());
        assert!(rect.bottom() <= h + 0.001, "bottom = {}", rect.bottom());
    }

    #[test]
    fn test_fitted_free_selects_whole_image() {
        let rect = CropRect::fitted(800.0, 600.0, None);
        assert_eq!(rect, CropRect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_fitted_square_is_centred() {
        let rect = CropRect::fitted(800.0, 600.0, Some(1.0));
        assert_eq!(rect, CropRect::new(100.0, 0.0, 600.0, 600.0));

        let rect = CropRect::fitted(600.0, 800.0, Some(1.0));
        assert_eq!(rect, CropRect::new(0.0, 100.0, 600.0, 600.0));
    }

    #[test]
    fn test_fitted_wide_ratio_in_tall_image() {
        let rect = CropRect::fitted(900.0, 1600.0, Some(16.0 / 9.0));
        assert!((rect.width - 900.0).abs() < 0.001);
        assert!((rect.height - 506.25).abs() < 0.001);
        assert!((rect.x - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_sweep_stays_in_bounds() {
        let mut sel = CropSelection::default();
        sel.start_new_selection(700.0, 500.0);
        sel.update_drag(2000.0, -300.0, 800.0, 600.0, None);

        let rect = sel.region.unwrap();
        assert_in_bounds(rect, 800.0, 600.0);
        assert_eq!(rect, CropRect::new(700.0, 0.0, 100.0, 500.0));
    }

    #[test]
    fn test_sweep_with_ratio_keeps_ratio() {
        let mut sel = CropSelection::default();
        sel.start_new_selection(100.0, 100.0);
        sel.update_drag(400.0, 150.0, 800.0, 600.0, Some(2.0));

        let rect = sel.region.unwrap();
        assert_in_bounds(rect, 800.0, 600.0);
        assert!((rect.width / rect.height - 2.0).abs() < 0.001);
        assert_eq!(rect.width, 300.0);
    }

    #[test]
    fn test_sweep_with_ratio_clamps_by_shrinking() {
        // Anchored near the right edge, a locked sweep cannot grow past it
        let mut sel = CropSelection::default();
        sel.start_new_selection(750.0, 0.0);
        sel.update_drag(3000.0, 3000.0, 800.0, 600.0, Some(1.0));

        let rect = sel.region.unwrap();
        assert_in_bounds(rect, 800.0, 600.0);
        assert_eq!(rect.width, 50.0);
        assert_eq!(rect.height, 50.0);
    }

    #[test]
    fn test_move_clamps_to_image() {
        let mut sel = CropSelection::default();
        sel.region = Some(CropRect::new(100.0, 100.0, 200.0, 150.0));
        sel.start_handle_drag(DragHandle::Move, 150.0, 150.0);
        sel.update_drag(5000.0, 5000.0, 800.0, 600.0, None);

        let rect = sel.region.unwrap();
        assert_eq!(rect, CropRect::new(600.0, 450.0, 200.0, 150.0));
    }

    #[test]
    fn test_free_resize_respects_min_size() {
        let mut sel = CropSelection::default();
        sel.region = Some(CropRect::new(100.0, 100.0, 200.0, 150.0));
        sel.start_handle_drag(DragHandle::BottomRight, 300.0, 250.0);
        sel.update_drag(-1000.0, -1000.0, 800.0, 600.0, None);

        let rect = sel.region.unwrap();
        assert_eq!(rect.width, MIN_SIZE);
        assert_eq!(rect.height, MIN_SIZE);
        assert_in_bounds(rect, 800.0, 600.0);
    }

    #[test]
    fn test_locked_corner_resize_keeps_ratio_and_anchor() {
        let mut sel = CropSelection::default();
        sel.region = Some(CropRect::new(100.0, 100.0, 200.0, 100.0));
        sel.start_handle_drag(DragHandle::BottomRight, 300.0, 200.0);
        sel.update_drag(400.0, 210.0, 800.0, 600.0, Some(2.0));

        let rect = sel.region.unwrap();
        assert_in_bounds(rect, 800.0, 600.0);
        // Top-left anchor untouched
        assert_eq!((rect.x, rect.y), (100.0, 100.0));
        assert!((rect.width / rect.height - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_locked_edge_resize_preserves_centre() {
        let mut sel = CropSelection::default();
        sel.region = Some(CropRect::new(200.0, 200.0, 200.0, 100.0));
        sel.start_handle_drag(DragHandle::Right, 400.0, 250.0);
        sel.update_drag(450.0, 250.0, 800.0, 600.0, Some(2.0));

        let rect = sel.region.unwrap();
        assert_in_bounds(rect, 800.0, 600.0);
        assert!((rect.width / rect.height - 2.0).abs() < 0.001);
        assert_eq!(rect.width, 250.0);
        // Vertical centre preserved
        assert!((rect.y + rect.height / 2.0 - 250.0).abs() < 0.001);
    }

    #[test]
    fn test_end_drag_discards_degenerate_sweep() {
        let mut sel = CropSelection::default();
        sel.start_new_selection(50.0, 50.0);
        sel.update_drag(50.2, 50.2, 800.0, 600.0, None);
        sel.end_drag();

        assert!(sel.region.is_none());
        assert!(!sel.is_dragging);
    }

    #[test]
    fn test_to_pixels_rounds_and_clamps() {
        let rect = CropRect::new(10.4, 20.6, 100.2, 50.5);
        assert_eq!(rect.to_pixels(800, 600), Some((10, 21, 100, 51)));

        let rect = CropRect::new(790.0, 0.0, 100.0, 50.0);
        assert_eq!(rect.to_pixels(800, 600), Some((790, 0, 10, 50)));

        let rect = CropRect::new(0.0, 0.0, 0.2, 0.2);
        assert_eq!(rect.to_pixels(800, 600), None);
    }
}
