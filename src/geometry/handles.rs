use egui::{CursorIcon, Pos2, Rect, pos2};

/// One of the eight resize handles around a selection box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    /// Corners first, so a corner wins over an adjacent edge on tiny objects
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomRight,
        Handle::BottomLeft,
        Handle::Top,
        Handle::Right,
        Handle::Bottom,
        Handle::Left,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Handle::TopLeft => "top_left",
            Handle::Top => "top",
            Handle::TopRight => "top_right",
            Handle::Right => "right",
            Handle::BottomRight => "bottom_right",
            Handle::Bottom => "bottom",
            Handle::BottomLeft => "bottom_left",
            Handle::Left => "left",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Handle::TopLeft | Handle::BottomRight => CursorIcon::ResizeNwSe,
            Handle::TopRight | Handle::BottomLeft => CursorIcon::ResizeNeSw,
            Handle::Top | Handle::Bottom => CursorIcon::ResizeVertical,
            Handle::Left | Handle::Right => CursorIcon::ResizeHorizontal,
        }
    }

    /// Where this handle sits on `bounds`
    pub fn position(&self, bounds: Rect) -> Pos2 {
        let center = bounds.center();
        match self {
            Handle::TopLeft => bounds.left_top(),
            Handle::Top => pos2(center.x, bounds.min.y),
            Handle::TopRight => bounds.right_top(),
            Handle::Right => pos2(bounds.max.x, center.y),
            Handle::BottomRight => bounds.right_bottom(),
            Handle::Bottom => pos2(center.x, bounds.max.y),
            Handle::BottomLeft => bounds.left_bottom(),
            Handle::Left => pos2(bounds.min.x, center.y),
        }
    }

    /// Which sides of the box this handle drags: (left, right, top, bottom)
    fn edges(&self) -> (bool, bool, bool, bool) {
        match self {
            Handle::TopLeft => (true, false, true, false),
            Handle::Top => (false, false, true, false),
            Handle::TopRight => (false, true, true, false),
            Handle::Right => (false, true, false, false),
            Handle::BottomRight => (false, true, false, true),
            Handle::Bottom => (false, false, false, true),
            Handle::BottomLeft => (true, false, false, true),
            Handle::Left => (true, false, false, false),
        }
    }

    /// Edge handles of an axis thinner than two grab radii sit on top of the
    /// object itself, so they are not offered.
    pub fn is_grabbable(&self, bounds: Rect, radius: f32) -> bool {
        match self {
            Handle::Top | Handle::Bottom => bounds.height() >= 2.0 * radius,
            Handle::Left | Handle::Right => bounds.width() >= 2.0 * radius,
            _ => true,
        }
    }

    /// New bounds after dragging this handle to `pointer`.
    ///
    /// The opposite side stays put and each dimension is kept at least
    /// `min_size`, so a drag past the anchor clamps instead of flipping.
    pub fn resize(&self, original: Rect, pointer: Pos2, min_size: f32) -> Rect {
        let mut rect = original;
        let (left, right, top, bottom) = self.edges();
        if left {
            rect.min.x = pointer.x.min(original.max.x - min_size);
        }
        if right {
            rect.max.x = pointer.x.max(original.min.x + min_size);
        }
        if top {
            rect.min.y = pointer.y.min(original.max.y - min_size);
        }
        if bottom {
            rect.max.y = pointer.y.max(original.min.y + min_size);
        }
        rect
    }
}

/// Convert a fixed on-screen radius into document units at `zoom`
pub fn screen_radius_to_world(radius_px: f32, zoom: f32) -> f32 {
    radius_px / zoom.max(f32::EPSILON)
}

/// The handle of `bounds` within `radius_px` screen pixels of `pos`, if any.
/// When several are in range the nearest one wins. Edge handles are skipped
/// on axes too thin to tell them apart from the object body.
pub fn handle_at(bounds: Rect, pos: Pos2, radius_px: f32, zoom: f32) -> Option<Handle> {
    let radius = screen_radius_to_world(radius_px, zoom);
    let mut best: Option<(Handle, f32)> = None;
    for handle in Handle::ALL.into_iter().filter(|h| h.is_grabbable(bounds, radius)) {
        let distance = pos.distance(handle.position(bounds));
        if distance <= radius && best.is_none_or(|(_, d)| distance < d) {
            best = Some((handle, distance));
        }
    }
    best.map(|(handle, _)| handle)
}

/// Rotation handle sits a fixed screen distance above the top edge
pub fn rotation_handle_position(bounds: Rect, offset_px: f32, zoom: f32) -> Pos2 {
    let top = Handle::Top.position(bounds);
    pos2(top.x, top.y - screen_radius_to_world(offset_px, zoom))
}

pub fn is_on_rotation_handle(bounds: Rect, pos: Pos2, offset_px: f32, radius_px: f32, zoom: f32) -> bool {
    pos.distance(rotation_handle_position(bounds, offset_px, zoom)) <= screen_radius_to_world(radius_px, zoom)
}
