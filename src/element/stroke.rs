use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::common::{self, Style, rotate_about};
use super::{Element, ObjectId, ObjectKind};

/// A straight segment between two terminals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    id: ObjectId,
    pub start: Pos2,
    pub end: Pos2,
    pub style: Style,
}

impl Line {
    pub fn new(start: Pos2, end: Pos2, style: Style) -> Self {
        Self {
            id: ObjectId::new(),
            start,
            end,
            style,
        }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Whichever endpoint is closer to `point`
    pub fn nearest_endpoint(&self, point: Pos2) -> Pos2 {
        if point.distance_sq(self.start) <= point.distance_sq(self.end) {
            self.start
        } else {
            self.end
        }
    }
}

impl Element for Line {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Line
    }

    fn style(&self) -> &Style {
        &self.style
    }

    fn bounds(&self) -> Rect {
        common::calculate_bounds(&[self.start, self.end], self.style.half_width())
    }

    fn center(&self) -> Pos2 {
        self.start.lerp(self.end, 0.5)
    }

    fn precision_hit(&self, pos: Pos2, tolerance: f32) -> bool {
        common::distance_to_segment(pos, self.start, self.end) <= self.style.half_width() + tolerance
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    fn resize(&mut self, from: Rect, to: Rect) {
        self.start = common::map_point(self.start, from, to);
        self.end = common::map_point(self.end, from, to);
    }

    fn rotate_by(&mut self, angle: f32) {
        let center = self.center();
        self.start = rotate_about(self.start, center, angle);
        self.end = rotate_about(self.end, center, angle);
    }
}

/// Freehand polyline, as drawn with the path tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    id: ObjectId,
    points: Vec<Pos2>,
    pub style: Style,
}

impl Path {
    pub fn new(points: Vec<Pos2>, style: Style) -> Self {
        Self {
            id: ObjectId::new(),
            points,
            style,
        }
    }

    /// Get the points that make up this path
    pub fn points(&self) -> &[Pos2] {
        &self.points
    }
}

impl Element for Path {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Path
    }

    fn style(&self) -> &Style {
        &self.style
    }

    fn bounds(&self) -> Rect {
        common::calculate_bounds(&self.points, self.style.half_width())
    }

    fn center(&self) -> Pos2 {
        if self.points.is_empty() {
            return Pos2::ZERO;
        }
        common::calculate_bounds(&self.points, 0.0).center()
    }

    // Open polyline: never hit on the interior, whatever the fill says
    fn precision_hit(&self, pos: Pos2, tolerance: f32) -> bool {
        common::distance_to_polyline(pos, &self.points) <= self.style.half_width() + tolerance
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }

    fn resize(&mut self, from: Rect, to: Rect) {
        for point in &mut self.points {
            *point = common::map_point(*point, from, to);
        }
    }

    fn rotate_by(&mut self, angle: f32) {
        let center = self.center();
        for point in &mut self.points {
            *point = rotate_about(*point, center, angle);
        }
    }
}
