use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::common::{self, Style, closest_point_on_ellipse, rotate_about};
use super::{Element, ObjectId, ObjectKind};

/// A disc described by center and radius
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    id: ObjectId,
    pub center: Pos2,
    pub radius: f32,
    pub style: Style,
}

impl Circle {
    pub fn new(center: Pos2, radius: f32, style: Style) -> Self {
        Self {
            id: ObjectId::new(),
            center,
            radius: radius.abs(),
            style,
        }
    }

    /// Point on the perimeter closest to `point`
    pub fn closest_perimeter_point(&self, point: Pos2) -> Pos2 {
        let offset = point - self.center;
        let direction = if offset.length_sq() > 0.0 { offset.normalized() } else { Vec2::X };
        self.center + direction * self.radius
    }
}

impl Element for Circle {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Circle
    }

    fn style(&self) -> &Style {
        &self.style
    }

    fn bounds(&self) -> Rect {
        let extent = self.radius + self.style.half_width();
        Rect::from_center_size(self.center, Vec2::splat(2.0 * extent))
    }

    fn center(&self) -> Pos2 {
        self.center
    }

    fn precision_hit(&self, pos: Pos2, tolerance: f32) -> bool {
        let distance = pos.distance(self.center);
        if self.style.is_filled() && distance <= self.radius {
            return true;
        }
        (distance - self.radius).abs() <= self.style.half_width() + tolerance
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    fn resize(&mut self, from: Rect, to: Rect) {
        let scale = common::scale_factors(from, to);
        // Stay round by following whichever axis the drag changed most
        let factor = if (scale.x - 1.0).abs() >= (scale.y - 1.0).abs() {
            scale.x.abs()
        } else {
            scale.y.abs()
        };
        let half_width = self.style.half_width();
        self.radius = ((self.radius + half_width) * factor - half_width).max(common::MIN_ELEMENT_SIZE / 2.0);

        let extent = self.radius + half_width;
        self.center = Pos2::new(
            common::anchored_center(self.center.x, from.x_range(), to.x_range(), extent),
            common::anchored_center(self.center.y, from.y_range(), to.y_range(), extent),
        );
    }

    fn rotate_by(&mut self, _angle: f32) {
        // Rotationally symmetric
    }
}

/// An ellipse with independent radii, rotated about its center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    id: ObjectId,
    pub center: Pos2,
    pub radii: Vec2,
    /// Radians, clockwise in screen space
    pub rotation: f32,
    pub style: Style,
}

impl Ellipse {
    pub fn new(center: Pos2, radii: Vec2, style: Style) -> Self {
        Self {
            id: ObjectId::new(),
            center,
            radii: Vec2::new(radii.x.abs(), radii.y.abs()),
            rotation: 0.0,
            style,
        }
    }

    /// Point on the outline closest to `point`, honouring rotation
    pub fn closest_perimeter_point(&self, point: Pos2) -> Pos2 {
        let local = rotate_about(point, self.center, -self.rotation) - self.center;
        let on_curve = closest_point_on_ellipse(local, self.radii);
        rotate_about(self.center + on_curve, self.center, self.rotation)
    }
}

impl Element for Ellipse {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Ellipse
    }

    fn style(&self) -> &Style {
        &self.style
    }

    fn bounds(&self) -> Rect {
        let (sin, cos) = self.rotation.sin_cos();
        let (a, b) = (self.radii.x, self.radii.y);
        let half = Vec2::new(
            ((a * cos).powi(2) + (b * sin).powi(2)).sqrt(),
            ((a * sin).powi(2) + (b * cos).powi(2)).sqrt(),
        ) + Vec2::splat(self.style.half_width());
        Rect::from_center_size(self.center, half * 2.0)
    }

    fn center(&self) -> Pos2 {
        self.center
    }

    fn precision_hit(&self, pos: Pos2, tolerance: f32) -> bool {
        let local = rotate_about(pos, self.center, -self.rotation) - self.center;
        if self.style.is_filled() && self.radii.x > 0.0 && self.radii.y > 0.0 {
            let inside = (local.x / self.radii.x).powi(2) + (local.y / self.radii.y).powi(2);
            if inside <= 1.0 {
                return true;
            }
        }
        let nearest = closest_point_on_ellipse(local, self.radii);
        (local - nearest).length() <= self.style.half_width() + tolerance
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    fn resize(&mut self, from: Rect, to: Rect) {
        let scale = common::local_scale(common::scale_factors(from, to), self.rotation);
        self.center = common::map_point(self.center, from, to);
        let min_radius = common::MIN_ELEMENT_SIZE / 2.0;
        self.radii = Vec2::new(
            (self.radii.x * scale.x).max(min_radius),
            (self.radii.y * scale.y).max(min_radius),
        );
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn rotate_by(&mut self, angle: f32) {
        self.rotation += angle;
    }
}

/// A rectangle stored unrotated, then rotated about its center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    id: ObjectId,
    pub rect: Rect,
    pub rotation: f32,
    pub style: Style,
}

impl Rectangle {
    pub fn new(rect: Rect, style: Style) -> Self {
        Self {
            id: ObjectId::new(),
            rect,
            rotation: 0.0,
            style,
        }
    }

    /// Corners in document space, clockwise from the top left
    pub fn corners(&self) -> [Pos2; 4] {
        let center = self.rect.center();
        [
            self.rect.left_top(),
            self.rect.right_top(),
            self.rect.right_bottom(),
            self.rect.left_bottom(),
        ]
        .map(|corner| rotate_about(corner, center, self.rotation))
    }

    fn to_local(&self, point: Pos2) -> Pos2 {
        rotate_about(point, self.rect.center(), -self.rotation)
    }

    /// Distance from a local-frame point to the outline
    fn outline_distance(&self, local: Pos2) -> f32 {
        let r = self.rect;
        if r.contains(local) {
            (local.x - r.min.x)
                .min(r.max.x - local.x)
                .min(local.y - r.min.y)
                .min(r.max.y - local.y)
        } else {
            let dx = (r.min.x - local.x).max(0.0).max(local.x - r.max.x);
            let dy = (r.min.y - local.y).max(0.0).max(local.y - r.max.y);
            dx.hypot(dy)
        }
    }

    /// Point on the outline closest to `point`
    pub fn closest_perimeter_point(&self, point: Pos2) -> Pos2 {
        let local = self.to_local(point);
        let r = self.rect;
        let mut nearest = Pos2::new(local.x.clamp(r.min.x, r.max.x), local.y.clamp(r.min.y, r.max.y));
        if r.contains(local) {
            let candidates = [
                (local.x - r.min.x, Pos2::new(r.min.x, local.y)),
                (r.max.x - local.x, Pos2::new(r.max.x, local.y)),
                (local.y - r.min.y, Pos2::new(local.x, r.min.y)),
                (r.max.y - local.y, Pos2::new(local.x, r.max.y)),
            ];
            let mut best = f32::INFINITY;
            for (distance, candidate) in candidates {
                if distance < best {
                    best = distance;
                    nearest = candidate;
                }
            }
        }
        rotate_about(nearest, r.center(), self.rotation)
    }
}

impl Element for Rectangle {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Rectangle
    }

    fn style(&self) -> &Style {
        &self.style
    }

    fn bounds(&self) -> Rect {
        common::calculate_bounds(&self.corners(), self.style.half_width())
    }

    fn center(&self) -> Pos2 {
        self.rect.center()
    }

    fn precision_hit(&self, pos: Pos2, tolerance: f32) -> bool {
        let local = self.to_local(pos);
        if self.style.is_filled() && self.rect.contains(local) {
            return true;
        }
        self.outline_distance(local) <= self.style.half_width() + tolerance
    }

    fn translate(&mut self, delta: Vec2) {
        self.rect = self.rect.translate(delta);
    }

    fn resize(&mut self, from: Rect, to: Rect) {
        let scale = common::local_scale(common::scale_factors(from, to), self.rotation);
        let center = common::map_point(self.rect.center(), from, to);
        let size = Vec2::new(
            (self.rect.width() * scale.x).max(common::MIN_ELEMENT_SIZE),
            (self.rect.height() * scale.y).max(common::MIN_ELEMENT_SIZE),
        );
        self.rect = Rect::from_center_size(center, size);
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn rotate_by(&mut self, angle: f32) {
        self.rotation += angle;
    }
}
