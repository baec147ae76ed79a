use egui::emath::Rot2;
use egui::{Color32, Pos2, Rangef, Rect, Vec2};
use serde::{Deserialize, Serialize};

// Common constants for all element types
pub const MIN_ELEMENT_SIZE: f32 = 2.0;

/// Number of straight segments used to approximate a curved connector
pub(crate) const CURVE_SEGMENTS: usize = 24;

/// Stroke and fill of a drawable object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub stroke_color: Color32,
    pub stroke_width: f32,
    /// `None` (or a fully transparent color) means the interior is not painted
    pub fill: Option<Color32>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: Color32::BLACK,
            stroke_width: 2.0,
            fill: None,
        }
    }
}

impl Style {
    pub fn filled(fill: Color32) -> Self {
        Self {
            fill: Some(fill),
            ..Self::default()
        }
    }

    pub fn outline(stroke_color: Color32, stroke_width: f32) -> Self {
        Self {
            stroke_color,
            stroke_width,
            fill: None,
        }
    }

    /// Only filled objects can be hit on their interior
    pub fn is_filled(&self) -> bool {
        self.fill.is_some_and(|fill| fill.a() > 0)
    }

    pub fn half_width(&self) -> f32 {
        self.stroke_width.max(0.0) / 2.0
    }
}

/// Closest point to `point` on the segment `start`..`end`
pub fn project_onto_segment(point: Pos2, start: Pos2, end: Pos2) -> Pos2 {
    let line_vec = end - start;
    let len_sq = line_vec.length_sq();
    if len_sq == 0.0 {
        return start;
    }
    let t = ((point - start).dot(line_vec) / len_sq).clamp(0.0, 1.0);
    start + line_vec * t
}

/// Calculate distance from a point to a line segment
pub fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    point.distance(project_onto_segment(point, start, end))
}

/// Distance from a point to an open polyline
pub(crate) fn distance_to_polyline(point: Pos2, points: &[Pos2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|pair| distance_to_segment(point, pair[0], pair[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Rotate `point` by `angle` radians around `pivot`
pub fn rotate_about(point: Pos2, pivot: Pos2, angle: f32) -> Pos2 {
    if angle == 0.0 {
        return point;
    }
    pivot + Rot2::from_angle(angle) * (point - pivot)
}

/// Per-axis scale taking `from` onto `to`. Degenerate axes keep a scale of 1.
pub(crate) fn scale_factors(from: Rect, to: Rect) -> Vec2 {
    let axis = |from: f32, to: f32| if from.abs() <= f32::EPSILON { 1.0 } else { to / from };
    Vec2::new(axis(from.width(), to.width()), axis(from.height(), to.height()))
}

/// How much an object's own axes stretch when its world bounds scale by
/// `scale`. A quarter turn swaps the two axes.
pub(crate) fn local_scale(scale: Vec2, rotation: f32) -> Vec2 {
    if rotation == 0.0 {
        return Vec2::new(scale.x.abs(), scale.y.abs());
    }
    let (sin, cos) = rotation.sin_cos();
    Vec2::new(
        (scale.x * cos).hypot(scale.y * sin),
        (scale.x * sin).hypot(scale.y * cos),
    )
}

/// Center coordinate along one axis for an object of half-size `extent`
/// after its bounds went from `from` to `to`. The side that did not move
/// stays put; otherwise the center is mapped proportionally.
pub(crate) fn anchored_center(center: f32, from: Rangef, to: Rangef, extent: f32) -> f32 {
    const EPS: f32 = 1e-4;
    let min_fixed = (to.min - from.min).abs() <= EPS;
    let max_fixed = (to.max - from.max).abs() <= EPS;
    match (min_fixed, max_fixed) {
        (true, false) => to.min + extent,
        (false, true) => to.max - extent,
        _ => {
            let span = from.max - from.min;
            if span.abs() <= f32::EPSILON {
                center + (to.min - from.min)
            } else {
                to.min + (center - from.min) * (to.max - to.min) / span
            }
        }
    }
}

/// Map a point from one rectangle's frame into another's
pub(crate) fn map_point(point: Pos2, from: Rect, to: Rect) -> Pos2 {
    let scale = scale_factors(from, to);
    let rel = point - from.min;
    to.min + Vec2::new(rel.x * scale.x, rel.y * scale.y)
}

/// Closest point on an axis-aligned ellipse centred at the origin.
///
/// Uses a fixed number of curvature-based iterations, which converges to well
/// below a pixel for any reasonable eccentricity.
pub fn closest_point_on_ellipse(local: Vec2, radii: Vec2) -> Vec2 {
    let (a, b) = (radii.x.abs(), radii.y.abs());
    if a <= f32::EPSILON || b <= f32::EPSILON {
        // Collapsed to a segment along the surviving axis
        return Vec2::new(local.x.clamp(-a, a), local.y.clamp(-b, b));
    }
    let (px, py) = (local.x.abs(), local.y.abs());
    let mut tx = std::f32::consts::FRAC_1_SQRT_2;
    let mut ty = std::f32::consts::FRAC_1_SQRT_2;

    for _ in 0..4 {
        let x = a * tx;
        let y = b * ty;
        let ex = (a * a - b * b) * tx.powi(3) / a;
        let ey = (b * b - a * a) * ty.powi(3) / b;
        let (rx, ry) = (x - ex, y - ey);
        let (qx, qy) = (px - ex, py - ey);
        let r = rx.hypot(ry);
        let q = qx.hypot(qy).max(f32::EPSILON);
        tx = ((qx * r / q + ex) / a).clamp(0.0, 1.0);
        ty = ((qy * r / q + ey) / b).clamp(0.0, 1.0);
        let t = tx.hypot(ty).max(f32::EPSILON);
        tx /= t;
        ty /= t;
    }

    Vec2::new((a * tx).copysign(local.x), (b * ty).copysign(local.y))
}

/// Sample a quadratic Bézier curve into `segments + 1` points
pub(crate) fn sample_quadratic(start: Pos2, control: Pos2, end: Pos2, segments: usize) -> Vec<Pos2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let mt = 1.0 - t;
            let v = start.to_vec2() * (mt * mt) + control.to_vec2() * (2.0 * mt * t) + end.to_vec2() * (t * t);
            v.to_pos2()
        })
        .collect()
}
