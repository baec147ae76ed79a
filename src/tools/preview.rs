use egui::{Color32, Pos2, Rect, Stroke};

use crate::element::{DrawableObject, rotate_about};

const ELLIPSE_SEGMENTS: usize = 48;

/// Stroke used for in-progress shapes and drag ghosts
pub fn preview_stroke() -> Stroke {
    Stroke::new(1.0, Color32::from_gray(110))
}

/// Stroke used for the rubber-band selection box
pub fn selection_box_stroke() -> Stroke {
    Stroke::new(1.0, Color32::from_rgb(60, 130, 230))
}

/// Where previews get drawn. Implemented by the host's canvas and by test doubles.
pub trait PreviewSurface {
    fn polyline(&mut self, points: &[Pos2], closed: bool, stroke: Stroke);
    fn rect(&mut self, rect: Rect, stroke: Stroke);
    fn circle(&mut self, center: Pos2, radius: f32, stroke: Stroke);
}

/// Ephemeral feedback a tool shows while an interaction is in progress.
/// Never part of the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// Ghost of the object the tool would commit right now
    Object(DrawableObject),
    /// Ghosts of the objects being moved
    Objects(Vec<DrawableObject>),
    /// Open polyline, e.g. a freehand path or a pending connector
    Polyline(Vec<Pos2>),
    SelectionBox(Rect),
}

impl Preview {
    pub fn render(&self, surface: &mut dyn PreviewSurface) {
        match self {
            Preview::Object(object) => draw_outline(surface, object, preview_stroke()),
            Preview::Objects(objects) => {
                for object in objects {
                    draw_outline(surface, object, preview_stroke());
                }
            }
            Preview::Polyline(points) => surface.polyline(points, false, preview_stroke()),
            Preview::SelectionBox(rect) => surface.rect(*rect, selection_box_stroke()),
        }
    }
}

/// Trace the outline of `object` onto `surface`
pub fn draw_outline(surface: &mut dyn PreviewSurface, object: &DrawableObject, stroke: Stroke) {
    match object {
        DrawableObject::Circle(circle) => surface.circle(circle.center, circle.radius, stroke),
        DrawableObject::Rectangle(rect) => surface.polyline(&rect.corners(), true, stroke),
        DrawableObject::Line(line) => surface.polyline(&[line.start, line.end], false, stroke),
        DrawableObject::Path(path) => surface.polyline(path.points(), false, stroke),
        DrawableObject::Connector(connector) => {
            surface.polyline(&connector.path_points(), false, stroke)
        }
        DrawableObject::Ellipse(_) => surface.polyline(&outline_points(object), true, stroke),
    }
}

/// Points approximating the outline of `object`; closed shapes do not repeat
/// the first point.
pub fn outline_points(object: &DrawableObject) -> Vec<Pos2> {
    match object {
        DrawableObject::Circle(circle) => {
            sample_ellipse(circle.center, egui::vec2(circle.radius, circle.radius), 0.0)
        }
        DrawableObject::Ellipse(ellipse) => {
            sample_ellipse(ellipse.center, ellipse.radii, ellipse.rotation)
        }
        DrawableObject::Rectangle(rect) => rect.corners().to_vec(),
        DrawableObject::Line(line) => vec![line.start, line.end],
        DrawableObject::Path(path) => path.points().to_vec(),
        DrawableObject::Connector(connector) => connector.path_points(),
    }
}

/// True for kinds whose outline encloses an area
pub fn is_closed(object: &DrawableObject) -> bool {
    matches!(
        object,
        DrawableObject::Circle(_) | DrawableObject::Ellipse(_) | DrawableObject::Rectangle(_)
    )
}

fn sample_ellipse(center: Pos2, radii: egui::Vec2, rotation: f32) -> Vec<Pos2> {
    (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let t = i as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
            let point = center + egui::vec2(radii.x * t.cos(), radii.y * t.sin());
            rotate_about(point, center, rotation)
        })
        .collect()
}

/// Records every primitive it is asked to draw
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub polylines: Vec<(Vec<Pos2>, bool)>,
    pub rects: Vec<Rect>,
    pub circles: Vec<(Pos2, f32)>,
}

impl RecordingSurface {
    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty() && self.rects.is_empty() && self.circles.is_empty()
    }
}

impl PreviewSurface for RecordingSurface {
    fn polyline(&mut self, points: &[Pos2], closed: bool, _stroke: Stroke) {
        self.polylines.push((points.to_vec(), closed));
    }

    fn rect(&mut self, rect: Rect, _stroke: Stroke) {
        self.rects.push(rect);
    }

    fn circle(&mut self, center: Pos2, radius: f32, _stroke: Stroke) {
        self.circles.push((center, radius));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Style, factory};
    use egui::pos2;

    #[test]
    fn circle_preview_draws_a_circle() {
        let mut surface = RecordingSurface::default();
        Preview::Object(factory::create_circle(pos2(5.0, 5.0), 3.0, Style::default()))
            .render(&mut surface);
        assert_eq!(surface.circles, vec![(pos2(5.0, 5.0), 3.0)]);
    }

    #[test]
    fn ellipse_outline_stays_on_the_ellipse() {
        let ellipse = factory::create_ellipse(pos2(0.0, 0.0), egui::vec2(10.0, 5.0), Style::default());
        for point in outline_points(&ellipse) {
            let value = (point.x / 10.0).powi(2) + (point.y / 5.0).powi(2);
            assert!((value - 1.0).abs() < 1e-3);
        }
        assert!(is_closed(&ellipse));
    }
}
