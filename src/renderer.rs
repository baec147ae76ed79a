use eframe::egui::{self, Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2};

use crate::controller::{EditorController, Viewport};
use crate::element::{DrawableObject, Element};
use crate::geometry::{Handle, rotation_handle_position, screen_radius_to_world};
use crate::tools::PreviewSurface;
use crate::tools::preview::{is_closed, outline_points};

const ARROW_LENGTH: f32 = 10.0;
const HANDLE_SIZE: f32 = 7.0;

/// Maps document coordinates onto a canvas painter
pub struct CanvasSurface<'a> {
    painter: &'a Painter,
    viewport: Viewport,
    /// Screen position of the canvas origin
    origin: Vec2,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(painter: &'a Painter, viewport: Viewport, canvas: Rect) -> Self {
        Self {
            painter,
            viewport,
            origin: canvas.min.to_vec2(),
        }
    }

    pub fn to_screen(&self, world: Pos2) -> Pos2 {
        self.viewport.world_to_screen(world) + self.origin
    }

    fn scaled(&self, stroke: Stroke) -> Stroke {
        Stroke::new(stroke.width * self.viewport.zoom, stroke.color)
    }
}

impl PreviewSurface for CanvasSurface<'_> {
    fn polyline(&mut self, points: &[Pos2], closed: bool, stroke: Stroke) {
        let points: Vec<Pos2> = points.iter().map(|p| self.to_screen(*p)).collect();
        if closed {
            self.painter.add(Shape::closed_line(points, stroke));
        } else {
            self.painter.add(Shape::line(points, stroke));
        }
    }

    fn rect(&mut self, rect: Rect, stroke: Stroke) {
        let rect = Rect::from_two_pos(self.to_screen(rect.min), self.to_screen(rect.max));
        self.painter.rect_stroke(rect, 0.0, stroke);
    }

    fn circle(&mut self, center: Pos2, radius: f32, stroke: Stroke) {
        self.painter
            .circle_stroke(self.to_screen(center), radius * self.viewport.zoom, stroke);
    }
}

/// Paints the document, the selection decorations and the current tool preview
#[derive(Debug, Clone)]
pub struct Renderer {
    background: Color32,
    selection_color: Color32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            background: Color32::WHITE,
            selection_color: Color32::from_rgb(33, 150, 243),
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the current frame
    pub fn render(&self, painter: &Painter, canvas: Rect, controller: &EditorController) {
        painter.rect_filled(canvas, 0.0, self.background);

        let mut surface = CanvasSurface::new(painter, *controller.viewport(), canvas);
        for object in controller.document().objects() {
            self.draw_object(&mut surface, object);
        }
        self.draw_selection(&mut surface, controller);
        controller.render_preview(&mut surface);
    }

    pub fn draw_object(&self, surface: &mut CanvasSurface<'_>, object: &DrawableObject) {
        let style = object.style();
        let stroke = surface.scaled(Stroke::new(style.stroke_width, style.stroke_color));

        if is_closed(object) {
            let points: Vec<Pos2> = outline_points(object)
                .into_iter()
                .map(|p| surface.to_screen(p))
                .collect();
            let fill = style.fill.unwrap_or(Color32::TRANSPARENT);
            surface.painter.add(Shape::convex_polygon(points, fill, stroke));
            return;
        }

        let points: Vec<Pos2> = outline_points(object)
            .into_iter()
            .map(|p| surface.to_screen(p))
            .collect();
        if let (DrawableObject::Connector(_), [.., before, tip]) = (object, points.as_slice()) {
            self.draw_arrow_head(surface.painter, *before, *tip, stroke);
        }
        surface.painter.add(Shape::line(points, stroke));
    }

    fn draw_arrow_head(&self, painter: &Painter, from: Pos2, tip: Pos2, stroke: Stroke) {
        let direction = tip - from;
        if direction.length_sq() <= f32::EPSILON {
            return;
        }
        let back = -direction.normalized() * ARROW_LENGTH;
        let rot = egui::emath::Rot2::from_angle(0.45);
        painter.line_segment([tip, tip + rot * back], stroke);
        painter.line_segment([tip, tip + rot.inverse() * back], stroke);
    }

    fn draw_selection(&self, surface: &mut CanvasSurface<'_>, controller: &EditorController) {
        let outline = Stroke::new(1.0, self.selection_color);
        let document = controller.document();
        let selection = controller.selection();

        for object in selection.ids().iter().filter_map(|id| document.get(*id)) {
            if object.is_connector() {
                continue;
            }
            surface.rect(object.bounds(), outline);
        }

        let Some(object) = selection.single().and_then(|id| document.get(id)) else {
            return;
        };
        let zoom = controller.viewport().zoom;

        if let Some(connector) = object.as_connector() {
            for point in [connector.source.point, connector.target.point] {
                self.draw_handle(surface, point, true);
            }
            self.draw_handle(surface, connector.curve_handle(), false);
            return;
        }

        let bounds = object.bounds();
        let grab_radius = screen_radius_to_world(controller.config().handle_radius_px, zoom);
        for handle in Handle::ALL.into_iter().filter(|h| h.is_grabbable(bounds, grab_radius)) {
            self.draw_handle(surface, handle.position(bounds), false);
        }
        let rotate = rotation_handle_position(bounds, controller.config().rotate_handle_offset_px, zoom);
        surface.polyline(&[Handle::Top.position(bounds), rotate], false, outline);
        self.draw_handle(surface, rotate, true);
    }

    fn draw_handle(&self, surface: &CanvasSurface<'_>, world: Pos2, round: bool) {
        let center = surface.to_screen(world);
        let stroke = Stroke::new(1.0, self.selection_color);
        if round {
            surface.painter.circle(center, HANDLE_SIZE * 0.5, Color32::WHITE, stroke);
        } else {
            let rect = Rect::from_center_size(center, egui::vec2(HANDLE_SIZE, HANDLE_SIZE));
            surface.painter.rect(rect, 0.0, Color32::WHITE, stroke);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Style, factory};
    use egui::pos2;

    #[test]
    fn test_render_basics() {
        let ctx = egui::Context::default();
        let layer_id = egui::LayerId::background();
        let rect = egui::Rect::from_min_size(pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let painter = Painter::new(ctx, layer_id, rect);

        let mut controller = EditorController::default();
        controller.load_document(vec![
            factory::create_circle(pos2(20.0, 20.0), 10.0, Style::default()),
            factory::create_line(pos2(0.0, 0.0), pos2(50.0, 50.0), Style::default()),
        ]);
        Renderer::new().render(&painter, rect, &controller);
    }

    #[test]
    fn canvas_surface_applies_viewport_and_origin() {
        let ctx = egui::Context::default();
        let rect = egui::Rect::from_min_size(pos2(10.0, 20.0), egui::vec2(100.0, 100.0));
        let painter = Painter::new(ctx, egui::LayerId::background(), rect);
        let viewport = Viewport {
            zoom: 2.0,
            pan: egui::vec2(1.0, 1.0),
        };
        let surface = CanvasSurface::new(&painter, viewport, rect);
        assert_eq!(surface.to_screen(pos2(4.0, 4.0)), pos2(20.0, 30.0));
    }
}
