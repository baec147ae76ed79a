//! Where a connector touches its host.
//!
//! Everything here is pure: the document re-runs it for every bound connector
//! end after each edit, which is how connectors follow the objects they join.

use egui::Pos2;

use crate::element::{
    AttachRole, Binding, ConnectorEnd, DrawableObject, Element, project_onto_segment,
};

/// Best anchor on `host` for a connector end placed at `raw`.
///
/// * line: source ends snap to the nearer terminal, target ends project
///   perpendicularly onto the segment (clamped to it)
/// * circle, ellipse, rectangle: closest point on the outline
/// * anything else: the raw point itself
pub fn attachment_point(host: &DrawableObject, raw: Pos2, role: AttachRole) -> Pos2 {
    match host {
        DrawableObject::Line(line) => match role {
            AttachRole::Source => line.nearest_endpoint(raw),
            AttachRole::Target => project_onto_segment(raw, line.start, line.end),
        },
        DrawableObject::Circle(circle) => circle.closest_perimeter_point(raw),
        DrawableObject::Ellipse(ellipse) => ellipse.closest_perimeter_point(raw),
        DrawableObject::Rectangle(rect) => rect.closest_perimeter_point(raw),
        DrawableObject::Path(_) | DrawableObject::Connector(_) => raw,
    }
}

/// Build a connector end bound to `host` from a raw pointer position
pub fn bind_end(host: &DrawableObject, raw: Pos2, role: AttachRole) -> ConnectorEnd {
    let binding = Binding {
        host: host.id(),
        role,
        anchor_offset: raw - host.center(),
    };
    ConnectorEnd::bound(attachment_point(host, raw, role), binding)
}

/// Recompute a binding against the host's current geometry
pub fn resolve_binding(host: &DrawableObject, binding: &Binding) -> Pos2 {
    attachment_point(host, host.center() + binding.anchor_offset, binding.role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Style, factory};
    use egui::{Rect, Vec2, pos2};

    #[test]
    fn line_source_snaps_to_nearest_terminal() {
        let line = factory::create_line(pos2(0.0, 0.0), pos2(100.0, 0.0), Style::default());
        assert_eq!(attachment_point(&line, pos2(80.0, 12.0), AttachRole::Source), pos2(100.0, 0.0));
        assert_eq!(attachment_point(&line, pos2(10.0, -5.0), AttachRole::Source), pos2(0.0, 0.0));
    }

    #[test]
    fn line_target_projects_onto_segment() {
        let line = factory::create_line(pos2(0.0, 0.0), pos2(100.0, 0.0), Style::default());
        assert_eq!(attachment_point(&line, pos2(40.0, 25.0), AttachRole::Target), pos2(40.0, 0.0));
        assert_eq!(attachment_point(&line, pos2(140.0, 25.0), AttachRole::Target), pos2(100.0, 0.0));
    }

    #[test]
    fn circle_attaches_on_perimeter() {
        let circle = factory::create_circle(pos2(0.0, 0.0), 10.0, Style::default());
        let point = attachment_point(&circle, pos2(30.0, 0.0), AttachRole::Target);
        assert!((point - pos2(10.0, 0.0)).length() < 1e-4);
        let inside = attachment_point(&circle, pos2(0.0, 3.0), AttachRole::Source);
        assert!((inside - pos2(0.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn rectangle_attaches_on_nearest_edge() {
        let rect = factory::create_rectangle(
            Rect::from_min_max(pos2(0.0, 0.0), pos2(40.0, 20.0)),
            Style::default(),
        );
        assert_eq!(attachment_point(&rect, pos2(20.0, 4.0), AttachRole::Target), pos2(20.0, 0.0));
        assert_eq!(attachment_point(&rect, pos2(55.0, 10.0), AttachRole::Target), pos2(40.0, 10.0));
    }

    #[test]
    fn path_falls_back_to_raw_point() {
        let path = factory::create_path(vec![pos2(0.0, 0.0), pos2(10.0, 10.0)], Style::default());
        assert_eq!(attachment_point(&path, pos2(3.0, 7.0), AttachRole::Target), pos2(3.0, 7.0));
    }

    #[test]
    fn binding_follows_moved_host() {
        let mut circle = factory::create_circle(pos2(0.0, 0.0), 10.0, Style::default());
        let end = bind_end(&circle, pos2(20.0, 0.0), AttachRole::Source);
        let binding = end.binding.unwrap();

        circle.translate(Vec2::new(50.0, 0.0));
        let moved = resolve_binding(&circle, &binding);
        assert!((moved - pos2(60.0, 0.0)).length() < 1e-4);
    }
}
