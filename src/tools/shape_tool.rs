use std::any::Any;

use egui::{CursorIcon, Pos2, Rect, Vec2, vec2};

use super::{Preview, Tool, ToolContext, ToolError, ToolResponse};
use crate::element::{DrawableObject, Style, factory};
use crate::state::InteractionState;

/// Which object a [`ShapeTool`] creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Ellipse,
    Line,
}

impl ShapeKind {
    pub fn tool_name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Line => "line",
        }
    }
}

/// Press position and latest pointer position of the shape being drawn
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShapeDrawState {
    pub start: Option<Pos2>,
    pub current: Option<Pos2>,
}

/// Press-drag-release creation of a single shape.
///
/// Rectangles and ellipses span the dragged box, circles are centered on the
/// press point, lines run from press to release. Tiny drags are grown to the
/// minimum size rather than discarded.
#[derive(Debug, Clone)]
pub struct ShapeTool {
    kind: ShapeKind,
    style: Style,
    state: ShapeDrawState,
}

impl ShapeTool {
    pub fn new(kind: ShapeKind) -> Self {
        Self::with_style(kind, Style::default())
    }

    pub fn with_style(kind: ShapeKind, style: Style) -> Self {
        Self {
            kind,
            style,
            state: ShapeDrawState::default(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn state(&self) -> &ShapeDrawState {
        &self.state
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// The object a release at `end` would produce
    pub fn build(&self, start: Pos2, end: Pos2, min_size: f32) -> DrawableObject {
        let style = self.style;
        match self.kind {
            ShapeKind::Rectangle => factory::create_rectangle(clamped_box(start, end, min_size), style),
            ShapeKind::Ellipse => {
                let rect = clamped_box(start, end, min_size);
                factory::create_ellipse(rect.center(), rect.size() * 0.5, style)
            }
            ShapeKind::Circle => {
                let radius = start.distance(end).max(min_size * 0.5);
                factory::create_circle(start, radius, style)
            }
            ShapeKind::Line => {
                let offset = end - start;
                let end = if offset.length() < min_size {
                    let direction = if offset.length_sq() > 0.0 { offset.normalized() } else { Vec2::X };
                    start + direction * min_size
                } else {
                    end
                };
                factory::create_line(start, end, style)
            }
        }
    }

    fn reset(&mut self) {
        self.state = ShapeDrawState::default();
    }
}

/// Box spanned by two corners, grown from its min corner to at least `min_size`
fn clamped_box(a: Pos2, b: Pos2, min_size: f32) -> Rect {
    let rect = Rect::from_two_pos(a, b);
    Rect::from_min_size(
        rect.min,
        vec2(rect.width().max(min_size), rect.height().max(min_size)),
    )
}

impl Tool for ShapeTool {
    fn name(&self) -> &'static str {
        self.kind.tool_name()
    }

    fn on_activate(&mut self) {
        self.reset();
    }

    fn on_deactivate(&mut self) -> Result<(), ToolError> {
        self.reset();
        Ok(())
    }

    fn on_pointer_down(
        &mut self,
        pos: Pos2,
        _hit: Option<&DrawableObject>,
        _ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        self.state = ShapeDrawState {
            start: Some(pos),
            current: Some(pos),
        };
        ToolResponse::transition(InteractionState::Drawing)
    }

    fn on_pointer_move(
        &mut self,
        pos: Pos2,
        _hit: Option<&DrawableObject>,
        _ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        if self.state.start.is_some() {
            self.state.current = Some(pos);
        }
        ToolResponse::none()
    }

    fn on_pointer_up(
        &mut self,
        pos: Pos2,
        _hit: Option<&DrawableObject>,
        ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        let Some(start) = self.state.start else {
            return ToolResponse::none();
        };
        let object = self.build(start, pos, ctx.config.min_shape_size);
        log::debug!("{} tool committing {}", self.name(), object_summary(&object));
        self.reset();
        ToolResponse::transition(InteractionState::Idle).with_commit(object)
    }

    fn preview(&self) -> Option<Preview> {
        let (start, current) = (self.state.start?, self.state.current?);
        Some(Preview::Object(self.build(start, current, 0.0)))
    }

    fn is_idle(&self) -> bool {
        self.state == ShapeDrawState::default()
    }

    fn cursor(&self) -> CursorIcon {
        CursorIcon::Crosshair
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn object_summary(object: &DrawableObject) -> String {
    use crate::element::Element;
    format!("{} {}", object.kind(), object.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use egui::pos2;

    #[test]
    fn circle_radius_is_clamped() {
        let tool = ShapeTool::new(ShapeKind::Circle);
        let object = tool.build(pos2(10.0, 10.0), pos2(10.0, 10.0), 2.0);
        match object {
            DrawableObject::Circle(circle) => assert_eq!(circle.radius, 1.0),
            other => panic!("expected circle, got {:?}", other.kind()),
        }
    }

    #[test]
    fn zero_length_line_gets_minimum_length() {
        let tool = ShapeTool::new(ShapeKind::Line);
        match tool.build(pos2(0.0, 0.0), pos2(0.0, 0.0), 2.0) {
            DrawableObject::Line(line) => assert!((line.length() - 2.0).abs() < 1e-5),
            other => panic!("expected line, got {:?}", other.kind()),
        }
    }

    #[test]
    fn rectangle_spans_drag_in_any_direction() {
        let tool = ShapeTool::new(ShapeKind::Rectangle);
        match tool.build(pos2(50.0, 40.0), pos2(10.0, 20.0), 2.0) {
            DrawableObject::Rectangle(rect) => {
                assert_eq!(rect.rect, Rect::from_min_max(pos2(10.0, 20.0), pos2(50.0, 40.0)))
            }
            other => panic!("expected rectangle, got {:?}", other.kind()),
        }
    }
}
