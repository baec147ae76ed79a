use std::any::Any;

use egui::{CursorIcon, Pos2, Vec2};

use super::{Preview, Tool, ToolContext, ToolError, ToolResponse};
use crate::element::{DrawableObject, Style, factory};
use crate::state::InteractionState;

/// Points below this spacing are not recorded, in document units
const MIN_POINT_SPACING: f32 = 0.5;

/// The freehand path being drawn, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathState {
    pub points: Vec<Pos2>,
}

/// Freehand drawing: every pointer move while pressed adds a point
#[derive(Debug, Clone, Default)]
pub struct PathTool {
    style: Style,
    state: PathState,
}

impl PathTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: Style) -> Self {
        Self {
            style,
            state: PathState::default(),
        }
    }

    pub fn state(&self) -> &PathState {
        &self.state
    }

    fn push_point(&mut self, pos: Pos2) {
        let far_enough = self
            .state
            .points
            .last()
            .is_none_or(|last| last.distance(pos) >= MIN_POINT_SPACING);
        if far_enough {
            self.state.points.push(pos);
        }
    }
}

impl Tool for PathTool {
    fn name(&self) -> &'static str {
        "path"
    }

    fn on_activate(&mut self) {
        self.state = PathState::default();
    }

    fn on_deactivate(&mut self) -> Result<(), ToolError> {
        // Clear any in-progress path
        self.state = PathState::default();
        Ok(())
    }

    fn on_pointer_down(
        &mut self,
        pos: Pos2,
        _hit: Option<&DrawableObject>,
        _ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        self.state.points = vec![pos];
        ToolResponse::transition(InteractionState::Drawing)
    }

    fn on_pointer_move(
        &mut self,
        pos: Pos2,
        _hit: Option<&DrawableObject>,
        _ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        if !self.state.points.is_empty() {
            self.push_point(pos);
        }
        ToolResponse::none()
    }

    fn on_pointer_up(
        &mut self,
        pos: Pos2,
        _hit: Option<&DrawableObject>,
        ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        if self.state.points.is_empty() {
            return ToolResponse::none();
        }
        self.push_point(pos);
        let mut points = std::mem::take(&mut self.state.points);

        // A plain click still leaves a visible dash
        if points.len() < 2 {
            let start = points[0];
            points.push(start + Vec2::X * ctx.config.min_shape_size);
        }

        ToolResponse::transition(InteractionState::Idle)
            .with_commit(factory::create_path(points, self.style))
    }

    fn preview(&self) -> Option<Preview> {
        (self.state.points.len() >= 2).then(|| Preview::Polyline(self.state.points.clone()))
    }

    fn is_idle(&self) -> bool {
        self.state == PathState::default()
    }

    fn cursor(&self) -> CursorIcon {
        CursorIcon::Crosshair
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
