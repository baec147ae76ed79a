use std::any::Any;

use egui::{CursorIcon, Pos2};

use super::{Tool, ToolContext, ToolError, ToolResponse};
use crate::element::DrawableObject;
use crate::state::InteractionState;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanState {
    /// Document point grabbed on press; it stays under the cursor while panning
    pub anchor: Option<Pos2>,
}

/// Drag the view. Reports pan deltas in document units and never edits the document.
#[derive(Debug, Clone, Default)]
pub struct PanTool {
    state: PanState,
}

impl PanTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PanState {
        &self.state
    }
}

impl Tool for PanTool {
    fn name(&self) -> &'static str {
        "pan"
    }

    fn on_deactivate(&mut self) -> Result<(), ToolError> {
        self.state = PanState::default();
        Ok(())
    }

    fn on_pointer_down(
        &mut self,
        pos: Pos2,
        _hit: Option<&DrawableObject>,
        _ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        self.state.anchor = Some(pos);
        ToolResponse::transition(InteractionState::Panning)
    }

    fn on_pointer_move(
        &mut self,
        pos: Pos2,
        _hit: Option<&DrawableObject>,
        _ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        match self.state.anchor {
            Some(anchor) if pos != anchor => ToolResponse::none().with_pan(pos - anchor),
            _ => ToolResponse::none(),
        }
    }

    fn on_pointer_up(
        &mut self,
        _pos: Pos2,
        _hit: Option<&DrawableObject>,
        _ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        if self.state.anchor.take().is_none() {
            return ToolResponse::none();
        }
        ToolResponse::transition(InteractionState::Idle)
    }

    fn is_idle(&self) -> bool {
        self.state == PanState::default()
    }

    fn cursor(&self) -> CursorIcon {
        if self.state.anchor.is_some() {
            CursorIcon::Grabbing
        } else {
            CursorIcon::Grab
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
