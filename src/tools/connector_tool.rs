use std::any::Any;

use egui::{CursorIcon, Key, Pos2};

use super::{Preview, Tool, ToolContext, ToolError, ToolResponse};
use crate::element::{AttachRole, Connector, ConnectorEnd, DrawableObject, Element, ObjectId, ObjectKind, Style};
use crate::geometry::bind_end;
use crate::state::InteractionState;

/// Kinds a connector end can never attach to
const EXCLUDED_HOST_KINDS: &[ObjectKind] = &[ObjectKind::Connector];

/// Source chosen by the first click, waiting for a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSource {
    pub host: ObjectId,
    pub end: ConnectorEnd,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConnectorState {
    pub source: Option<PendingSource>,
    /// Latest pointer position, for the rubber-band preview
    pub cursor: Option<Pos2>,
}

/// Two-click connector placement.
///
/// The first click on a host records the source end and moves to
/// `PlacingConnectorTarget`. A click on a different host commits the connector
/// and returns to `Idle`. Clicking the source again or empty space keeps
/// waiting for a target; only Escape abandons the placement.
#[derive(Debug, Clone, Default)]
pub struct ConnectorTool {
    style: Style,
    state: ConnectorState,
}

impl ConnectorTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: Style) -> Self {
        Self {
            style,
            state: ConnectorState::default(),
        }
    }

    pub fn state(&self) -> &ConnectorState {
        &self.state
    }

    fn reset(&mut self) {
        self.state = ConnectorState::default();
    }
}

impl Tool for ConnectorTool {
    fn name(&self) -> &'static str {
        "connector"
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
        hit: Option<&DrawableObject>,
        _ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        self.state.cursor = Some(pos);

        match (self.state.source, hit) {
            (None, Some(host)) => {
                let end = bind_end(host, pos, AttachRole::Source);
                log::debug!("Connector source bound to {} {}", host.kind(), host.id());
                self.state.source = Some(PendingSource { host: host.id(), end });
                ToolResponse::transition(InteractionState::PlacingConnectorTarget)
            }

            (None, None) => ToolResponse::transition(InteractionState::PlacingConnectorSource),

            (Some(source), Some(host)) if host.id() != source.host => {
                let target = bind_end(host, pos, AttachRole::Target);
                let connector = Connector::new(source.end, target, self.style);
                log::debug!("Connector {} -> {}", source.host, host.id());
                self.reset();
                ToolResponse::transition(InteractionState::Idle).with_commit(connector.into())
            }

            // Same host again, or empty space: keep waiting for a valid target
            (Some(_), _) => {
                log::debug!("Ignoring connector target click without a new host");
                ToolResponse::none()
            }
        }
    }

    fn on_pointer_move(
        &mut self,
        pos: Pos2,
        _hit: Option<&DrawableObject>,
        _ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        if self.state.source.is_some() {
            self.state.cursor = Some(pos);
        }
        ToolResponse::none()
    }

    fn on_pointer_up(
        &mut self,
        _pos: Pos2,
        _hit: Option<&DrawableObject>,
        _ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        ToolResponse::none()
    }

    fn on_key_down(&mut self, key: Key, _ctx: &ToolContext<'_>) -> ToolResponse {
        if key == Key::Escape {
            self.reset();
            return ToolResponse::transition(InteractionState::Idle);
        }
        ToolResponse::none()
    }

    fn preview(&self) -> Option<Preview> {
        let source = self.state.source?;
        let cursor = self.state.cursor?;
        Some(Preview::Polyline(vec![source.end.point, cursor]))
    }

    fn can_accept_object(&self, object: &DrawableObject) -> bool {
        !EXCLUDED_HOST_KINDS.contains(&object.kind())
    }

    fn is_idle(&self) -> bool {
        self.state == ConnectorState::default()
    }

    fn cursor(&self) -> CursorIcon {
        CursorIcon::Crosshair
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
