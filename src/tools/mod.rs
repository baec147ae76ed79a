use std::any::Any;

use egui::{CursorIcon, Key, Modifiers, Pos2, Vec2};

use crate::command::Command;
use crate::config::EditorConfig;
use crate::document::Document;
use crate::element::{DrawableObject, ObjectId};
use crate::geometry::screen_radius_to_world;
use crate::selection::Selection;
use crate::state::InteractionState;

pub use crate::error::ToolError;

mod connector_tool;
mod manager;
mod pan_tool;
mod path_tool;
pub mod preview;
mod select_tool;
mod shape_tool;

pub use connector_tool::{ConnectorState, ConnectorTool, PendingSource};
pub use manager::ToolManager;
pub use pan_tool::{PanState, PanTool};
pub use path_tool::{PathState, PathTool};
pub use preview::{Preview, PreviewSurface, RecordingSurface};
pub use select_tool::{SelectState, SelectTool};
pub use shape_tool::{ShapeDrawState, ShapeKind, ShapeTool};

/// Everything a tool may read while handling an event.
///
/// Tools never mutate the document directly; they describe the change in a
/// [`ToolResponse`] and the controller runs it through the command history.
#[derive(Clone, Copy)]
pub struct ToolContext<'a> {
    pub document: &'a Document,
    pub selection: &'a Selection,
    pub config: &'a EditorConfig,
    pub state: InteractionState,
    pub zoom: f32,
    pub modifiers: Modifiers,
}

impl<'a> ToolContext<'a> {
    /// Hit tolerance in document units
    pub fn hit_tolerance(&self) -> f32 {
        screen_radius_to_world(self.config.hit_tolerance_px, self.zoom)
    }

    /// Pointer travel below which a drag counts as a click, in document units
    pub fn drag_threshold(&self) -> f32 {
        screen_radius_to_world(self.config.drag_threshold_px, self.zoom)
    }

    pub fn handle_radius(&self) -> f32 {
        screen_radius_to_world(self.config.handle_radius_px, self.zoom)
    }
}

/// Selection change requested by a tool
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionUpdate {
    Replace(Vec<ObjectId>),
    Add(Vec<ObjectId>),
    Toggle(ObjectId),
    Clear,
}

/// What a tool wants to happen after handling an event.
///
/// The controller applies the transition first; if the state machine rejects
/// it, everything else in the response is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolResponse {
    pub transition: Option<InteractionState>,
    /// A newly created object to add on top of the document
    pub committed: Option<DrawableObject>,
    /// Any other edit, such as a move or a resize
    pub command: Option<Command>,
    pub selection: Option<SelectionUpdate>,
    /// View translation in document units
    pub pan: Option<Vec2>,
}

impl ToolResponse {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn transition(state: InteractionState) -> Self {
        Self {
            transition: Some(state),
            ..Self::default()
        }
    }

    pub fn with_transition(mut self, state: InteractionState) -> Self {
        self.transition = Some(state);
        self
    }

    pub fn with_commit(mut self, object: DrawableObject) -> Self {
        self.committed = Some(object);
        self
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    pub fn with_selection(mut self, update: SelectionUpdate) -> Self {
        self.selection = Some(update);
        self
    }

    pub fn with_pan(mut self, delta: Vec2) -> Self {
        self.pan = Some(delta);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Tool trait defines the interface for all editing modes.
///
/// A tool keeps its in-progress interaction in a private state value. That
/// value must be back to its default after `on_deactivate`, so nothing leaks
/// into the next activation.
pub trait Tool: Any {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Called when the tool becomes current
    fn on_activate(&mut self) {}

    /// Called when the tool stops being current. Must clear all private state,
    /// even when reporting an error.
    fn on_deactivate(&mut self) -> Result<(), ToolError>;

    fn on_pointer_down(
        &mut self,
        pos: Pos2,
        hit: Option<&DrawableObject>,
        ctx: &ToolContext<'_>,
    ) -> ToolResponse;

    fn on_pointer_move(
        &mut self,
        pos: Pos2,
        hit: Option<&DrawableObject>,
        ctx: &ToolContext<'_>,
    ) -> ToolResponse;

    fn on_pointer_up(
        &mut self,
        pos: Pos2,
        hit: Option<&DrawableObject>,
        ctx: &ToolContext<'_>,
    ) -> ToolResponse;

    fn on_key_down(&mut self, _key: Key, _ctx: &ToolContext<'_>) -> ToolResponse {
        ToolResponse::none()
    }

    /// Current ephemeral feedback, if an interaction is in progress
    fn preview(&self) -> Option<Preview> {
        None
    }

    fn render_preview(&self, surface: &mut dyn PreviewSurface) {
        if let Some(preview) = self.preview() {
            preview.render(surface);
        }
    }

    /// Whether `object` may be the target of this tool's pointer events.
    /// Everything is accepted unless a tool excludes it.
    fn can_accept_object(&self, _object: &DrawableObject) -> bool {
        true
    }

    /// True when the private state equals its post-construction default
    fn is_idle(&self) -> bool;

    fn cursor(&self) -> CursorIcon {
        CursorIcon::Default
    }

    /// Convert to Any for downcasting
    fn as_any(&self) -> &dyn Any;
}
