use std::panic::{AssertUnwindSafe, catch_unwind};

use egui::{CursorIcon, Key, Pos2};

use super::{
    ConnectorTool, PanTool, PathTool, PreviewSurface, SelectTool, ShapeKind, ShapeTool, Tool,
    ToolContext, ToolError, ToolResponse,
};
use crate::element::{DrawableObject, ObjectId};

/// Owns every registered tool and which one is current.
///
/// Tools are only reachable through the manager, so at most one of them is
/// handling input at any time. Switching always finishes the outgoing tool's
/// deactivation before the incoming tool is activated.
pub struct ToolManager {
    tools: Vec<Box<dyn Tool>>,
    current: usize,
}

impl std::fmt::Debug for ToolManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolManager")
            .field("tools", &self.tool_names())
            .field("current", &self.current_name())
            .finish()
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::with_default_tools()
    }
}

impl ToolManager {
    /// A manager with a single tool, which is current
    pub fn new(initial: Box<dyn Tool>) -> Self {
        let mut manager = Self {
            tools: vec![initial],
            current: 0,
        };
        manager.tools[0].on_activate();
        manager
    }

    /// Select tool current, plus the shape, path, pan and connector tools
    pub fn with_default_tools() -> Self {
        let mut manager = Self::new(Box::new(SelectTool::new()));
        for kind in [
            ShapeKind::Rectangle,
            ShapeKind::Circle,
            ShapeKind::Ellipse,
            ShapeKind::Line,
        ] {
            manager.register(Box::new(ShapeTool::new(kind)));
        }
        manager.register(Box::new(PathTool::new()));
        manager.register(Box::new(PanTool::new()));
        manager.register(Box::new(ConnectorTool::new()));
        manager
    }

    /// Add a tool, replacing any registered tool with the same name
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name();
        match self.position(name) {
            Some(index) => {
                let is_current = index == self.current;
                if is_current {
                    Self::deactivate_safely(self.tools[index].as_mut());
                }
                self.tools[index] = tool;
                if is_current {
                    self.tools[index].on_activate();
                }
                log::debug!("Replaced tool '{}'", name);
            }
            None => {
                self.tools.push(tool);
                log::debug!("Registered tool '{}'", name);
            }
        }
    }

    pub fn current(&self) -> &dyn Tool {
        self.tools[self.current].as_ref()
    }

    pub fn current_name(&self) -> &'static str {
        self.current().name()
    }

    pub fn tool(&self, name: &str) -> Option<&dyn Tool> {
        self.position(name).map(|index| self.tools[index].as_ref())
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Make `name` the current tool.
    ///
    /// An unknown name leaves the current tool active. Switching to the current
    /// tool resets it.
    pub fn switch_to(&mut self, name: &str) -> Result<(), ToolError> {
        let Some(index) = self.position(name) else {
            log::warn!("Unknown tool '{}', keeping '{}'", name, self.current_name());
            return Err(ToolError::UnknownTool(name.to_string()));
        };

        let previous = self.current_name();
        Self::deactivate_safely(self.tools[self.current].as_mut());
        self.current = index;
        self.tools[index].on_activate();
        log::info!("Tool switched from '{}' to '{}'", previous, name);
        Ok(())
    }

    /// Abandon whatever the current tool is doing
    pub fn cancel(&mut self) {
        let tool = self.tools[self.current].as_mut();
        Self::deactivate_safely(tool);
        tool.on_activate();
        log::debug!("Cancelled '{}'", tool.name());
    }

    pub fn dispatch_pointer_down(
        &mut self,
        pos: Pos2,
        candidates: &[ObjectId],
        ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        let hit = self.accepted_hit(candidates, ctx);
        self.tools[self.current].on_pointer_down(pos, hit, ctx)
    }

    pub fn dispatch_pointer_move(
        &mut self,
        pos: Pos2,
        candidates: &[ObjectId],
        ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        let hit = self.accepted_hit(candidates, ctx);
        self.tools[self.current].on_pointer_move(pos, hit, ctx)
    }

    pub fn dispatch_pointer_up(
        &mut self,
        pos: Pos2,
        candidates: &[ObjectId],
        ctx: &ToolContext<'_>,
    ) -> ToolResponse {
        let hit = self.accepted_hit(candidates, ctx);
        self.tools[self.current].on_pointer_up(pos, hit, ctx)
    }

    pub fn dispatch_key_down(&mut self, key: Key, ctx: &ToolContext<'_>) -> ToolResponse {
        self.tools[self.current].on_key_down(key, ctx)
    }

    pub fn render_preview(&self, surface: &mut dyn PreviewSurface) {
        self.current().render_preview(surface);
    }

    pub fn cursor(&self) -> CursorIcon {
        self.current().cursor()
    }

    /// The topmost candidate the current tool is willing to act on
    fn accepted_hit<'d>(&self, candidates: &[ObjectId], ctx: &ToolContext<'d>) -> Option<&'d DrawableObject> {
        let document = ctx.document;
        let tool = self.current();
        candidates
            .iter()
            .filter_map(|id| document.get(*id))
            .find(|object| tool.can_accept_object(object))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tools.iter().position(|tool| tool.name() == name)
    }

    /// Run the deactivation hook, logging instead of propagating any failure
    /// so a misbehaving tool can never block a switch.
    fn deactivate_safely(tool: &mut dyn Tool) {
        let name = tool.name();
        match catch_unwind(AssertUnwindSafe(|| tool.on_deactivate())) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => log::error!("{}", err),
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::error!(
                    "{}",
                    ToolError::Deactivation {
                        tool: name,
                        reason
                    }
                );
            }
        }
    }
}
