use egui::{CursorIcon, Key, Modifiers, Pos2, Vec2, pos2};

use crate::command::{Command, CommandHistory, CommandResult};
use crate::config::EditorConfig;
use crate::document::Document;
use crate::element::{DrawableObject, ObjectId};
use crate::event::{EditorEvent, EventBus, EventHandler};
use crate::geometry::{HitMode, HitTestOptions, hits_at};
use crate::selection::Selection;
use crate::state::{InteractionState, StateMachine};
use crate::tools::{PreviewSurface, SelectionUpdate, ToolContext, ToolManager, ToolResponse};

const MIN_ZOOM: f32 = 0.05;
const MAX_ZOOM: f32 = 20.0;

/// Mapping between screen and document coordinates.
///
/// `world = screen / zoom - pan`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        pos2(screen.x / self.zoom, screen.y / self.zoom) - self.pan
    }

    pub fn world_to_screen(&self, world: Pos2) -> Pos2 {
        ((world + self.pan).to_vec2() * self.zoom).to_pos2()
    }

    /// Zoom by `factor` keeping the document point under `screen` fixed
    pub fn zoom_about(&mut self, screen: Pos2, factor: f32) {
        let anchor = self.screen_to_world(screen);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pos2(screen.x / self.zoom, screen.y / self.zoom) - anchor;
    }
}

/// The host-facing boundary of the editor.
///
/// Owns the document and everything that may change it, takes pointer and key
/// events in document coordinates, and applies what the current tool asks
/// for: a state transition first, then selection, commits and commands.
#[derive(Debug)]
pub struct EditorController {
    document: Document,
    history: CommandHistory,
    state: StateMachine,
    tools: ToolManager,
    selection: Selection,
    config: EditorConfig,
    viewport: Viewport,
    modifiers: Modifiers,
    events: EventBus,
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorController {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_tools(config, ToolManager::with_default_tools())
    }

    pub fn with_tools(config: EditorConfig, tools: ToolManager) -> Self {
        let events = EventBus::new();
        let mut state = StateMachine::new();
        let bus = events.clone();
        state.subscribe(move |old, new| bus.emit(EditorEvent::StateChanged { old, new }));

        Self {
            document: Document::new(),
            history: CommandHistory::new(config.history_depth),
            state,
            tools,
            selection: Selection::new(),
            config,
            viewport: Viewport::default(),
            modifiers: Modifiers::NONE,
            events,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn state(&self) -> InteractionState {
        self.state.current()
    }

    pub fn state_machine(&self) -> &StateMachine {
        &self.state
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn current_tool(&self) -> &'static str {
        self.tools.current_name()
    }

    pub fn cursor(&self) -> CursorIcon {
        self.tools.cursor()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<String> {
        self.history.undo_label()
    }

    pub fn redo_label(&self) -> Option<String> {
        self.history.redo_label()
    }

    /// Register a handler for advisory editor events
    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        self.events.subscribe(handler);
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.viewport.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_about(&mut self, screen: Pos2, factor: f32) {
        self.viewport.zoom_about(screen, factor);
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        self.viewport.screen_to_world(screen)
    }

    /// All objects under `pos`, topmost first. Holding the precision modifier
    /// switches from bounding boxes to exact geometry.
    pub fn hits_at(&self, pos: Pos2) -> Vec<ObjectId> {
        let mode = if self.config.precision_modifier.is_held(self.modifiers) {
            HitMode::Precision
        } else {
            HitMode::BoundingBox
        };
        let options = HitTestOptions::from_config(&self.config, self.viewport.zoom, mode);
        hits_at(&self.document, pos, &options)
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        let candidates = self.hits_at(pos);
        let ctx = tool_context(
            &self.document,
            &self.selection,
            &self.config,
            self.state.current(),
            self.viewport.zoom,
            self.modifiers,
        );
        let response = self.tools.dispatch_pointer_down(pos, &candidates, &ctx);
        if self.apply_response(response) {
            self.remember_click(pos, candidates);
        }
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        let candidates = self.hits_at(pos);
        let ctx = tool_context(
            &self.document,
            &self.selection,
            &self.config,
            self.state.current(),
            self.viewport.zoom,
            self.modifiers,
        );
        let response = self.tools.dispatch_pointer_move(pos, &candidates, &ctx);
        self.apply_response(response);
    }

    pub fn pointer_up(&mut self, pos: Pos2) {
        let candidates = self.hits_at(pos);
        let ctx = tool_context(
            &self.document,
            &self.selection,
            &self.config,
            self.state.current(),
            self.viewport.zoom,
            self.modifiers,
        );
        let response = self.tools.dispatch_pointer_up(pos, &candidates, &ctx);
        self.apply_response(response);
    }

    /// Editor shortcuts first, everything else goes to the current tool
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) {
        self.modifiers = modifiers;
        match key {
            Key::Escape => self.cancel(),
            Key::Tab => {
                self.cycle_selection();
            }
            Key::Delete | Key::Backspace => {
                self.delete_selection();
            }
            Key::Z if modifiers.command && modifiers.shift => {
                self.redo();
            }
            Key::Z if modifiers.command => {
                self.undo();
            }
            Key::Y if modifiers.command => {
                self.redo();
            }
            _ => {
                let ctx = tool_context(
                    &self.document,
                    &self.selection,
                    &self.config,
                    self.state.current(),
                    self.viewport.zoom,
                    self.modifiers,
                );
                let response = self.tools.dispatch_key_down(key, &ctx);
                self.apply_response(response);
            }
        }
    }

    pub fn key_up(&mut self, _key: Key, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Make `name` the current tool. Returns false for an unknown name.
    pub fn select_tool(&mut self, name: &str) -> bool {
        let old = self.tools.current_name();
        if self.tools.switch_to(name).is_err() {
            return false;
        }
        self.state.reset();
        self.selection.invalidate_overlap();
        self.events.emit(EditorEvent::ToolChanged {
            old,
            new: self.tools.current_name(),
        });
        true
    }

    /// Abandon the current interaction: tool state cleared, back to Idle
    pub fn cancel(&mut self) {
        if !self.state.is_idle() || !self.tools.current().is_idle() {
            log::debug!("Cancelling {} in '{}'", self.state.current(), self.tools.current_name());
        }
        self.tools.cancel();
        self.state.reset();
    }

    /// Run a command through the history, e.g. a style change made by the host
    pub fn execute(&mut self, command: Command) -> CommandResult {
        let result = self.history.execute(command, &mut self.document);
        self.after_document_change();
        result
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_if_busy();
        let undone = self.history.undo(&mut self.document);
        self.after_document_change();
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_if_busy();
        let redone = self.history.redo(&mut self.document);
        self.after_document_change();
        redone
    }

    /// Select the next object under the last click. Returns the newly selected id.
    pub fn cycle_selection(&mut self) -> Option<ObjectId> {
        let next = self.selection.cycle(self.document.version())?;
        log::debug!("Cycled selection to {}", next);
        self.emit_selection();
        Some(next)
    }

    /// Delete the selection and every connector attached to it, as one undo step
    pub fn delete_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.cancel_if_busy();
        let Some(command) = Command::remove_with_dependents(&self.document, self.selection.ids()) else {
            return false;
        };
        let deleted = self.execute(command).is_ok();
        if deleted {
            self.selection.clear();
            self.emit_selection();
        }
        deleted
    }

    /// Replace the document wholesale. Interaction state, tool state, selection
    /// and history are all reset first so undo never crosses a load.
    pub fn load_document(&mut self, objects: Vec<DrawableObject>) {
        self.tools.cancel();
        self.state.reset();
        self.history.clear();
        self.selection.clear();
        self.document = Document::from_objects(objects);
        log::info!("Loaded document with {} objects", self.document.len());
        self.events.emit(EditorEvent::DocumentLoaded {
            object_count: self.document.len(),
        });
        self.emit_history();
        self.emit_selection();
    }

    pub fn render_preview(&self, surface: &mut dyn PreviewSurface) {
        self.tools.render_preview(surface);
    }

    /// Apply a tool response. Returns false if its transition was rejected,
    /// in which case nothing else in it was applied.
    fn apply_response(&mut self, response: ToolResponse) -> bool {
        if let Some(next) = response.transition {
            if let Err(err) = self.state.try_transition(next) {
                log::warn!("{}; cancelling '{}'", err, self.tools.current_name());
                self.tools.cancel();
                self.state.reset();
                return false;
            }
        }

        if let Some(update) = response.selection {
            self.apply_selection(update);
        }

        let mut changed = false;
        if let Some(object) = response.committed {
            changed |= self.history.execute(Command::add(object), &mut self.document).is_ok();
        }
        if let Some(command) = response.command {
            changed |= self.history.execute(command, &mut self.document).is_ok();
        }
        if changed {
            self.after_document_change();
        }

        if let Some(delta) = response.pan {
            self.viewport.pan += delta;
        }
        true
    }

    fn apply_selection(&mut self, update: SelectionUpdate) {
        match update {
            SelectionUpdate::Replace(ids) => self.selection.set(ids),
            SelectionUpdate::Add(ids) => self.selection.add(ids),
            SelectionUpdate::Toggle(id) => {
                self.selection.toggle(id);
                self.selection.invalidate_overlap();
            }
            SelectionUpdate::Clear => self.selection.clear(),
        }
        self.emit_selection();
    }

    /// Keep the hit list of a click that selected one of its hits, for cycling
    fn remember_click(&mut self, pos: Pos2, candidates: Vec<ObjectId>) {
        match self.selection.single() {
            Some(id) if candidates.contains(&id) => {
                self.selection
                    .remember_overlap(pos, candidates, self.document.version());
            }
            _ => self.selection.invalidate_overlap(),
        }
    }

    fn cancel_if_busy(&mut self) {
        if !self.state.is_idle() {
            self.cancel();
        }
    }

    fn after_document_change(&mut self) {
        if self.selection.retain_existing(&self.document) {
            self.emit_selection();
        }
        self.emit_history();
    }

    fn emit_selection(&self) {
        self.events.emit(EditorEvent::SelectionChanged {
            ids: self.selection.ids().to_vec(),
        });
    }

    fn emit_history(&self) {
        self.events.emit(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }
}

fn tool_context<'a>(
    document: &'a Document,
    selection: &'a Selection,
    config: &'a EditorConfig,
    state: InteractionState,
    zoom: f32,
    modifiers: Modifiers,
) -> ToolContext<'a> {
    ToolContext {
        document,
        selection,
        config,
        state,
        zoom,
        modifiers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_round_trips_points() {
        let viewport = Viewport {
            zoom: 2.0,
            pan: egui::vec2(10.0, -5.0),
        };
        let world = pos2(3.0, 4.0);
        let screen = viewport.world_to_screen(world);
        assert_eq!(screen, pos2(26.0, -2.0));
        assert_eq!(viewport.screen_to_world(screen), world);
    }

    #[test]
    fn zoom_keeps_anchor_under_cursor() {
        let mut viewport = Viewport::default();
        let screen = pos2(100.0, 50.0);
        let before = viewport.screen_to_world(screen);
        viewport.zoom_about(screen, 2.0);
        let after = viewport.screen_to_world(screen);
        assert!((before - after).length() < 1e-4);
    }
}
