use std::path::Path;

use crate::config::EditorConfig;
use crate::controller::EditorController;
use crate::panels::{central_panel, tools_panel};
use crate::renderer::Renderer;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "diagram_editor.json";

/// Demo host: a tool panel and a canvas wired into an [`EditorController`]
#[derive(Debug)]
pub struct DiagramApp {
    controller: EditorController,
    renderer: Renderer,
    /// A press started on the canvas and has not been released yet
    pointer_captured: bool,
}

impl Default for DiagramApp {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl DiagramApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_config(load_config(Path::new(CONFIG_FILE)))
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let controller = EditorController::new(config);
        controller.subscribe(|event: &crate::event::EditorEvent| log::trace!("{:?}", event));
        Self {
            controller,
            renderer: Renderer::new(),
            pointer_captured: false,
        }
    }

    pub fn controller(&self) -> &EditorController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut EditorController {
        &mut self.controller
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Feed this frame's pointer, scroll and key input into the controller
    pub fn handle_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let canvas = response.rect;
        let (pointer, pressed, released, modifiers, zoom_delta, events) = ctx.input(|i| {
            (
                i.pointer.interact_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.modifiers,
                i.zoom_delta(),
                i.events.clone(),
            )
        });
        self.controller.set_modifiers(modifiers);

        if let Some(screen) = pointer {
            let local = (screen - canvas.min).to_pos2();
            if response.hovered() && zoom_delta != 1.0 {
                self.controller.zoom_about(local, zoom_delta);
            }

            let world = self.controller.screen_to_world(local);
            if pressed && response.hovered() {
                self.pointer_captured = true;
                self.controller.pointer_down(world);
            } else if released && self.pointer_captured {
                self.pointer_captured = false;
                self.controller.pointer_up(world);
            } else if self.pointer_captured || response.hovered() {
                self.controller.pointer_move(world);
            }
        }

        if ctx.wants_keyboard_input() {
            return;
        }
        for event in events {
            if let egui::Event::Key {
                key,
                pressed,
                modifiers,
                ..
            } = event
            {
                if pressed {
                    self.controller.key_down(key, modifiers);
                } else {
                    self.controller.key_up(key, modifiers);
                }
            }
        }
    }
}

/// Read the config file, falling back to defaults when it is missing or broken
pub fn load_config(path: &Path) -> EditorConfig {
    if !path.exists() {
        return EditorConfig::default();
    }
    match EditorConfig::load(path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(err) => {
            log::warn!("Ignoring {}: {}", path.display(), err);
            EditorConfig::default()
        }
    }
}

impl eframe::App for DiagramApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
