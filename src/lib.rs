#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod config;
pub mod controller;
pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod panels;
pub mod renderer;
pub mod selection;
pub mod state;
pub mod tools;

pub use app::DiagramApp;
pub use command::{Command, CommandHistory};
pub use config::EditorConfig;
pub use controller::{EditorController, Viewport};
pub use document::Document;
pub use element::{DrawableObject, Element, ObjectId, ObjectKind};
pub use renderer::Renderer;
pub use selection::Selection;
pub use state::{InteractionState, StateMachine};
pub use tools::{Tool, ToolManager};
