use thiserror::Error;

use crate::element::ObjectId;
use crate::state::InteractionState;

/// Errors that can occur while executing or undoing a command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Object {0} does not exist in the document")]
    ObjectNotFound(ObjectId),

    #[error("Object {0} is already part of the document")]
    DuplicateObject(ObjectId),

    #[error("Index {index} is out of bounds for a document of {len} objects")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Sub-command {index} of macro failed: {source}")]
    Macro {
        index: usize,
        #[source]
        source: Box<CommandError>,
    },
}

/// Result type for command operations
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur during interaction state transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateTransitionError {
    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: InteractionState,
        to: InteractionState,
    },
}

/// Errors raised by tools and the tool manager
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool '{tool}' failed to deactivate cleanly: {reason}")]
    Deactivation { tool: &'static str, reason: String },
}

/// Errors that can occur while loading the editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
