mod commands;
mod history;

pub use commands::Command;
pub use history::{CommandHistory, DEFAULT_HISTORY_DEPTH};

pub use crate::error::{CommandError, CommandResult};
