mod interaction;
mod machine;

pub use interaction::InteractionState;
pub use machine::{StateListener, StateMachine};

pub use crate::error::StateTransitionError;
