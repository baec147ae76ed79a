use super::InteractionState;
use crate::error::StateTransitionError;

/// Callback invoked with `(old, new)` after every successful transition
pub type StateListener = Box<dyn FnMut(InteractionState, InteractionState)>;

/// Owns the current [`InteractionState`] and enforces the transition table.
///
/// A rejected transition leaves the state untouched and is logged; listeners
/// only hear about transitions that actually happened.
pub struct StateMachine {
    current: InteractionState,
    listeners: Vec<StateListener>,
    rejected: usize,
}

impl std::fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("listeners", &format!("<{} listeners>", self.listeners.len()))
            .field("rejected", &self.rejected)
            .finish()
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            current: InteractionState::Idle,
            listeners: Vec::new(),
            rejected: 0,
        }
    }

    pub fn current(&self) -> InteractionState {
        self.current
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_idle()
    }

    /// Number of transitions refused so far
    pub fn rejected_transitions(&self) -> usize {
        self.rejected
    }

    /// Register a listener for `(old, new)` notifications
    pub fn subscribe(&mut self, listener: impl FnMut(InteractionState, InteractionState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Move to `next` if the table allows it.
    ///
    /// Requesting the current state is a no-op that succeeds without notifying.
    pub fn try_transition(&mut self, next: InteractionState) -> Result<(), StateTransitionError> {
        let from = self.current;
        if from == next {
            return Ok(());
        }
        if !from.can_transition_to(next) {
            self.rejected += 1;
            return Err(StateTransitionError::InvalidTransition { from, to: next });
        }

        self.current = next;
        log::debug!("State {} -> {}", from, next);
        for listener in &mut self.listeners {
            listener(from, next);
        }
        Ok(())
    }

    /// Boolean form of [`Self::try_transition`]; rejections are logged
    pub fn transition(&mut self, next: InteractionState) -> bool {
        match self.try_transition(next) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{}", err);
                false
            }
        }
    }

    /// Return to `Idle`. Always succeeds.
    pub fn reset(&mut self) {
        let accepted = self.transition(InteractionState::Idle);
        debug_assert!(accepted, "Idle must always be reachable");
    }
}
