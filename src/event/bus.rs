use std::cell::RefCell;
use std::rc::Rc;

use crate::event::{EditorEvent, EventHandler};

/// A simple event bus for broadcasting editor events to registered handlers.
///
/// Clones share the same handler list, so a clone can be handed to the state
/// machine's listener and still reach every subscriber.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Rc<RefCell<Vec<Box<dyn EventHandler>>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.handlers.try_borrow().map(|handlers| handlers.len()).unwrap_or(0);
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", count))
            .finish()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        match self.handlers.try_borrow_mut() {
            Ok(mut handlers) => handlers.push(Box::new(handler)),
            Err(_) => log::warn!("Cannot subscribe from inside an event handler"),
        }
    }

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: EditorEvent) {
        log::trace!("Event: {:?}", event);
        let Ok(mut handlers) = self.handlers.try_borrow_mut() else {
            log::warn!("Dropping re-entrant event {:?}", event);
            return;
        };
        for handler in handlers.iter_mut() {
            handler.handle_event(&event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.try_borrow().map(|handlers| handlers.len()).unwrap_or(0)
    }
}
