//! Typed event bus for builder-side components.
//!
//! Sibling components react to option-list changes without direct
//! coupling: the view publishes, listeners subscribe. Payloads are typed
//! rather than string-keyed.

use formdesk_model::EntityId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsEvent {
    /// A drag reorder began.
    ReorderStarted { field_id: EntityId },
    /// The drag ended; the order may or may not have changed.
    ReorderFinished { field_id: EntityId },
    /// The option order changed; carries the full new order.
    OrderChanged {
        field_id: EntityId,
        ordered_option_ids: Vec<EntityId>,
    },
    /// A new option row was requested; row construction is up to a
    /// listener, not the view.
    AddOptionRequested { field_id: EntityId },
}

pub trait OptionsListener {
    fn on_event(&mut self, event: &OptionsEvent);
}

impl<F: FnMut(&OptionsEvent)> OptionsListener for F {
    fn on_event(&mut self, event: &OptionsEvent) {
        self(event)
    }
}

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn OptionsListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl OptionsListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn publish(&mut self, event: &OptionsEvent) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn all_listeners_receive_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for _ in 0..2 {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event: &OptionsEvent| {
                seen.borrow_mut().push(event.clone());
            });
        }
        bus.publish(&OptionsEvent::AddOptionRequested { field_id: 7 });
        assert_eq!(seen.borrow().len(), 2);
    }
}
