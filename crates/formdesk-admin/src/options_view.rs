//! Ordered option rows for one choice field, bound to a reorderable list.

use formdesk_model::{EntityId, OptionRow};

use crate::events::{EventBus, OptionsEvent};

#[derive(Debug, Clone)]
pub struct OptionsListView {
    field_id: EntityId,
    options: Vec<OptionRow>,
}

impl OptionsListView {
    pub fn new(field_id: EntityId, mut options: Vec<OptionRow>) -> Self {
        options.sort_by_key(|option| option.order);
        Self { field_id, options }
    }

    pub fn field_id(&self) -> EntityId {
        self.field_id
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[OptionRow] {
        &self.options
    }

    /// Apply a drag reorder. Emits the lifecycle events in order
    /// (started, finished, changed) and rewrites the order positions from
    /// the received id sequence. Ids not in the view are ignored; rows
    /// missing from the sequence keep their relative order at the end.
    pub fn apply_reorder(&mut self, ordered_ids: &[EntityId], bus: &mut EventBus) {
        bus.publish(&OptionsEvent::ReorderStarted {
            field_id: self.field_id,
        });
        self.options.sort_by_key(|option| {
            ordered_ids
                .iter()
                .position(|id| *id == option.id)
                .unwrap_or(usize::MAX)
        });
        for (position, option) in self.options.iter_mut().enumerate() {
            option.order = position as u32 + 1;
        }
        bus.publish(&OptionsEvent::ReorderFinished {
            field_id: self.field_id,
        });
        bus.publish(&OptionsEvent::OrderChanged {
            field_id: self.field_id,
            ordered_option_ids: self.options.iter().map(|option| option.id).collect(),
        });
    }

    /// Ask for a new option row. Construction is delegated to whichever
    /// listener handles the request; the view only announces it.
    pub fn request_add(&self, bus: &mut EventBus) {
        bus.publish(&OptionsEvent::AddOptionRequested {
            field_id: self.field_id,
        });
    }

    /// Append a row built by a listener in response to an add request.
    pub fn push_row(&mut self, mut row: OptionRow) {
        row.order = self.options.len() as u32 + 1;
        self.options.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn option(id: EntityId, label: &str, order: u32) -> OptionRow {
        OptionRow {
            id,
            label: label.to_string(),
            value: label.to_lowercase(),
            calc: String::new(),
            selected: false,
            order,
        }
    }

    #[test]
    fn reorder_emits_lifecycle_in_order() {
        let mut view = OptionsListView::new(
            7,
            vec![option(1, "A", 1), option(2, "B", 2), option(3, "C", 3)],
        );
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event: &OptionsEvent| {
                seen.borrow_mut().push(event.clone());
            });
        }

        view.apply_reorder(&[3, 1, 2], &mut bus);

        let events = seen.borrow();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], OptionsEvent::ReorderStarted { field_id: 7 });
        assert_eq!(events[1], OptionsEvent::ReorderFinished { field_id: 7 });
        assert_eq!(
            events[2],
            OptionsEvent::OrderChanged {
                field_id: 7,
                ordered_option_ids: vec![3, 1, 2],
            }
        );
    }

    #[test]
    fn reorder_rewrites_positions() {
        let mut view = OptionsListView::new(7, vec![option(1, "A", 1), option(2, "B", 2)]);
        let mut bus = EventBus::new();
        view.apply_reorder(&[2, 1], &mut bus);
        let orders: Vec<(EntityId, u32)> =
            view.rows().iter().map(|row| (row.id, row.order)).collect();
        assert_eq!(orders, vec![(2, 1), (1, 2)]);
    }

    #[test]
    fn add_is_delegated_to_a_listener() {
        let view = Rc::new(RefCell::new(OptionsListView::new(
            9,
            vec![option(1, "A", 1)],
        )));
        let mut bus = EventBus::new();
        {
            let view = Rc::clone(&view);
            bus.subscribe(move |event: &OptionsEvent| {
                if let OptionsEvent::AddOptionRequested { field_id } = event {
                    assert_eq!(*field_id, 9);
                    view.borrow_mut().push_row(option(2, "B", 0));
                }
            });
        }
        let request_view = view.borrow().clone();
        request_view.request_add(&mut bus);
        assert_eq!(view.borrow().rows().len(), 2);
        assert_eq!(view.borrow().rows()[1].order, 2);
    }
}
