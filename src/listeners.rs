use crate::consts::CHANGE_EVENT;
use std::collections::HashMap;
use std::fmt;

/// What a user interaction did to the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent<D> {
    /// The selection was explicitly cleared
    Cleared,
    Selected(D),
    SelectedMany(Vec<D>),
}

pub type Listener<D> = Box<dyn FnMut(&ChangeEvent<D>)>;

/// Subscribers keyed by event name, kept in registration order.
///
/// Subscribers live as long as the registry; there is no way to remove one.
pub struct ListenerRegistry<D> {
    listeners: HashMap<String, Vec<Listener<D>>>,
}

impl<D> ListenerRegistry<D> {
    /// Registry with no subscribers
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Appends `callback` to the subscribers of `event`
    pub fn register(&mut self, event: impl Into<String>, callback: impl FnMut(&ChangeEvent<D>) + 'static) {
        self.listeners
            .entry(event.into())
            .or_default()
            .push(Box::new(callback));
    }

    /// Calls every subscriber of `event` in registration order. Returns how
    /// many were called.
    pub fn emit(&mut self, event: &str, payload: &ChangeEvent<D>) -> usize {
        self.listeners.get_mut(event).map_or(0, |subscribers| {
            subscribers.iter_mut().for_each(|callback| callback(payload));
            subscribers.len()
        })
    }

    /// Notifies the `change` subscribers
    pub fn emit_change(&mut self, payload: &ChangeEvent<D>) -> usize {
        self.emit(CHANGE_EVENT, payload)
    }

    /// Number of subscribers registered for `event`
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }
}

impl<D> Default for ListenerRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for ListenerRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (event, subscribers) in &self.listeners {
            map.entry(event, &subscribers.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DateValue;
    use crate::test_utils::date;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_with_no_subscribers() {
        let mut registry = ListenerRegistry::<DateValue>::new();
        assert_eq!(registry.emit_change(&ChangeEvent::Cleared), 0);
        assert_eq!(registry.subscriber_count(CHANGE_EVENT), 0);
    }

    #[test]
    fn test_registration_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::<DateValue>::new();

        for name in ["first", "second", "third"] {
            let calls = Rc::clone(&calls);
            registry.register(CHANGE_EVENT, move |_| calls.borrow_mut().push(name));
        }

        assert_eq!(registry.emit_change(&ChangeEvent::Selected(date(2024, 1, 2))), 3);
        assert_eq!(*calls.borrow(), ["first", "second", "third"]);
    }

    #[test]
    fn test_events_are_separate() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ListenerRegistry::<DateValue>::new();
        {
            let seen = Rc::clone(&seen);
            registry.register("focus", move |event| seen.borrow_mut().push(event.clone()));
        }

        assert_eq!(registry.emit_change(&ChangeEvent::Cleared), 0);
        assert_eq!(registry.emit("focus", &ChangeEvent::Cleared), 1);
        assert_eq!(*seen.borrow(), [ChangeEvent::Cleared]);
    }
}
