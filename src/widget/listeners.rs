use crate::*;

use super::WidgetState;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// This event is passed to geometry listeners (see `Widget::subscribe_geometry`)
/// whenever the position or the size of the watched `Widget` changes.
///
/// Writes that leave the old value unchanged do not produce an event.
#[derive(Copy, Clone, Debug)]
pub enum GeometryChangeEvent {
    /// The position of the widget changed `from` the old position `to` the new one
    Position { from: Position, to: Position },
    /// The size of the widget changed `from` the old size `to` the new one
    Size { from: Size, to: Size },
}

pub(crate) type GeometryCallback = Rc<dyn Fn(&GeometryChangeEvent)>;

/// The listener registry of a single `Widget`. Each entry pairs an id with a
/// callback; the id is owned by the `GeometrySubscription` that was handed out
/// when the callback was registered.
pub(crate) struct GeometryListeners {
    next_id: u64,
    entries: Vec<ListenerEntry>,
}

struct ListenerEntry {
    id: u64,
    callback: GeometryCallback,
}

impl GeometryListeners {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, callback: GeometryCallback) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(ListenerEntry { id, callback });
        id
    }

    /// Removes the listener with the given id. Returns true if there was such a
    /// listener and false if not (for instance because it was removed before).
    pub(crate) fn remove(&mut self, id: u64) -> bool {
        let old_length = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != old_length
    }

    /// Copies the current callbacks into a plain `Vec`, so that the caller can
    /// invoke them *after* releasing its borrow on the widget state. Listeners
    /// may therefore read the widget, mutate other widgets or cancel
    /// subscriptions while being notified. A cancellation during notification
    /// takes effect from the next notification onwards.
    pub(crate) fn snapshot(&self) -> Vec<GeometryCallback> {
        self.entries
            .iter()
            .map(|entry| Rc::clone(&entry.callback))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn count(&self) -> usize {
        self.entries.len()
    }
}

/// The handle for a single geometry listener registration, returned by
/// `Widget::subscribe_geometry`.
///
/// The subscription stays active for as long as this handle is alive: dropping
/// the handle (or calling `cancel`) removes the listener from the widget. This
/// makes re-targeting a plain assignment: replacing the stored handle with a
/// new one drops the old registration before the new one is used.
///
/// Each handle owns exactly one registration, so cancelling twice is impossible
/// by construction. Cancelling after the watched widget was dropped is a no-op.
pub struct GeometrySubscription {
    widget: Weak<RefCell<WidgetState>>,
    id: u64,
}

impl GeometrySubscription {
    pub(crate) fn new(widget: Weak<RefCell<WidgetState>>, id: u64) -> Self {
        Self { widget, id }
    }

    /// Cancels this subscription: the callback will no longer be invoked. This
    /// consumes the handle; simply dropping it has the same effect.
    pub fn cancel(self) {
        // The Drop implementation does the actual work
    }
}

impl Drop for GeometrySubscription {
    fn drop(&mut self) {
        if let Some(state) = self.widget.upgrade() {
            state.borrow_mut().listeners.remove(self.id);
        }
    }
}
