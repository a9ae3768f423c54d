use crate::*;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

mod error;
mod listeners;

pub use error::*;
pub use listeners::*;

type RR<T> = Rc<RefCell<T>>;
type WR<T> = Weak<RefCell<T>>;

pub(crate) struct WidgetState {
    position: Position,
    size: Size,
    child_capacity: Option<usize>,
    children: Vec<Widget>,
    pub(crate) listeners: GeometryListeners,
}

/// A minimal widget base: a rectangle with an observable position and size, and
/// a (possibly capacity-bounded) list of child widgets.
///
/// `Widget` is a cheaply clonable *handle*: cloning it yields another handle to
/// the same widget, much like the `Rc<RefCell<..>>` entries that flat menus use
/// to share their components. Use `ptr_eq` to test whether two handles refer to
/// the same widget and `downgrade` to obtain a non-owning `WidgetRef`.
///
/// Everything here is single-threaded. A call to `set_position` or `set_size`
/// synchronously notifies every geometry listener before it returns, so all
/// dependent recomputation is finished by the time the write call ends.
#[derive(Clone)]
pub struct Widget {
    state: RR<WidgetState>,
}

impl Widget {
    /// Constructs a new widget at position `(0, 0)` with size `(0, 0)` and no
    /// bound on the number of children.
    pub fn new() -> Self {
        Self::create(None)
    }

    /// Constructs a new widget that accepts at most `capacity` children: any
    /// `add_child` call beyond that fails with a `TooManyChildrenError`.
    pub fn with_child_capacity(capacity: usize) -> Self {
        Self::create(Some(capacity))
    }

    fn create(child_capacity: Option<usize>) -> Self {
        Self {
            state: Rc::new(RefCell::new(WidgetState {
                position: Position::new(0.0, 0.0),
                size: Size::new(0.0, 0.0),
                child_capacity,
                children: Vec::new(),
                listeners: GeometryListeners::new(),
            })),
        }
    }

    /// Gets the current position of this widget.
    pub fn get_position(&self) -> Position {
        self.state.borrow().position
    }

    /// Gets the current size of this widget.
    pub fn get_size(&self) -> Size {
        self.state.borrow().size
    }

    /// Moves this widget to `new_position` and synchronously notifies all
    /// geometry listeners. Writing the position the widget already has is a
    /// no-op: no listener will be notified.
    pub fn set_position(&self, new_position: Position) {
        let snapshot;
        let event;
        {
            let mut state = self.state.borrow_mut();
            if state.position == new_position {
                return;
            }
            event = GeometryChangeEvent::Position {
                from: state.position,
                to: new_position,
            };
            state.position = new_position;
            snapshot = state.listeners.snapshot();
        }
        // The borrow is released before the listeners run, so they can read
        // this widget or mutate other widgets
        for callback in snapshot {
            callback(&event);
        }
    }

    /// Resizes this widget to `new_size` and synchronously notifies all
    /// geometry listeners. Writing the size the widget already has is a no-op.
    pub fn set_size(&self, new_size: Size) {
        let snapshot;
        let event;
        {
            let mut state = self.state.borrow_mut();
            if state.size == new_size {
                return;
            }
            event = GeometryChangeEvent::Size {
                from: state.size,
                to: new_size,
            };
            state.size = new_size;
            snapshot = state.listeners.snapshot();
        }
        for callback in snapshot {
            callback(&event);
        }
    }

    /// Adds `child` to this widget.
    ///
    /// If this widget was created with a child capacity and that capacity is
    /// already reached, this fails with a `TooManyChildrenError` and the
    /// existing children are left untouched.
    pub fn add_child(&self, child: Widget) -> Result<(), TooManyChildrenError> {
        let mut state = self.state.borrow_mut();
        if let Some(capacity) = state.child_capacity {
            if state.children.len() >= capacity {
                return Err(TooManyChildrenError {
                    child_capacity: capacity,
                });
            }
        }
        state.children.push(child);
        Ok(())
    }

    /// Removes `child` from this widget. Returns true if the child was found
    /// (and removed) and false if it wasn't a child of this widget at all.
    pub fn remove_child(&self, child: &Widget) -> bool {
        let mut state = self.state.borrow_mut();
        let old_length = state.children.len();
        state.children.retain(|candidate| !candidate.ptr_eq(child));
        state.children.len() != old_length
    }

    /// Gets the child at the given index, or `None` if there is no such child.
    /// Children keep the order in which they were added.
    pub fn get_child(&self, index: usize) -> Option<Widget> {
        self.state.borrow().children.get(index).cloned()
    }

    /// Gets the current number of children of this widget.
    pub fn get_child_count(&self) -> usize {
        self.state.borrow().children.len()
    }

    /// Registers `on_change` to be called whenever the position or size of this
    /// widget changes, and returns the handle that owns the registration.
    ///
    /// The listener stays registered for as long as the returned
    /// `GeometrySubscription` is alive; see its documentation for the
    /// cancellation rules.
    pub fn subscribe_geometry(
        &self,
        on_change: impl Fn(&GeometryChangeEvent) + 'static,
    ) -> GeometrySubscription {
        let id = self
            .state
            .borrow_mut()
            .listeners
            .add(Rc::new(on_change));
        GeometrySubscription::new(Rc::downgrade(&self.state), id)
    }

    /// Creates a non-owning reference to this widget. Upgrading the reference
    /// fails once every `Widget` handle has been dropped.
    pub fn downgrade(&self) -> WidgetRef {
        WidgetRef {
            state: Rc::downgrade(&self.state),
        }
    }

    /// Tests whether `self` and `other` are handles to the same widget.
    pub fn ptr_eq(&self, other: &Widget) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    #[cfg(test)]
    pub(crate) fn get_listener_count(&self) -> usize {
        self.state.borrow().listeners.count()
    }
}

impl Default for Widget {
    fn default() -> Self {
        Self::new()
    }
}

/// A non-owning reference to a `Widget`, comparable to `Weak` versus `Rc`.
///
/// This is how widgets should watch *other* widgets they don't own: holding a
/// `WidgetRef` never keeps the referenced widget alive.
#[derive(Clone)]
pub struct WidgetRef {
    state: WR<WidgetState>,
}

impl WidgetRef {
    /// Attempts to recover a full `Widget` handle. Returns `None` if the widget
    /// has been dropped in the meantime.
    pub fn upgrade(&self) -> Option<Widget> {
        self.state.upgrade().map(|state| Widget { state })
    }
}

#[cfg(test)]
mod tests {

    use crate::*;

    #[test]
    fn test_new_widget_defaults() {
        let widget = Widget::new();
        assert!(widget.get_position().nearly_equal(Position::new(0.0, 0.0)));
        assert!(widget.get_size().nearly_equal(Size::new(0.0, 0.0)));
        assert_eq!(0, widget.get_child_count());
    }

    #[test]
    fn test_unbounded_children() {
        let widget = Widget::new();
        for _counter in 0..10 {
            widget.add_child(Widget::new()).unwrap();
        }
        assert_eq!(10, widget.get_child_count());
    }

    #[test]
    fn test_child_capacity() {
        let widget = Widget::with_child_capacity(2);
        widget.add_child(Widget::new()).unwrap();
        widget.add_child(Widget::new()).unwrap();

        let error = widget.add_child(Widget::new()).unwrap_err();
        assert_eq!(2, error.child_capacity);

        // The failed call shouldn't have changed anything
        assert_eq!(2, widget.get_child_count());
    }

    #[test]
    fn test_remove_child() {
        let widget = Widget::new();
        let child1 = Widget::new();
        let child2 = Widget::new();
        widget.add_child(child1.clone()).unwrap();
        widget.add_child(child2.clone()).unwrap();

        assert!(widget.remove_child(&child1));
        assert_eq!(1, widget.get_child_count());
        assert!(widget.get_child(0).unwrap().ptr_eq(&child2));

        // Removing it again should report that it wasn't found
        assert!(!widget.remove_child(&child1));
    }

    #[test]
    fn test_handles_share_state() {
        let widget = Widget::new();
        let alias = widget.clone();

        alias.set_position(Position::new(3.0, 4.0));
        assert!(widget.get_position().nearly_equal(Position::new(3.0, 4.0)));
        assert!(widget.ptr_eq(&alias));
        assert!(!widget.ptr_eq(&Widget::new()));
    }

    #[test]
    fn test_widget_ref_upgrade() {
        let widget = Widget::new();
        let reference = widget.downgrade();

        assert!(reference.upgrade().unwrap().ptr_eq(&widget));

        drop(widget);
        assert!(reference.upgrade().is_none());
    }

    #[test]
    fn test_listener_is_removed_when_subscription_drops() {
        let widget = Widget::new();
        assert_eq!(0, widget.get_listener_count());

        let subscription = widget.subscribe_geometry(|_event| {});
        assert_eq!(1, widget.get_listener_count());

        drop(subscription);
        assert_eq!(0, widget.get_listener_count());
    }
}
