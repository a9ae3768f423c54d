use crate::*;

use std::cell::RefCell;
use std::rc::Rc;

type RR<T> = Rc<RefCell<T>>;

struct FloatingState {
    x_rel: f32,
    y_rel: f32,
    padding: f32,
    target: Option<WidgetRef>,
    target_subscription: Option<GeometrySubscription>,
}

/// A widget that automatically positions itself relative to its *target*
/// widget. It accepts only one child, and keeps that child at its own
/// position and size.
///
/// ### Positioning
/// The position is a linear interpolation over the travel range that remains
/// when the widget's own size plus a `padding` inset on every side is
/// subtracted from the target's size: `(x_rel, y_rel) = (0, 0)` puts the
/// widget at `(padding, padding)` and `(1, 1)` puts it at
/// `target.size - own.size - padding`. Nothing is clamped: relative
/// coordinates outside `[0, 1]`, negative padding and targets smaller than
/// the widget are all accepted and simply place the widget outside the inset
/// box.
///
/// Note that the computed position is relative to the *target's* origin: you
/// may get undefined behavior if you hand this widget to a layout or another
/// widget that positions its children itself.
///
/// ### Re-targeting
/// The widget subscribes to the geometry of its current target and recomputes
/// its position whenever the target moves or resizes. Replacing the target
/// first cancels the old subscription, then registers with the new target, so
/// a stale target can never trigger a recomputation. The target is never
/// owned: if it is dropped, the position simply stays where it was.
///
/// Dropping the `FloatingWidget` releases its target subscription as well.
pub struct FloatingWidget {
    base: Widget,
    state: RR<FloatingState>,
    _own_subscription: GeometrySubscription,
}

impl FloatingWidget {
    /// Constructs a new `FloatingWidget` with `pos_rel = (0, 0)`, no padding,
    /// no target and no child.
    pub fn new() -> Self {
        let base = Widget::with_child_capacity(1);
        let state = Rc::new(RefCell::new(FloatingState {
            x_rel: 0.0,
            y_rel: 0.0,
            padding: 0.0,
            target: None,
            target_subscription: None,
        }));

        // Keep the sole child at the widget's own geometry. The weak reference
        // is needed because this callback is stored inside the base widget
        // itself: a strong handle would keep the widget alive forever.
        let weak_base = base.downgrade();
        let own_subscription = base.subscribe_geometry(move |event| {
            let base = match weak_base.upgrade() {
                Some(base) => base,
                None => return,
            };
            let child = match base.get_child(0) {
                Some(child) => child,
                None => return,
            };
            match event {
                GeometryChangeEvent::Position { to, .. } => child.set_position(*to),
                GeometryChangeEvent::Size { to, .. } => child.set_size(*to),
            }
        });

        Self {
            base,
            state,
            _own_subscription: own_subscription,
        }
    }

    /// Adds `child` as the sole child of this widget and immediately gives it
    /// this widget's current position and size.
    ///
    /// If there already is a child, this fails with a `TooManyChildrenError`
    /// and the existing child is left untouched.
    pub fn add_child(&self, child: Widget) -> Result<(), TooManyChildrenError> {
        self.base.add_child(child.clone())?;
        child.set_position(self.base.get_position());
        child.set_size(self.base.get_size());
        Ok(())
    }

    /// Gets the sole child of this widget, if it has one.
    pub fn get_child(&self) -> Option<Widget> {
        self.base.get_child(0)
    }

    /// Replaces the target this widget positions itself against.
    ///
    /// The subscription to the previous target (if any) is cancelled *before*
    /// the new target is stored and subscribed to, so a later change of the
    /// old target will no longer move this widget. Passing `None` just leaves
    /// the widget where it is. The position is recomputed immediately.
    pub fn set_target(&self, new_target: Option<&Widget>) {
        {
            let mut state = self.state.borrow_mut();

            // Unbind from the previous target, if we had one
            state.target_subscription = None;
            state.target = new_target.map(|target| target.downgrade());

            // Bind to the new target, if we have one
            if let Some(target) = new_target {
                let weak_state = Rc::downgrade(&self.state);
                let weak_base = self.base.downgrade();
                state.target_subscription =
                    Some(target.subscribe_geometry(move |_event| {
                        let state = match weak_state.upgrade() {
                            Some(state) => state,
                            None => return,
                        };
                        let base = match weak_base.upgrade() {
                            Some(base) => base,
                            None => return,
                        };
                        update_layout(&base, &state);
                    }));
            }
        }
        log::debug!(
            "floating widget target {}",
            if new_target.is_some() { "replaced" } else { "cleared" }
        );
        update_layout(&self.base, &self.state);
    }

    /// Gets the current target, or `None` if no target is set or the target
    /// has been dropped.
    pub fn get_target(&self) -> Option<Widget> {
        self.state
            .borrow()
            .target
            .as_ref()
            .and_then(|target| target.upgrade())
    }

    /// Sets both relative coordinates at once and recomputes the position.
    pub fn set_pos_rel(&self, x_rel: f32, y_rel: f32) {
        {
            let mut state = self.state.borrow_mut();
            state.x_rel = x_rel;
            state.y_rel = y_rel;
        }
        update_layout(&self.base, &self.state);
    }

    /// Sets the relative x-coordinate (0.0 is the left side of the padded
    /// target box, 1.0 the right side) and recomputes the position.
    pub fn set_x_rel(&self, x_rel: f32) {
        self.state.borrow_mut().x_rel = x_rel;
        update_layout(&self.base, &self.state);
    }

    /// Sets the relative y-coordinate (0.0 is the bottom of the padded target
    /// box, 1.0 the top) and recomputes the position.
    pub fn set_y_rel(&self, y_rel: f32) {
        self.state.borrow_mut().y_rel = y_rel;
        update_layout(&self.base, &self.state);
    }

    pub fn get_x_rel(&self) -> f32 {
        self.state.borrow().x_rel
    }

    pub fn get_y_rel(&self) -> f32 {
        self.state.borrow().y_rel
    }

    /// Sets the padding (the uniform inset from the target's box, applied on
    /// both axes) and recomputes the position.
    pub fn set_padding(&self, padding: f32) {
        self.state.borrow_mut().padding = padding;
        update_layout(&self.base, &self.state);
    }

    pub fn get_padding(&self) -> f32 {
        self.state.borrow().padding
    }

    /// Gets the underlying widget, for handing this floating widget to code
    /// that works with plain `Widget`s (for instance as the target of another
    /// floating widget).
    pub fn get_base(&self) -> &Widget {
        &self.base
    }

    pub fn get_position(&self) -> Position {
        self.base.get_position()
    }

    pub fn get_size(&self) -> Size {
        self.base.get_size()
    }

    /// Moves this widget. Note that the next recomputation (a target change
    /// or a `set_...` call) will overwrite this position again.
    pub fn set_position(&self, new_position: Position) {
        self.base.set_position(new_position);
    }

    /// Resizes this widget. The sole child (if any) is resized along. The
    /// position is *not* recomputed: like the size of the target, the size of
    /// this widget only re-enters the formula on the next recomputation.
    pub fn set_size(&self, new_size: Size) {
        self.base.set_size(new_size);
    }
}

impl Default for FloatingWidget {
    fn default() -> Self {
        Self::new()
    }
}

/// Positions `base` relative to the current target.
///
/// If there is no target (or it has been dropped), the position is left at
/// its last value.
fn update_layout(base: &Widget, state: &RR<FloatingState>) {
    let (x_rel, y_rel, padding, target) = {
        let state = state.borrow();
        let target = match &state.target {
            Some(target) => match target.upgrade() {
                Some(target) => target,
                None => return,
            },
            None => return,
        };
        (state.x_rel, state.y_rel, state.padding, target)
    };

    let target_size = target.get_size();
    let own_size = base.get_size();
    let travel_width = target_size.get_width() - own_size.get_width() - padding * 2.0;
    let travel_height = target_size.get_height() - own_size.get_height() - padding * 2.0;

    let new_position = Position::new(
        x_rel * travel_width + padding,
        y_rel * travel_height + padding,
    );
    log::trace!(
        "floating widget moves to ({}, {})",
        new_position.get_x(),
        new_position.get_y()
    );
    base.set_position(new_position);
}
