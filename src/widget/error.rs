use thiserror::Error;

/// This error is used to indicate that an attempt was made to add a child to a
/// `Widget` that already holds as many children as its capacity allows.
///
/// In such cases, the new child is not added and the existing children are left
/// untouched. The caller can remove a child first and try again.
#[derive(Copy, Clone, Debug, Error)]
#[error("this widget accepts at most {child_capacity} child(ren)")]
pub struct TooManyChildrenError {
    pub child_capacity: usize,
}
