//! Cooperative cancellation handles.

use std::cell::Cell;
use std::rc::Rc;

/// A shared, idempotent cancellation flag.
///
/// The scheduler checks the flag before every callback it owns, so once
/// [`cancel`](Self::cancel) returns no further callback of the cancelled
/// tween or timer runs. Cancelling twice, or after the work finished, is a
/// no-op.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancels: Rc<Cell<u32>>,
}

impl CancelHandle {
    /// Creates a live handle.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Cancels the work behind this handle.
    ///
    /// Returns `true` if this call is the one that cancelled it.
    pub fn cancel(&self) -> bool {
        let previous = self.cancels.get();
        self.cancels.set(previous.saturating_add(1));
        previous == 0
    }

    /// Returns whether the handle was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool { self.cancels.get() > 0 }

    /// Number of times [`cancel`](Self::cancel) was invoked.
    #[must_use]
    pub fn cancel_count(&self) -> u32 { self.cancels.get() }

    /// Returns whether both handles control the same work.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool { Rc::ptr_eq(&self.cancels, &other.cancels) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_idempotent() {
        let handle = CancelHandle::new();
        assert!(!handle.is_cancelled());

        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(handle.is_cancelled());
        assert_eq!(handle.cancel_count(), 2);
    }

    #[test]
    fn test_clones_share_state() {
        let handle = CancelHandle::new();
        let clone = handle.clone();
        clone.cancel();

        assert!(handle.is_cancelled());
        assert!(handle.same_as(&clone));
        assert!(!handle.same_as(&CancelHandle::new()));
    }
}
