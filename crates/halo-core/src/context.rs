use parking_lot::Mutex;

/// Which window currently owns the visible border.
///
/// Every check-then-act sequence goes through one lock. The `*_with`
/// variants run the caller's side effect (showing or hiding the overlay)
/// while the lock is held, so a concurrent compare-and-clear can never
/// observe a half-applied change.
#[derive(Debug, Default)]
pub struct BorderedWindow {
    handle: Mutex<Option<usize>>,
}

impl BorderedWindow {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<usize> {
        *self.handle.lock()
    }

    /// Stores `handle` and runs `f` under the lock.
    pub fn set_with<R>(&self, handle: usize, f: impl FnOnce() -> R) -> R {
        let mut guard = self.handle.lock();
        let result = f();
        *guard = Some(handle);
        result
    }

    /// Clears the value and runs `f` under the lock.
    pub fn clear_with(&self, f: impl FnOnce()) -> Option<usize> {
        let mut guard = self.handle.lock();
        f();
        guard.take()
    }

    /// Clears the value and runs `f` under the lock, but only if the value
    /// still refers to `handle`. Returns whether it did.
    pub fn clear_if_with(&self, handle: usize, f: impl FnOnce()) -> bool {
        let mut guard = self.handle.lock();
        if *guard != Some(handle) {
            return false;
        }
        f();
        *guard = None;
        true
    }
}
