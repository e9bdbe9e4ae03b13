//! Setup/cleanup pairs keyed on a dependency value
//!
//! An [`Effect`] re-runs its setup only when the dependencies it was last run
//! with change, and always runs the previous cleanup first. Disposal runs the
//! pending cleanup exactly once, no matter how often it is requested.

/// Teardown returned by an effect's setup
pub type Cleanup = Box<dyn FnOnce()>;

pub struct Effect<D> {
    deps: Option<D>,
    cleanup: Option<Cleanup>,
}

impl<D> Effect<D> {
    pub fn new() -> Self {
        Self {
            deps: None,
            cleanup: None,
        }
    }

    /// Runs the pending cleanup, if any, and forgets the dependencies so the
    /// next `run` always sets up again.
    pub fn dispose(&mut self) {
        self.deps = None;
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }

    /// Whether a setup is live and still owes a cleanup
    pub fn is_active(&self) -> bool {
        self.cleanup.is_some()
    }

    pub fn deps(&self) -> Option<&D> {
        self.deps.as_ref()
    }
}

impl<D: PartialEq> Effect<D> {
    /// Runs `setup` when `deps` differ from the last run. Returns whether
    /// setup ran.
    pub fn run<F>(&mut self, deps: D, setup: F) -> bool
    where
        F: FnOnce(&D) -> Option<Cleanup>,
    {
        if self.deps.as_ref() == Some(&deps) {
            return false;
        }

        self.dispose();
        self.cleanup = setup(&deps);
        self.deps = Some(deps);
        true
    }
}

impl<D> Default for Effect<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Drop for Effect<D> {
    fn drop(&mut self) {
        self.dispose();
    }
}
