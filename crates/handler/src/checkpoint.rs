//! Scoped checkpoints.
use auto_impl::auto_impl;
use context::Context;
use core::ops::{Deref, DerefMut};
use state::{BackingStore, CacheError};
use tracing::warn;

/// State that can open, commit and revert nested checkpoints.
#[auto_impl(&mut, Box)]
pub trait Checkpoint {
    /// Opens a checkpoint.
    fn checkpoint(&mut self);

    /// Commits the last open checkpoint into its parent.
    fn commit_checkpoint(&mut self) -> Result<(), CacheError>;

    /// Reverts the last open checkpoint.
    fn revert_checkpoint(&mut self) -> Result<(), CacheError>;
}

impl<S: BackingStore> Checkpoint for Context<S> {
    fn checkpoint(&mut self) {
        Context::checkpoint(self)
    }

    fn commit_checkpoint(&mut self) -> Result<(), CacheError> {
        self.commit()
    }

    fn revert_checkpoint(&mut self) -> Result<(), CacheError> {
        self.revert()
    }
}

/// Checkpoint that reverts when dropped unless it was committed.
///
/// Derefs to the guarded state, so the frame keeps using it while the guard is alive.
#[must_use = "dropping the guard reverts the checkpoint immediately"]
#[derive(Debug)]
pub struct CheckpointGuard<'a, T: Checkpoint + ?Sized> {
    inner: &'a mut T,
    open: bool,
}

impl<'a, T: Checkpoint + ?Sized> CheckpointGuard<'a, T> {
    /// Opens a checkpoint on `inner`.
    pub fn new(inner: &'a mut T) -> Self {
        inner.checkpoint();
        Self { inner, open: true }
    }

    /// Commits the checkpoint.
    pub fn commit(mut self) -> Result<(), CacheError> {
        self.open = false;
        self.inner.commit_checkpoint()
    }

    /// Reverts the checkpoint now, reporting protocol errors the drop would only log.
    pub fn revert(mut self) -> Result<(), CacheError> {
        self.open = false;
        self.inner.revert_checkpoint()
    }
}

impl<T: Checkpoint + ?Sized> Deref for CheckpointGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.inner
    }
}

impl<T: Checkpoint + ?Sized> DerefMut for CheckpointGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.inner
    }
}

impl<T: Checkpoint + ?Sized> Drop for CheckpointGuard<'_, T> {
    fn drop(&mut self) {
        if self.open {
            if let Err(error) = self.inner.revert_checkpoint() {
                warn!(target: "handler", %error, "checkpoint revert failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use context::Env;
    use primitives::{address, Address, U256};
    use state::InMemoryStore;

    const A: Address = address!("0x000000000000000000000000000000000000aaaa");

    fn context() -> Context<InMemoryStore> {
        Context::new(Env::default(), InMemoryStore::new())
    }

    #[test]
    fn drop_reverts() {
        let mut ctx = context();
        {
            let mut guard = CheckpointGuard::new(&mut ctx);
            guard.state.set_storage(A, U256::from(1), U256::from(2)).unwrap();
            guard.journal.warm(A);
            assert_eq!(guard.depth(), 1);
        }
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.state.storage(A, U256::from(1)).unwrap(), U256::ZERO);
        assert!(!ctx.journal.is_warm(&A));
    }

    #[test]
    fn commit_keeps_changes() {
        let mut ctx = context();
        let mut guard = CheckpointGuard::new(&mut ctx);
        guard.state.set_storage(A, U256::from(1), U256::from(2)).unwrap();
        guard.commit().unwrap();
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.state.storage(A, U256::from(1)).unwrap(), U256::from(2));
    }

    #[test]
    fn nested_guards_unwind_in_order() {
        let mut ctx = context();
        let mut outer = CheckpointGuard::new(&mut ctx);
        outer.state.set_storage(A, U256::ZERO, U256::from(1)).unwrap();
        {
            let mut inner = CheckpointGuard::new(&mut *outer);
            inner.state.set_storage(A, U256::ZERO, U256::from(9)).unwrap();
        }
        assert_eq!(outer.state.storage(A, U256::ZERO).unwrap(), U256::from(1));
        outer.commit().unwrap();
        assert_eq!(ctx.state.storage(A, U256::ZERO).unwrap(), U256::from(1));
    }
}
