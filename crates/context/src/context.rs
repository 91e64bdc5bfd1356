//! This module contains [`Env`] and [`Context`], the state an execution runs against.
use crate::{block::BlockEnv, cfg::CfgEnv, journal::Journal, tx::TxEnv};
use primitives::{Address, Features};
use state::{BackingStore, CacheError, StateError, StateManager};
use tracing::{debug, trace};

/// Read-only execution environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Env {
    /// Configuration of the EVM itself.
    pub cfg: CfgEnv,
    /// Configuration of the block the transaction is in.
    pub block: BlockEnv,
    /// Configuration of the transaction that is being executed.
    pub tx: TxEnv,
}

/// World state and access journal, checkpointed in lockstep.
#[derive(Debug)]
pub struct Context<S> {
    /// Execution environment.
    pub env: Env,
    /// Account, storage and code caches.
    pub state: StateManager<S>,
    /// Warm/cold, touched and transient storage tracking.
    pub journal: Journal,
}

impl<S: BackingStore> Context<S> {
    /// Creates a context over `store`.
    pub fn new(env: Env, store: S) -> Self {
        Self::with_state(env, StateManager::new(store))
    }

    /// Creates a context over an existing state manager.
    pub fn with_state(env: Env, state: StateManager<S>) -> Self {
        Self {
            env,
            state,
            journal: Journal::new(),
        }
    }

    /// Resolved feature set.
    #[inline]
    pub fn features(&self) -> Features {
        self.env.cfg.features()
    }

    /// Opens a checkpoint on the caches and the journal.
    pub fn checkpoint(&mut self) {
        self.state.checkpoint();
        self.journal.checkpoint();
        trace!(target: "context", depth = self.depth(), "checkpoint");
    }

    /// Commits the last checkpoint.
    pub fn commit(&mut self) -> Result<(), CacheError> {
        self.state.commit()?;
        if !self.journal.commit() {
            return Err(CacheError::NoCheckpoint);
        }
        trace!(target: "context", depth = self.depth(), "commit");
        Ok(())
    }

    /// Reverts the last checkpoint.
    pub fn revert(&mut self) -> Result<(), CacheError> {
        self.state.revert()?;
        if !self.journal.revert() {
            return Err(CacheError::NoCheckpoint);
        }
        trace!(target: "context", depth = self.depth(), "revert");
        Ok(())
    }

    /// Number of open checkpoints.
    #[inline]
    pub fn depth(&self) -> usize {
        self.state.depth()
    }

    /// Deletes every touched account that is empty, when EIP-161 is active.
    ///
    /// Returns the deleted addresses.
    pub fn cleanup(&mut self) -> Result<Vec<Address>, StateError<S::Error>> {
        if !self.features().contains(Features::EIP161) {
            return Ok(Vec::new());
        }
        let mut deleted = Vec::new();
        for address in self.journal.touched() {
            let Some(account) = self.state.account(address)? else {
                continue;
            };
            if account.is_empty() {
                self.state.delete_account(address)?;
                deleted.push(address);
            }
        }
        if !deleted.is_empty() {
            debug!(target: "context", count = deleted.len(), "deleted empty touched accounts");
        }
        Ok(deleted)
    }
}
