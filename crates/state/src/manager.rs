//! World state on top of a [`BackingStore`].
use crate::{
    account::AccountInfo,
    cache::{BackingKind, CacheError, CheckpointCache},
    error::StateError,
    store::{BackingStore, BatchOp},
};
use bytecode::Bytecode;
use core::hash::Hash;
use primitives::{Address, BTreeMap, Bytes, B256, KECCAK_EMPTY, U256};
use tracing::debug;

const ACCOUNT_PREFIX: u8 = b'a';
const STORAGE_PREFIX: u8 = b's';
const CODE_PREFIX: u8 = b'c';
const INCARNATION_PREFIX: u8 = b'i';

/// Storage slot of one incarnation of an account.
///
/// Deleting an account bumps its incarnation, so slots written by an earlier incarnation are
/// never read again without having to enumerate them. The next flush removes them from the
/// store by prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorageKey {
    /// Account address.
    pub address: Address,
    /// Incarnation the slot belongs to.
    pub incarnation: u64,
    /// Slot index.
    pub slot: U256,
}

impl StorageKey {
    /// Encodes the key for the backing store.
    pub fn to_store_key(&self) -> Vec<u8> {
        let mut key = storage_prefix(&self.address, self.incarnation);
        key.extend_from_slice(&self.slot.to_be_bytes::<32>());
        key
    }
}

/// Store key prefix shared by every slot of one incarnation.
fn storage_prefix(address: &Address, incarnation: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + 20 + 8 + 32);
    key.push(STORAGE_PREFIX);
    key.extend_from_slice(address.as_slice());
    key.extend_from_slice(&incarnation.to_be_bytes());
    key
}

fn account_key(address: &Address) -> Vec<u8> {
    prefixed(ACCOUNT_PREFIX, address.as_slice())
}

fn code_key(hash: &B256) -> Vec<u8> {
    prefixed(CODE_PREFIX, hash.as_slice())
}

fn incarnation_key(address: &Address) -> Vec<u8> {
    prefixed(INCARNATION_PREFIX, address.as_slice())
}

fn prefixed(prefix: u8, body: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + body.len());
    key.push(prefix);
    key.extend_from_slice(body);
    key
}

/// Entries written to the backing store by one [`StateManager::flush`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateChangeset {
    /// Account updates, `None` for deletions.
    pub accounts: Vec<(Address, Option<AccountInfo>)>,
    /// Storage updates, zero for cleared slots.
    pub storage: Vec<(StorageKey, U256)>,
    /// Newly stored code.
    pub code: Vec<(B256, Bytes)>,
    /// Incarnation changes.
    pub incarnations: Vec<(Address, u64)>,
    /// Superseded incarnations whose slots were removed.
    pub pruned_storage: Vec<(Address, u64)>,
}

impl StateChangeset {
    /// Returns `true` if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
            && self.storage.is_empty()
            && self.code.is_empty()
            && self.incarnations.is_empty()
            && self.pruned_storage.is_empty()
    }
}

/// Account, storage and code caches over one backing store, checkpointed together.
#[derive(Debug)]
pub struct StateManager<S> {
    store: S,
    accounts: CheckpointCache<Address, AccountInfo>,
    storage: CheckpointCache<StorageKey, U256>,
    code: CheckpointCache<B256, Bytecode>,
    incarnations: CheckpointCache<Address, u64>,
}

impl<S: BackingStore> StateManager<S> {
    /// Creates a manager with unbounded caches.
    pub fn new(store: S) -> Self {
        Self::with_backing(store, BackingKind::Ordered)
    }

    /// Creates a manager whose caches keep clean entries in `kind`.
    pub fn with_backing(store: S, kind: BackingKind) -> Self {
        Self {
            store,
            accounts: CheckpointCache::new(kind),
            storage: CheckpointCache::new(kind),
            code: CheckpointCache::new(kind),
            incarnations: CheckpointCache::new(kind),
        }
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the manager, dropping unflushed writes.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Loads an account.
    pub fn account(&mut self, address: Address) -> Result<Option<AccountInfo>, StateError<S::Error>> {
        load(&self.store, &mut self.accounts, &address, account_key, |bytes| {
            Ok(alloy_rlp::decode_exact(&bytes)?)
        })
    }

    /// Loads an account, or the default empty account if it does not exist.
    pub fn account_or_default(
        &mut self,
        address: Address,
    ) -> Result<AccountInfo, StateError<S::Error>> {
        Ok(self.account(address)?.unwrap_or_default())
    }

    /// Returns `true` if the account exists.
    pub fn exists(&mut self, address: Address) -> Result<bool, StateError<S::Error>> {
        Ok(self.account(address)?.is_some())
    }

    /// Writes an account.
    pub fn put_account(&mut self, address: Address, info: AccountInfo) {
        self.accounts.put(address, info);
    }

    /// Deletes an account together with all of its storage.
    pub fn delete_account(&mut self, address: Address) -> Result<(), StateError<S::Error>> {
        let incarnation = self.incarnation(address)?;
        self.accounts.del(address);
        self.incarnations.put(address, incarnation + 1);
        Ok(())
    }

    /// Clears the storage of an account, keeping the account record.
    pub fn clear_storage(&mut self, address: Address) -> Result<(), StateError<S::Error>> {
        let incarnation = self.incarnation(address)?;
        self.incarnations.put(address, incarnation + 1);
        Ok(())
    }

    /// Current incarnation of an address.
    pub fn incarnation(&mut self, address: Address) -> Result<u64, StateError<S::Error>> {
        let value = load(
            &self.store,
            &mut self.incarnations,
            &address,
            incarnation_key,
            |bytes| decode_incarnation(&address, &bytes),
        )?;
        Ok(value.unwrap_or_default())
    }

    /// Reads a storage slot. Missing slots read as zero.
    pub fn storage(&mut self, address: Address, slot: U256) -> Result<U256, StateError<S::Error>> {
        let key = StorageKey {
            address,
            incarnation: self.incarnation(address)?,
            slot,
        };
        let value = load(&self.store, &mut self.storage, &key, StorageKey::to_store_key, |bytes| {
            Ok(alloy_rlp::decode_exact(&bytes)?)
        })?;
        Ok(value.unwrap_or_default())
    }

    /// Reads a storage slot as of the last flush.
    ///
    /// Slots of an account deleted or recreated since then read as zero.
    pub fn original_storage(
        &mut self,
        address: Address,
        slot: U256,
    ) -> Result<U256, StateError<S::Error>> {
        let current = self.incarnation(address)?;
        let clean = load_clean(
            &self.store,
            &mut self.incarnations,
            &address,
            incarnation_key,
            |bytes| decode_incarnation(&address, &bytes),
        )?
        .unwrap_or_default();
        if current != clean {
            return Ok(U256::ZERO);
        }
        let key = StorageKey {
            address,
            incarnation: clean,
            slot,
        };
        let value = load_clean(&self.store, &mut self.storage, &key, StorageKey::to_store_key, |bytes| {
            Ok(alloy_rlp::decode_exact(&bytes)?)
        })?;
        Ok(value.unwrap_or_default())
    }

    /// Writes a storage slot. Writing zero deletes it.
    pub fn set_storage(
        &mut self,
        address: Address,
        slot: U256,
        value: U256,
    ) -> Result<(), StateError<S::Error>> {
        let key = StorageKey {
            address,
            incarnation: self.incarnation(address)?,
            slot,
        };
        if value.is_zero() {
            self.storage.del(key);
        } else {
            self.storage.put(key, value);
        }
        Ok(())
    }

    /// Loads code by hash. Unknown hashes yield empty code.
    pub fn code(&mut self, hash: B256) -> Result<Bytecode, StateError<S::Error>> {
        if hash == KECCAK_EMPTY || hash.is_zero() {
            return Ok(Bytecode::new());
        }
        let code = load(&self.store, &mut self.code, &hash, code_key, |bytes| {
            Ok(Bytecode::new_with_hash(bytes, hash))
        })?;
        Ok(code.unwrap_or_default())
    }

    /// Loads the code of an account.
    pub fn code_by_address(&mut self, address: Address) -> Result<Bytecode, StateError<S::Error>> {
        match self.account(address)? {
            Some(info) => self.code(info.code_hash),
            None => Ok(Bytecode::new()),
        }
    }

    /// Stores code under its hash, returning the hash.
    pub fn put_code(&mut self, code: Bytecode) -> B256 {
        let hash = code.hash();
        if hash != KECCAK_EMPTY {
            self.code.put(hash, code);
        }
        hash
    }

    /// Opens a checkpoint on every cache.
    pub fn checkpoint(&mut self) {
        self.accounts.checkpoint();
        self.storage.checkpoint();
        self.code.checkpoint();
        self.incarnations.checkpoint();
    }

    /// Commits the last checkpoint on every cache.
    pub fn commit(&mut self) -> Result<(), CacheError> {
        self.accounts.commit()?;
        self.storage.commit()?;
        self.code.commit()?;
        self.incarnations.commit()
    }

    /// Reverts the last checkpoint on every cache.
    pub fn revert(&mut self) -> Result<(), CacheError> {
        self.accounts.revert()?;
        self.storage.revert()?;
        self.code.revert()?;
        self.incarnations.revert()
    }

    /// Number of open checkpoints.
    pub fn depth(&self) -> usize {
        self.accounts.depth()
    }

    /// Writes every pending change to the backing store in one batch.
    ///
    /// Fails without touching the store while checkpoints are open.
    pub fn flush(&mut self) -> Result<StateChangeset, StateError<S::Error>> {
        let depth = self.depth();
        if depth > 0 {
            return Err(CacheError::OpenCheckpoints(depth).into());
        }

        let mut ops = Vec::new();
        let mut changeset = StateChangeset::default();

        // Incarnations bumped since the last flush, with the one the store still holds slots for.
        let latest: BTreeMap<Address, u64> = self
            .incarnations
            .dirty_iter()
            .map(|(address, incarnation)| (*address, incarnation.copied().unwrap_or_default()))
            .collect();
        let mut superseded = Vec::new();
        for (address, incarnation) in &latest {
            let flushed = load_clean(
                &self.store,
                &mut self.incarnations,
                address,
                incarnation_key,
                |bytes| decode_incarnation(address, &bytes),
            )?
            .unwrap_or_default();
            if flushed < *incarnation {
                superseded.push((*address, flushed));
            }
        }

        for (hash, code) in self.code.flush()? {
            if let Some(code) = code {
                ops.push(BatchOp::Put {
                    key: code_key(&hash),
                    value: code.bytes().clone(),
                });
                changeset.code.push((hash, code.bytes().clone()));
            }
        }
        for (address, incarnation) in self.incarnations.flush()? {
            let incarnation = incarnation.unwrap_or_default();
            ops.push(BatchOp::Put {
                key: incarnation_key(&address),
                value: Bytes::copy_from_slice(&incarnation.to_be_bytes()),
            });
            changeset.incarnations.push((address, incarnation));
        }
        for (address, info) in self.accounts.flush()? {
            let key = account_key(&address);
            match &info {
                Some(info) => ops.push(BatchOp::Put {
                    key,
                    value: alloy_rlp::encode(info).into(),
                }),
                None => ops.push(BatchOp::Del { key }),
            }
            changeset.accounts.push((address, info));
        }
        for (slot, value) in self.storage.flush()? {
            if latest
                .get(&slot.address)
                .is_some_and(|latest| slot.incarnation < *latest)
            {
                continue;
            }
            let key = slot.to_store_key();
            match value {
                Some(value) => {
                    ops.push(BatchOp::Put {
                        key,
                        value: alloy_rlp::encode(value).into(),
                    });
                    changeset.storage.push((slot, value));
                }
                None => {
                    ops.push(BatchOp::Del { key });
                    changeset.storage.push((slot, U256::ZERO));
                }
            }
        }

        for (address, incarnation) in superseded {
            ops.push(BatchOp::DelPrefix {
                prefix: storage_prefix(&address, incarnation),
            });
            changeset.pruned_storage.push((address, incarnation));
        }

        debug!(target: "state", ops = ops.len(), "flushing state");
        self.store.batch(ops).map_err(StateError::Store)?;
        Ok(changeset)
    }
}

fn decode_incarnation<E>(address: &Address, bytes: &[u8]) -> Result<u64, StateError<E>> {
    let bytes: [u8; 8] = bytes.try_into().map_err(|_| StateError::Corrupt {
        key: incarnation_key(address),
    })?;
    Ok(u64::from_be_bytes(bytes))
}

fn load<S, K, V>(
    store: &S,
    cache: &mut CheckpointCache<K, V>,
    key: &K,
    store_key: impl FnOnce(&K) -> Vec<u8>,
    decode: impl FnOnce(Bytes) -> Result<V, StateError<S::Error>>,
) -> Result<Option<V>, StateError<S::Error>>
where
    S: BackingStore,
    K: Ord + Hash + Clone,
    V: Clone,
{
    if let Some(value) = cache.get(key).known() {
        return Ok(value);
    }
    fetch(store, cache, key, store_key, decode)
}

fn load_clean<S, K, V>(
    store: &S,
    cache: &mut CheckpointCache<K, V>,
    key: &K,
    store_key: impl FnOnce(&K) -> Vec<u8>,
    decode: impl FnOnce(Bytes) -> Result<V, StateError<S::Error>>,
) -> Result<Option<V>, StateError<S::Error>>
where
    S: BackingStore,
    K: Ord + Hash + Clone,
    V: Clone,
{
    if let Some(value) = cache.get_clean(key).known() {
        return Ok(value);
    }
    fetch(store, cache, key, store_key, decode)
}

fn fetch<S, K, V>(
    store: &S,
    cache: &mut CheckpointCache<K, V>,
    key: &K,
    store_key: impl FnOnce(&K) -> Vec<u8>,
    decode: impl FnOnce(Bytes) -> Result<V, StateError<S::Error>>,
) -> Result<Option<V>, StateError<S::Error>>
where
    S: BackingStore,
    K: Ord + Hash + Clone,
    V: Clone,
{
    let raw = store.get(&store_key(key)).map_err(StateError::Store)?;
    let value = raw.map(decode).transpose()?;
    cache.fill(key.clone(), value.clone());
    Ok(value)
}
