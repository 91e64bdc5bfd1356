//! Warm/cold access tracking, touched accounts and transient storage.
//!
//! Every change is recorded at the current checkpoint height so that a revert rolls it back
//! exactly. Entries added through [`Journal::warm_permanently`] and
//! [`Journal::warm_slot_permanently`] live outside the levels and survive reverts.
use primitives::{Address, HashMap, HashSet, PRECOMPILE3, U256};

/// Changes made at one checkpoint height.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct JournalLevel {
    warmed_addresses: Vec<Address>,
    warmed_slots: Vec<(Address, U256)>,
    touched: Vec<Address>,
    /// Prior transient values, in write order.
    transient: Vec<((Address, U256), U256)>,
}

impl JournalLevel {
    fn append(&mut self, mut other: JournalLevel) {
        self.warmed_addresses.append(&mut other.warmed_addresses);
        self.warmed_slots.append(&mut other.warmed_slots);
        self.touched.append(&mut other.touched);
        self.transient.append(&mut other.transient);
    }
}

/// Per-transaction access journal.
#[derive(Clone, Debug, Default)]
pub struct Journal {
    always_warm: HashSet<Address>,
    always_warm_slots: HashSet<(Address, U256)>,
    warm: HashSet<Address>,
    warm_slots: HashSet<(Address, U256)>,
    touched: HashSet<Address>,
    transient: HashMap<(Address, U256), U256>,
    levels: Vec<JournalLevel>,
}

impl Journal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the address was accessed in this transaction.
    pub fn is_warm(&self, address: &Address) -> bool {
        self.always_warm.contains(address) || self.warm.contains(address)
    }

    /// Returns `true` if the slot was accessed in this transaction.
    pub fn is_warm_slot(&self, address: &Address, slot: &U256) -> bool {
        let key = (*address, *slot);
        self.always_warm_slots.contains(&key) || self.warm_slots.contains(&key)
    }

    /// Marks an address warm, returning `true` if it was cold.
    pub fn warm(&mut self, address: Address) -> bool {
        if self.is_warm(&address) || !self.warm.insert(address) {
            return false;
        }
        if let Some(level) = self.levels.last_mut() {
            level.warmed_addresses.push(address);
        }
        true
    }

    /// Marks a slot warm, returning `true` if it was cold.
    pub fn warm_slot(&mut self, address: Address, slot: U256) -> bool {
        if self.is_warm_slot(&address, &slot) || !self.warm_slots.insert((address, slot)) {
            return false;
        }
        if let Some(level) = self.levels.last_mut() {
            level.warmed_slots.push((address, slot));
        }
        true
    }

    /// Marks an address warm for the rest of the transaction, reverts included.
    pub fn warm_permanently(&mut self, address: Address) {
        self.always_warm.insert(address);
    }

    /// Marks a slot warm for the rest of the transaction, reverts included.
    pub fn warm_slot_permanently(&mut self, address: Address, slot: U256) {
        self.always_warm_slots.insert((address, slot));
    }

    /// Records an interaction with `address`, making it a candidate for empty-account cleanup.
    pub fn touch(&mut self, address: Address) {
        if !self.touched.insert(address) {
            return;
        }
        if let Some(level) = self.levels.last_mut() {
            level.touched.push(address);
        }
    }

    /// Returns `true` if the address was touched.
    pub fn is_touched(&self, address: &Address) -> bool {
        self.touched.contains(address)
    }

    /// Touched addresses in ascending order.
    pub fn touched(&self) -> Vec<Address> {
        let mut touched: Vec<_> = self.touched.iter().copied().collect();
        touched.sort_unstable();
        touched
    }

    /// Reads transient storage (EIP-1153).
    pub fn tload(&self, address: Address, slot: U256) -> U256 {
        self.transient
            .get(&(address, slot))
            .copied()
            .unwrap_or_default()
    }

    /// Writes transient storage (EIP-1153).
    pub fn tstore(&mut self, address: Address, slot: U256, value: U256) {
        let key = (address, slot);
        let prior = if value.is_zero() {
            self.transient.remove(&key)
        } else {
            self.transient.insert(key, value)
        }
        .unwrap_or_default();
        if prior == value {
            return;
        }
        if let Some(level) = self.levels.last_mut() {
            level.transient.push((key, prior));
        }
    }

    /// Opens a checkpoint.
    pub fn checkpoint(&mut self) {
        self.levels.push(JournalLevel::default());
    }

    /// Keeps the changes since the last checkpoint.
    ///
    /// Returns `false` if no checkpoint was open.
    pub fn commit(&mut self) -> bool {
        let Some(level) = self.levels.pop() else {
            return false;
        };
        if let Some(parent) = self.levels.last_mut() {
            parent.append(level);
        }
        true
    }

    /// Undoes the changes since the last checkpoint.
    ///
    /// The RIPEMD-160 precompile stays touched, matching the behavior mainnet locked in after
    /// block 2675119.
    ///
    /// Returns `false` if no checkpoint was open.
    pub fn revert(&mut self) -> bool {
        let Some(level) = self.levels.pop() else {
            return false;
        };
        for address in level.warmed_addresses {
            self.warm.remove(&address);
        }
        for slot in level.warmed_slots {
            self.warm_slots.remove(&slot);
        }
        let mut ripemd_touched = false;
        for address in level.touched {
            if address == PRECOMPILE3 {
                ripemd_touched = true;
                continue;
            }
            self.touched.remove(&address);
        }
        if ripemd_touched {
            if let Some(parent) = self.levels.last_mut() {
                parent.touched.push(PRECOMPILE3);
            }
        }
        for (key, prior) in level.transient.into_iter().rev() {
            if prior.is_zero() {
                self.transient.remove(&key);
            } else {
                self.transient.insert(key, prior);
            }
        }
        true
    }

    /// Number of open checkpoints.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Resets everything at the end of a transaction.
    pub fn clear(&mut self) {
        self.always_warm.clear();
        self.always_warm_slots.clear();
        self.warm.clear();
        self.warm_slots.clear();
        self.touched.clear();
        self.transient.clear();
        self.levels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::address;

    const A: Address = address!("0x000000000000000000000000000000000000aaaa");
    const B: Address = address!("0x000000000000000000000000000000000000bbbb");

    #[test]
    fn warm_slot_is_cold_again_after_revert() {
        let mut journal = Journal::new();
        journal.checkpoint();
        assert!(journal.warm_slot(A, U256::from(1)));
        assert!(!journal.warm_slot(A, U256::from(1)));
        journal.revert();
        assert!(!journal.is_warm_slot(&A, &U256::from(1)));
        assert!(journal.warm_slot(A, U256::from(1)));
    }

    #[test]
    fn commit_keeps_warmth_for_outer_revert() {
        let mut journal = Journal::new();
        journal.checkpoint();
        journal.checkpoint();
        journal.warm(A);
        journal.touch(A);
        journal.commit();
        assert!(journal.is_warm(&A));
        journal.revert();
        assert!(!journal.is_warm(&A));
        assert!(!journal.is_touched(&A));
        assert_eq!(journal.depth(), 0);
    }

    #[test]
    fn permanent_entries_survive_revert() {
        let mut journal = Journal::new();
        journal.warm_permanently(A);
        journal.warm_slot_permanently(B, U256::ZERO);
        journal.checkpoint();
        assert!(!journal.warm(A));
        assert!(!journal.warm_slot(B, U256::ZERO));
        journal.revert();
        assert!(journal.is_warm(&A));
        assert!(journal.is_warm_slot(&B, &U256::ZERO));
    }

    #[test]
    fn ripemd_stays_touched() {
        let mut journal = Journal::new();
        journal.checkpoint();
        journal.checkpoint();
        journal.touch(PRECOMPILE3);
        journal.touch(A);
        journal.revert();
        journal.revert();
        assert!(journal.is_touched(&PRECOMPILE3));
        assert!(!journal.is_touched(&A));
    }

    #[test]
    fn transient_storage_reverts_in_order() {
        let mut journal = Journal::new();
        journal.tstore(A, U256::from(1), U256::from(1));
        journal.checkpoint();
        journal.tstore(A, U256::from(1), U256::from(2));
        journal.tstore(A, U256::from(1), U256::from(3));
        journal.tstore(A, U256::from(2), U256::from(4));
        assert_eq!(journal.tload(A, U256::from(1)), U256::from(3));
        journal.revert();
        assert_eq!(journal.tload(A, U256::from(1)), U256::from(1));
        assert_eq!(journal.tload(A, U256::from(2)), U256::ZERO);
        journal.clear();
        assert_eq!(journal.tload(A, U256::from(1)), U256::ZERO);
    }
}
