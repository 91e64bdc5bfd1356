//! EVM gas calculation utilities.

mod calc;
mod constants;
mod table;

pub use calc::*;
pub use constants::*;
pub use table::static_gas_table;

/// Represents the state of gas during execution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gas {
    /// The initial gas limit. This is constant throughout execution.
    limit: u64,
    /// The remaining gas.
    remaining: u64,
    /// Refunded gas. This is used only at the end of execution.
    refunded: i64,
    /// Memoisation of values for memory expansion cost.
    memory: MemoryGas,
}

impl Gas {
    /// Creates a new `Gas` struct with the given gas limit.
    #[inline]
    pub const fn new(limit: u64) -> Self {
        Self {
            limit,
            remaining: limit,
            refunded: 0,
            memory: MemoryGas::new(),
        }
    }

    /// Creates a new `Gas` struct with the given gas limit, but without any gas remaining.
    #[inline]
    pub const fn new_spent(limit: u64) -> Self {
        Self {
            limit,
            remaining: 0,
            refunded: 0,
            memory: MemoryGas::new(),
        }
    }

    /// Returns the gas limit.
    #[inline]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Returns the memory expansion memo.
    #[inline]
    pub const fn memory(&self) -> &MemoryGas {
        &self.memory
    }

    /// Returns the total amount of gas that was refunded.
    #[inline]
    pub const fn refunded(&self) -> i64 {
        self.refunded
    }

    /// Returns the total amount of gas spent.
    #[inline]
    pub const fn spent(&self) -> u64 {
        self.limit - self.remaining
    }

    /// Returns the amount of gas remaining.
    #[inline]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Returns gas handed back by a child frame.
    #[inline]
    pub fn erase_cost(&mut self, returned: u64) {
        self.remaining += returned;
    }

    /// Spends all remaining gas.
    #[inline]
    pub fn spend_all(&mut self) {
        self.remaining = 0;
    }

    /// Records a refund value.
    ///
    /// `refund` can be negative but `self.refunded` should always be positive
    /// at the end of transact.
    #[inline]
    pub fn record_refund(&mut self, refund: i64) {
        self.refunded += refund;
    }

    /// Caps the refund at a fraction of the spent gas.
    ///
    /// The quotient is 5 under EIP-3529 and 2 before it.
    #[inline]
    pub fn set_final_refund(&mut self, reduced_refunds: bool) {
        let max_refund_quotient = if reduced_refunds { 5 } else { 2 };
        self.refunded = (self.refunded.max(0) as u64).min(self.spent() / max_refund_quotient) as i64;
    }

    /// Overrides the refund value.
    #[inline]
    pub fn set_refund(&mut self, refund: i64) {
        self.refunded = refund;
    }

    /// Records an explicit cost.
    ///
    /// Returns `false` if the gas limit is exceeded, leaving the remaining gas untouched.
    #[inline]
    #[must_use = "prefer using `gas!` instead to return an out-of-gas error on failure"]
    pub fn record_cost(&mut self, cost: u64) -> bool {
        if let Some(new_remaining) = self.remaining.checked_sub(cost) {
            self.remaining = new_remaining;
            return true;
        }
        false
    }

    /// Charges for growing memory to `new_num` words.
    ///
    /// Only growth past the previous high-water mark costs gas.
    #[inline]
    pub fn record_memory_expansion(&mut self, new_num: usize) -> MemoryExtensionResult {
        let Some(additional_cost) = self.memory.record_new_len(new_num) else {
            return MemoryExtensionResult::Same;
        };
        if !self.record_cost(additional_cost) {
            return MemoryExtensionResult::OutOfGas;
        }
        MemoryExtensionResult::Extended
    }
}

/// Result of attempting to extend memory during execution.
#[derive(Debug)]
pub enum MemoryExtensionResult {
    /// Memory was extended.
    Extended,
    /// Memory size stayed the same.
    Same,
    /// Not enough gas to extend memory.
    OutOfGas,
}

/// Utility struct that speeds up calculation of memory expansion
/// It contains the current memory length and its memory expansion cost.
///
/// It allows us to split gas accounting from memory structure.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryGas {
    /// Current memory length in words
    pub words_num: usize,
    /// Current memory expansion cost
    pub expansion_cost: u64,
}

impl MemoryGas {
    /// Creates a new `MemoryGas` instance with zero memory allocation.
    #[inline]
    pub const fn new() -> Self {
        Self {
            words_num: 0,
            expansion_cost: 0,
        }
    }

    /// Records a new memory length and returns the additional cost if memory grew.
    #[inline]
    pub fn record_new_len(&mut self, new_num: usize) -> Option<u64> {
        if new_num <= self.words_num {
            return None;
        }
        self.words_num = new_num;
        let mut cost = memory_gas(new_num as u64);
        core::mem::swap(&mut self.expansion_cost, &mut cost);
        // the swap above leaves the old cost in `cost`
        Some(self.expansion_cost - cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_expansion_charged_once() {
        let mut gas = Gas::new(1_000);
        assert!(matches!(gas.record_memory_expansion(1), MemoryExtensionResult::Extended));
        assert_eq!(gas.spent(), 3);
        assert!(matches!(gas.record_memory_expansion(1), MemoryExtensionResult::Same));
        assert_eq!(gas.spent(), 3);
        assert!(matches!(gas.record_memory_expansion(32), MemoryExtensionResult::Extended));
        assert_eq!(gas.spent(), memory_gas(32));
    }

    #[test]
    fn memory_expansion_out_of_gas_leaves_gas() {
        let mut gas = Gas::new(10);
        assert!(matches!(gas.record_memory_expansion(10), MemoryExtensionResult::OutOfGas));
        assert_eq!(gas.remaining(), 10);
    }

    #[test]
    fn final_refund_is_capped() {
        let mut gas = Gas::new(100);
        assert!(gas.record_cost(100));
        gas.record_refund(80);
        let mut london = gas;
        gas.set_final_refund(false);
        assert_eq!(gas.refunded(), 50);
        london.set_final_refund(true);
        assert_eq!(london.refunded(), 20);
    }
}
