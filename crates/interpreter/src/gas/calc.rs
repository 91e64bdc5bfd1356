use super::constants::*;
use crate::{num_words, SStoreResult, SelfDestructResult};
use primitives::{Features, U256};

/// `SSTORE` opcode refund calculation.
#[allow(clippy::collapsible_else_if)]
#[inline]
pub fn sstore_refund(features: Features, vals: &SStoreResult) -> i64 {
    if features.intersects(Features::EIP2200 | Features::EIP1283) {
        // EIP-3529: Reduction in refunds
        let sstore_clears_schedule = if features.contains(Features::EIP3529) {
            (SSTORE_RESET - COLD_SLOAD_COST + ACCESS_LIST_STORAGE_KEY) as i64
        } else {
            REFUND_SSTORE_CLEARS
        };
        if vals.is_new_eq_present() {
            0
        } else {
            if vals.is_original_eq_present() && vals.is_new_zero() {
                sstore_clears_schedule
            } else {
                let mut refund = 0;

                if !vals.is_original_zero() {
                    if vals.is_present_zero() {
                        refund -= sstore_clears_schedule;
                    } else if vals.is_new_zero() {
                        refund += sstore_clears_schedule;
                    }
                }

                if vals.is_original_eq_new() {
                    let (gas_sstore_reset, gas_sload) = if features.contains(Features::EIP2929) {
                        (WARM_SSTORE_RESET, WARM_STORAGE_READ_COST)
                    } else {
                        (SSTORE_RESET, sload_cost(features, false))
                    };
                    if vals.is_original_zero() {
                        refund += (SSTORE_SET - gas_sload) as i64;
                    } else {
                        refund += (gas_sstore_reset - gas_sload) as i64;
                    }
                }

                refund
            }
        }
    } else {
        if !vals.is_present_zero() && vals.is_new_zero() {
            REFUND_SSTORE_CLEARS
        } else {
            0
        }
    }
}

/// `CREATE2` hashing cost on top of [`CREATE`].
#[inline]
pub const fn create2_cost(len: u64) -> Option<u64> {
    cost_per_word(len, KECCAK256WORD)
}

#[inline]
const fn log2floor(value: U256) -> u64 {
    let mut l: u64 = 256;
    let mut i = 3;
    loop {
        if value.as_limbs()[i] == 0u64 {
            l -= 64;
        } else {
            l -= value.as_limbs()[i].leading_zeros() as u64;
            if l == 0 {
                return l;
            } else {
                return l - 1;
            }
        }
        if i == 0 {
            break;
        }
        i -= 1;
    }
    l
}

/// `EXP` cost on top of the static [`EXP`] charge: a price per byte of the exponent.
#[inline]
pub fn exp_cost(features: Features, power: U256) -> Option<u64> {
    if power.is_zero() {
        return Some(0);
    }
    // EIP-160: EXP cost increase
    let gas_byte: u64 = if features.contains(Features::EIP160) {
        50
    } else {
        10
    };
    gas_byte.checked_mul(log2floor(power) / 8 + 1)
}

/// Word cost of `*COPY` opcodes.
#[inline]
pub const fn copy_cost(len: u64) -> Option<u64> {
    cost_per_word(len, COPY)
}

/// `LOG` data cost on top of the static base and topic charges.
#[inline]
pub const fn log_cost(len: u64) -> Option<u64> {
    LOGDATA.checked_mul(len)
}

/// `KECCAK256` word cost on top of the static [`KECCAK256`] charge.
#[inline]
pub const fn keccak256_cost(len: u64) -> Option<u64> {
    cost_per_word(len, KECCAK256WORD)
}

/// Calculate the cost of buffer per word.
#[inline]
pub const fn cost_per_word(len: u64, multiple: u64) -> Option<u64> {
    multiple.checked_mul(num_words(len))
}

/// EIP-3860: Limit and meter initcode
///
/// Apply extra gas cost of 2 for every 32-byte chunk of initcode.
#[inline]
pub const fn initcode_cost(len: u64) -> u64 {
    INITCODE_WORD_COST.saturating_mul(num_words(len))
}

/// Full `SLOAD` cost.
///
/// Under EIP-2929 the static table holds the warm price and [`cold_sload_surcharge`] is added
/// on first access.
#[inline]
pub const fn sload_cost(features: Features, is_cold: bool) -> u64 {
    if features.contains(Features::EIP2929) {
        if is_cold {
            COLD_SLOAD_COST
        } else {
            WARM_STORAGE_READ_COST
        }
    } else if features.contains(Features::EIP1884) {
        ISTANBUL_SLOAD_GAS
    } else if features.contains(Features::EIP150) {
        // EIP-150: Gas cost changes for IO-heavy operations
        200
    } else {
        50
    }
}

/// Extra cost of a cold storage slot read.
#[inline]
pub const fn cold_sload_surcharge(features: Features, is_cold: bool) -> u64 {
    if is_cold && features.contains(Features::EIP2929) {
        COLD_SLOAD_COST - WARM_STORAGE_READ_COST
    } else {
        0
    }
}

/// Extra cost of a cold account access.
#[inline]
pub const fn cold_account_surcharge(features: Features, is_cold: bool) -> u64 {
    if is_cold && features.contains(Features::EIP2929) {
        COLD_ACCOUNT_ACCESS_COST - WARM_STORAGE_READ_COST
    } else {
        0
    }
}

/// `SSTORE` opcode cost calculation.
///
/// The base price comes from the active rule set: net metering under EIP-2200 and EIP-1283,
/// set or reset otherwise. EIP-2929 only swaps in warm read and reset prices for net metering
/// and adds the cold charge on top.
#[inline]
pub fn sstore_cost(features: Features, vals: &SStoreResult, is_cold: bool) -> u64 {
    let base = if features.intersects(Features::EIP2200 | Features::EIP1283) {
        let sstore_reset = if features.contains(Features::EIP2929) {
            WARM_SSTORE_RESET
        } else {
            SSTORE_RESET
        };
        net_sstore_cost(vals, sload_cost(features, false), sstore_reset)
    } else {
        frontier_sstore_cost(vals)
    };
    if is_cold && features.contains(Features::EIP2929) {
        base + COLD_SLOAD_COST
    } else {
        base
    }
}

/// EIP-2200: Structured Definitions for Net Gas Metering
#[inline]
fn net_sstore_cost(vals: &SStoreResult, sload_gas: u64, sstore_reset_gas: u64) -> u64 {
    if vals.is_new_eq_present() {
        sload_gas
    } else if vals.is_original_eq_present() && vals.is_original_zero() {
        SSTORE_SET
    } else if vals.is_original_eq_present() {
        sstore_reset_gas
    } else {
        sload_gas
    }
}

/// Frontier sstore cost just had two cases set and reset values.
#[inline]
fn frontier_sstore_cost(vals: &SStoreResult) -> u64 {
    if vals.is_present_zero() && !vals.is_new_zero() {
        SSTORE_SET
    } else {
        SSTORE_RESET
    }
}

/// `SELFDESTRUCT` cost on top of the static charge.
#[inline]
pub const fn selfdestruct_cost(features: Features, res: &SelfDestructResult, is_cold: bool) -> u64 {
    // EIP-161: State trie clearing (invariant-preserving alternative)
    let should_charge_topup = if features.contains(Features::EIP161) {
        res.had_value && !res.target_exists
    } else {
        !res.target_exists
    };

    // EIP-150: Gas cost changes for IO-heavy operations
    let mut gas = if features.contains(Features::EIP150) && should_charge_topup {
        NEWACCOUNT
    } else {
        0
    };

    if features.contains(Features::EIP2929) && is_cold {
        gas += COLD_ACCOUNT_ACCESS_COST
    }
    gas
}

/// Call cost on top of the static account access charge.
///
/// * cold account surcharge after EIP-2929,
/// * [`CALLVALUE`] when value moves,
/// * [`NEWACCOUNT`] when the call brings an account into existence. After EIP-161 this only
///   applies to value transfers into empty accounts.
#[inline]
pub const fn call_cost(
    features: Features,
    transfers_value: bool,
    is_cold: bool,
    new_account: bool,
    target_is_empty: bool,
) -> u64 {
    let mut gas = cold_account_surcharge(features, is_cold);

    if transfers_value {
        gas += CALLVALUE;
    }

    if features.contains(Features::EIP161) {
        if transfers_value && target_is_empty {
            gas += NEWACCOUNT;
        }
    } else if new_account {
        gas += NEWACCOUNT;
    }

    gas
}

/// Memory expansion cost calculation for a given number of words.
#[inline]
pub const fn memory_gas(num_words: u64) -> u64 {
    MEMORY
        .saturating_mul(num_words)
        .saturating_add(num_words.saturating_mul(num_words) / 512)
}

/// Initial gas that is deducted for transaction to be included.
/// Initial gas contains initial stipend gas, gas for access list and input data.
pub fn validate_initial_tx_gas(
    features: Features,
    input: &[u8],
    is_create: bool,
    access_list_addresses: u64,
    access_list_storage_keys: u64,
) -> u64 {
    let zero_data_len = input.iter().filter(|v| **v == 0).count() as u64;
    let non_zero_data_len = input.len() as u64 - zero_data_len;

    let mut initial_gas = zero_data_len * TRANSACTION_ZERO_DATA;
    // EIP-2028: Transaction data gas cost reduction
    initial_gas += non_zero_data_len
        * if features.contains(Features::EIP2200) {
            TRANSACTION_NON_ZERO_DATA_ISTANBUL
        } else {
            TRANSACTION_NON_ZERO_DATA_FRONTIER
        };

    if features.contains(Features::EIP2930) {
        initial_gas += access_list_addresses * ACCESS_LIST_ADDRESS;
        initial_gas += access_list_storage_keys * ACCESS_LIST_STORAGE_KEY;
    }

    // EIP-2: Homestead Hard-fork Changes
    initial_gas += if is_create && features.contains(Features::EIP2) {
        TRANSACTION_CREATE
    } else {
        TRANSACTION
    };

    // EIP-3860: Limit and meter initcode
    if is_create && features.contains(Features::EIP3860) {
        initial_gas += initcode_cost(input.len() as u64)
    }

    initial_gas
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::SpecId;
    use rstest::rstest;

    fn vals(original: u64, present: u64, new: u64) -> SStoreResult {
        SStoreResult {
            original_value: U256::from(original),
            present_value: U256::from(present),
            new_value: U256::from(new),
        }
    }

    #[rstest]
    // frontier: set or reset
    #[case(SpecId::PETERSBURG, (0, 0, 1), false, 20000, 0)]
    #[case(SpecId::PETERSBURG, (1, 1, 0), false, 5000, 15000)]
    // EIP-1283: dirty slots cost 200
    #[case(SpecId::CONSTANTINOPLE, (0, 0, 0), false, 200, 0)]
    #[case(SpecId::CONSTANTINOPLE, (0, 1, 2), false, 200, 0)]
    #[case(SpecId::CONSTANTINOPLE, (1, 1, 0), false, 5000, 15000)]
    #[case(SpecId::CONSTANTINOPLE, (0, 1, 0), false, 200, 19800)]
    // EIP-2200
    #[case(SpecId::ISTANBUL, (0, 0, 1), false, 20000, 0)]
    #[case(SpecId::ISTANBUL, (1, 2, 1), false, 800, 4200)]
    #[case(SpecId::ISTANBUL, (1, 0, 1), false, 800, -15000 + 4200)]
    // EIP-2929 layered on EIP-2200
    #[case(SpecId::BERLIN, (1, 1, 2), true, 2900 + 2100, 0)]
    #[case(SpecId::BERLIN, (1, 1, 2), false, 2900, 0)]
    #[case(SpecId::BERLIN, (1, 1, 1), true, 100 + 2100, 0)]
    // EIP-3529
    #[case(SpecId::LONDON, (1, 1, 0), false, 2900, 4800)]
    fn sstore_rules(
        #[case] spec: SpecId,
        #[case] (original, present, new): (u64, u64, u64),
        #[case] is_cold: bool,
        #[case] cost: u64,
        #[case] refund: i64,
    ) {
        let features = Features::for_spec(spec);
        let vals = vals(original, present, new);
        assert_eq!(sstore_cost(features, &vals, is_cold), cost);
        assert_eq!(sstore_refund(features, &vals), refund);
    }

    #[rstest]
    // a warm slot keeps frontier pricing
    #[case((1, 1, 1), false, 5000, 0)]
    #[case((1, 1, 2), false, 5000, 0)]
    #[case((1, 1, 0), false, 5000, 15000)]
    #[case((0, 0, 1), false, 20000, 0)]
    // and a cold one pays the cold read on top
    #[case((1, 1, 2), true, 5000 + 2100, 0)]
    fn access_lists_on_frontier_storage_rules(
        #[case] (original, present, new): (u64, u64, u64),
        #[case] is_cold: bool,
        #[case] cost: u64,
        #[case] refund: i64,
    ) {
        let features = Features::resolve(SpecId::PETERSBURG, &[2929]).unwrap();
        let vals = vals(original, present, new);
        assert_eq!(sstore_cost(features, &vals, is_cold), cost);
        assert_eq!(sstore_refund(features, &vals), refund);
    }

    #[rstest]
    #[case(SpecId::FRONTIER, 50)]
    #[case(SpecId::TANGERINE, 200)]
    #[case(SpecId::ISTANBUL, 800)]
    #[case(SpecId::BERLIN, 100)]
    fn warm_sload_by_fork(#[case] spec: SpecId, #[case] cost: u64) {
        assert_eq!(sload_cost(Features::for_spec(spec), false), cost);
    }

    #[test]
    fn exp_byte_cost() {
        let homestead = Features::for_spec(SpecId::HOMESTEAD);
        let spurious = Features::for_spec(SpecId::SPURIOUS_DRAGON);
        assert_eq!(exp_cost(spurious, U256::ZERO), Some(0));
        assert_eq!(exp_cost(spurious, U256::from(0xff)), Some(50));
        assert_eq!(exp_cost(spurious, U256::from(0x100)), Some(100));
        assert_eq!(exp_cost(homestead, U256::MAX), Some(320));
    }

    #[test]
    fn intrinsic_gas() {
        let istanbul = Features::for_spec(SpecId::ISTANBUL);
        let frontier = Features::for_spec(SpecId::FRONTIER);
        assert_eq!(validate_initial_tx_gas(istanbul, &[0, 1], false, 0, 0), 21000 + 4 + 16);
        assert_eq!(validate_initial_tx_gas(frontier, &[0, 1], false, 0, 0), 21000 + 4 + 68);
        assert_eq!(validate_initial_tx_gas(istanbul, &[], true, 0, 0), 53000);
        assert_eq!(validate_initial_tx_gas(frontier, &[], true, 0, 0), 21000);
        let shanghai = Features::for_spec(SpecId::SHANGHAI);
        assert_eq!(
            validate_initial_tx_gas(shanghai, &[1; 33], true, 1, 2),
            53000 + 33 * 16 + 2 * 2 + 2400 + 2 * 1900
        );
    }
}
