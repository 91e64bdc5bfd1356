//! Individually addressable protocol features.
//!
//! Every gas rule, opcode and precompile that changed across forks is keyed by the EIP that
//! introduced the change. A fork resolves to a [`Features`] set, and extra EIPs can be switched on
//! on top of it.
use crate::hardfork::SpecId;
use bitflags::bitflags;

bitflags! {
    /// Resolved set of active EIPs.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Features: u64 {
        /// Homestead contract creation: failing code deposit fails the create.
        const EIP2 = 1 << 0;
        /// DELEGATECALL.
        const EIP7 = 1 << 1;
        /// Gas cost changes for IO-heavy operations, 63/64 call rule.
        const EIP150 = 1 << 2;
        /// EXP byte cost increase.
        const EIP160 = 1 << 3;
        /// State trie clearing.
        const EIP161 = 1 << 4;
        /// Contract code size limit.
        const EIP170 = 1 << 5;
        /// REVERT.
        const EIP140 = 1 << 6;
        /// bn254 addition and scalar multiplication precompiles.
        const EIP196 = 1 << 7;
        /// bn254 pairing precompile.
        const EIP197 = 1 << 8;
        /// Big integer modular exponentiation precompile.
        const EIP198 = 1 << 9;
        /// RETURNDATASIZE and RETURNDATACOPY.
        const EIP211 = 1 << 10;
        /// STATICCALL.
        const EIP214 = 1 << 11;
        /// Bitwise shifting.
        const EIP145 = 1 << 12;
        /// CREATE2.
        const EIP1014 = 1 << 13;
        /// EXTCODEHASH.
        const EIP1052 = 1 << 14;
        /// Net gas metering for SSTORE without dirty maps (Constantinople only).
        const EIP1283 = 1 << 15;
        /// BLAKE2 compression function precompile.
        const EIP152 = 1 << 16;
        /// Reduced bn254 precompile gas costs.
        const EIP1108 = 1 << 17;
        /// CHAINID.
        const EIP1344 = 1 << 18;
        /// Repricing for trie-size-dependent opcodes, SELFBALANCE.
        const EIP1884 = 1 << 19;
        /// Structured definitions for net gas metering.
        const EIP2200 = 1 << 20;
        /// ModExp gas cost.
        const EIP2565 = 1 << 21;
        /// Gas cost increases for state access opcodes (warm/cold).
        const EIP2929 = 1 << 22;
        /// Optional access lists.
        const EIP2930 = 1 << 23;
        /// BASEFEE.
        const EIP3198 = 1 << 24;
        /// Reduction in refunds.
        const EIP3529 = 1 << 25;
        /// Reject new contracts starting with the 0xEF byte.
        const EIP3541 = 1 << 26;
        /// Warm COINBASE.
        const EIP3651 = 1 << 27;
        /// PUSH0.
        const EIP3855 = 1 << 28;
        /// Limit and meter initcode.
        const EIP3860 = 1 << 29;
        /// DIFFICULTY returns PREVRANDAO.
        const EIP4399 = 1 << 30;
        /// Transient storage opcodes.
        const EIP1153 = 1 << 31;
        /// Shard blob transactions: BLOBHASH and the point evaluation precompile.
        const EIP4844 = 1 << 32;
        /// MCOPY.
        const EIP5656 = 1 << 33;
        /// SELFDESTRUCT only in same transaction.
        const EIP6780 = 1 << 34;
        /// BLOBBASEFEE.
        const EIP7516 = 1 << 35;
        /// Simple subroutines for the EVM. Never part of a fork, opt-in only.
        const EIP2315 = 1 << 36;
    }
}

/// EIP number, flag and the fork that activated it. `None` marks opt-in EIPs.
const EIP_TABLE: &[(u64, Features, Option<SpecId>)] = &[
    (2, Features::EIP2, Some(SpecId::HOMESTEAD)),
    (7, Features::EIP7, Some(SpecId::HOMESTEAD)),
    (150, Features::EIP150, Some(SpecId::TANGERINE)),
    (160, Features::EIP160, Some(SpecId::SPURIOUS_DRAGON)),
    (161, Features::EIP161, Some(SpecId::SPURIOUS_DRAGON)),
    (170, Features::EIP170, Some(SpecId::SPURIOUS_DRAGON)),
    (140, Features::EIP140, Some(SpecId::BYZANTIUM)),
    (196, Features::EIP196, Some(SpecId::BYZANTIUM)),
    (197, Features::EIP197, Some(SpecId::BYZANTIUM)),
    (198, Features::EIP198, Some(SpecId::BYZANTIUM)),
    (211, Features::EIP211, Some(SpecId::BYZANTIUM)),
    (214, Features::EIP214, Some(SpecId::BYZANTIUM)),
    (145, Features::EIP145, Some(SpecId::CONSTANTINOPLE)),
    (1014, Features::EIP1014, Some(SpecId::CONSTANTINOPLE)),
    (1052, Features::EIP1052, Some(SpecId::CONSTANTINOPLE)),
    (1283, Features::EIP1283, Some(SpecId::CONSTANTINOPLE)),
    (152, Features::EIP152, Some(SpecId::ISTANBUL)),
    (1108, Features::EIP1108, Some(SpecId::ISTANBUL)),
    (1344, Features::EIP1344, Some(SpecId::ISTANBUL)),
    (1884, Features::EIP1884, Some(SpecId::ISTANBUL)),
    (2200, Features::EIP2200, Some(SpecId::ISTANBUL)),
    (2565, Features::EIP2565, Some(SpecId::BERLIN)),
    (2929, Features::EIP2929, Some(SpecId::BERLIN)),
    (2930, Features::EIP2930, Some(SpecId::BERLIN)),
    (3198, Features::EIP3198, Some(SpecId::LONDON)),
    (3529, Features::EIP3529, Some(SpecId::LONDON)),
    (3541, Features::EIP3541, Some(SpecId::LONDON)),
    (4399, Features::EIP4399, Some(SpecId::MERGE)),
    (3651, Features::EIP3651, Some(SpecId::SHANGHAI)),
    (3855, Features::EIP3855, Some(SpecId::SHANGHAI)),
    (3860, Features::EIP3860, Some(SpecId::SHANGHAI)),
    (1153, Features::EIP1153, Some(SpecId::CANCUN)),
    (4844, Features::EIP4844, Some(SpecId::CANCUN)),
    (5656, Features::EIP5656, Some(SpecId::CANCUN)),
    (6780, Features::EIP6780, Some(SpecId::CANCUN)),
    (7516, Features::EIP7516, Some(SpecId::CANCUN)),
    (2315, Features::EIP2315, None),
];

/// Invalid fork configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The EIP number is not implemented.
    #[error("EIP-{0} is not supported")]
    UnsupportedEip(u64),
    /// Two enabled EIPs assign different meanings to the same opcodes.
    #[error("EIP-{eip} conflicts with active EIP-{conflicts_with}")]
    ConflictingEips {
        /// EIP being enabled.
        eip: u64,
        /// Already active EIP it collides with.
        conflicts_with: u64,
    },
}

impl Features {
    /// Returns the features activated by the given fork.
    ///
    /// EIP-1283 is only part of Constantinople, Petersburg removed it again.
    pub fn for_spec(spec: SpecId) -> Self {
        let mut features = Self::empty();
        for (eip, flag, fork) in EIP_TABLE {
            let Some(fork) = fork else { continue };
            if *eip == 1283 {
                if spec == SpecId::CONSTANTINOPLE {
                    features |= *flag;
                }
                continue;
            }
            if spec.is_enabled_in(*fork) {
                features |= *flag;
            }
        }
        features
    }

    /// Returns the flag for an EIP number.
    pub fn from_eip(eip: u64) -> Option<Self> {
        EIP_TABLE
            .iter()
            .find(|(number, ..)| *number == eip)
            .map(|(_, flag, _)| *flag)
    }

    /// Resolves a fork plus extra EIP numbers into a feature set.
    pub fn resolve(spec: SpecId, extra_eips: &[u64]) -> Result<Self, ConfigError> {
        let mut features = Self::for_spec(spec);
        for eip in extra_eips {
            let flag = Self::from_eip(*eip).ok_or(ConfigError::UnsupportedEip(*eip))?;
            features |= flag;
        }
        features.check_conflicts()?;
        Ok(features)
    }

    /// Active EIP numbers in ascending order.
    pub fn eip_numbers(&self) -> Vec<u64> {
        let mut eips: Vec<u64> = EIP_TABLE
            .iter()
            .filter(|(_, flag, _)| self.contains(*flag))
            .map(|(eip, ..)| *eip)
            .collect();
        eips.sort_unstable();
        eips
    }

    /// Returns `true` if the EIP with the given number is active.
    pub fn is_eip_active(&self, eip: u64) -> bool {
        Self::from_eip(eip).is_some_and(|flag| self.contains(flag))
    }

    fn check_conflicts(&self) -> Result<(), ConfigError> {
        // subroutine opcodes occupy 0x5c..=0x5e
        if self.contains(Self::EIP2315) {
            for (other, eip) in [(Self::EIP1153, 1153), (Self::EIP5656, 5656)] {
                if self.contains(other) {
                    return Err(ConfigError::ConflictingEips {
                        eip: 2315,
                        conflicts_with: eip,
                    });
                }
            }
        }
        Ok(())
    }
}
