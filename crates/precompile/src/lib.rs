//! # stratum-precompile
//!
//! Implementations of the EVM precompiled contracts at addresses 0x01 to 0x0a.
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod blake2;
pub mod bn128;
pub mod hash;
pub mod identity;
pub mod interface;
#[cfg(feature = "c-kzg")]
pub mod kzg_point_evaluation;
pub mod modexp;
pub mod secp256k1;
pub mod utilities;

pub use interface::*;

use cfg_if::cfg_if;
use once_cell::race::OnceBox;
use primitives::{Address, Features, HashMap, SpecId};

/// Linear price of `base + word * words(len)`.
pub fn calc_linear_cost_u32(len: usize, base: u64, word: u64) -> u64 {
    (len as u64).div_ceil(32) * word + base
}

/// Precompile with its address.
#[derive(Clone, Debug)]
pub struct PrecompileWithAddress(pub Address, pub PrecompileFn);

impl From<(Address, PrecompileFn)> for PrecompileWithAddress {
    fn from(value: (Address, PrecompileFn)) -> Self {
        PrecompileWithAddress(value.0, value.1)
    }
}

impl PrecompileWithAddress {
    /// Returns reference of address.
    #[inline]
    pub fn address(&self) -> &Address {
        &self.0
    }

    /// Returns reference of precompile.
    #[inline]
    pub fn precompile(&self) -> &PrecompileFn {
        &self.1
    }
}

/// Precompiles active under one feature set.
#[derive(Clone, Default, Debug)]
pub struct Precompiles {
    inner: HashMap<Address, PrecompileFn>,
}

impl Precompiles {
    /// Resolves the precompiles active under `features`.
    ///
    /// Addresses whose introducing EIP is inactive are left out and behave as plain accounts.
    pub fn new(features: Features) -> Self {
        let mut precompiles = Self::default();
        precompiles.extend([
            secp256k1::ECRECOVER,
            hash::SHA256,
            hash::RIPEMD160,
            identity::FUN,
        ]);

        // EIP-198: Big integer modular exponentiation.
        if features.contains(Features::EIP198) {
            precompiles.extend([if features.contains(Features::EIP2565) {
                modexp::BERLIN
            } else {
                modexp::BYZANTIUM
            }]);
        }

        // EIP-196/EIP-197 alt_bn128 operations, repriced by EIP-1108.
        let istanbul_prices = features.contains(Features::EIP1108);
        if features.contains(Features::EIP196) {
            precompiles.extend(if istanbul_prices {
                [bn128::add::ISTANBUL, bn128::mul::ISTANBUL]
            } else {
                [bn128::add::BYZANTIUM, bn128::mul::BYZANTIUM]
            });
        }
        if features.contains(Features::EIP197) {
            precompiles.extend([if istanbul_prices {
                bn128::pair::ISTANBUL
            } else {
                bn128::pair::BYZANTIUM
            }]);
        }

        // EIP-152: Add BLAKE2 compression function `F` precompile.
        if features.contains(Features::EIP152) {
            precompiles.extend([blake2::FUN]);
        }

        // EIP-4844: Shard Blob Transactions
        if features.contains(Features::EIP4844) {
            cfg_if! {
                if #[cfg(feature = "c-kzg")] {
                    let precompile = kzg_point_evaluation::POINT_EVALUATION;
                } else {
                    let precompile = PrecompileWithAddress(u64_to_address(0x0A), |_, _| {
                        Err(PrecompileError::Other("c-kzg feature is not enabled".into()))
                    });
                }
            }
            precompiles.extend([precompile]);
        }

        precompiles
    }

    /// Returns the shared precompile set of a hard fork without extra EIPs.
    pub fn for_spec(spec: SpecId) -> &'static Self {
        static INSTANCES: [OnceBox<Precompiles>; SpecId::ALL.len()] =
            [const { OnceBox::new() }; SpecId::ALL.len()];
        INSTANCES[spec as usize].get_or_init(|| Box::new(Self::new(Features::for_spec(spec))))
    }

    /// Returns an iterator over the precompiles addresses.
    #[inline]
    pub fn addresses(&self) -> impl ExactSizeIterator<Item = &Address> {
        self.inner.keys()
    }

    /// Is the given address a precompile.
    #[inline]
    pub fn contains(&self, address: &Address) -> bool {
        self.inner.contains_key(address)
    }

    /// Returns the precompile for the given address.
    #[inline]
    pub fn get(&self, address: &Address) -> Option<&PrecompileFn> {
        self.inner.get(address)
    }

    /// Runs the precompile at `address`, `None` if there is none.
    #[inline]
    pub fn dispatch(
        &self,
        address: &Address,
        input: &[u8],
        gas_limit: u64,
    ) -> Option<PrecompileResult> {
        self.get(address).map(|precompile| precompile(input, gas_limit))
    }

    /// Is the precompiles list empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of precompiles.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Extends the precompiles with the given precompiles.
    ///
    /// Other precompiles with overwrite existing precompiles.
    #[inline]
    pub fn extend(&mut self, other: impl IntoIterator<Item = PrecompileWithAddress>) {
        self.inner
            .extend(other.into_iter().map(|PrecompileWithAddress(address, f)| (address, f)));
    }
}

/// Const function for making an address by concatenating the bytes from two given numbers.
///
/// Note that 32 + 128 = 160 = 20 bytes (the length of an address).
///
/// This function is used as a convenience for specifying the addresses of the various precompiles.
#[inline]
pub const fn u64_to_address(x: u64) -> Address {
    let x = x.to_be_bytes();
    Address::new([
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, x[0], x[1], x[2], x[3], x[4], x[5], x[6], x[7],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SpecId::FRONTIER, 4)]
    #[case(SpecId::BYZANTIUM, 8)]
    #[case(SpecId::ISTANBUL, 9)]
    #[case(SpecId::BERLIN, 9)]
    #[case(SpecId::CANCUN, 10)]
    fn precompiles_by_fork(#[case] spec: SpecId, #[case] expected: usize) {
        let precompiles = Precompiles::for_spec(spec);
        assert_eq!(precompiles.len(), expected);
        assert!(precompiles.contains(&u64_to_address(1)));
        assert!(!precompiles.contains(&u64_to_address(0x0b)));
    }

    #[test]
    fn pricing_follows_features() {
        let byzantium = Precompiles::new(Features::for_spec(SpecId::BYZANTIUM));
        let istanbul = Precompiles::new(Features::for_spec(SpecId::ISTANBUL));
        let add = u64_to_address(6);
        let input = [0u8; 128];
        assert_eq!(byzantium.dispatch(&add, &input, 1_000).unwrap().unwrap().gas_used, 500);
        assert_eq!(istanbul.dispatch(&add, &input, 1_000).unwrap().unwrap().gas_used, 150);
        assert!(istanbul.dispatch(&u64_to_address(0x0a), &[], 100_000).is_none());
    }

    #[test]
    fn identity_prices_words() {
        let precompiles = Precompiles::for_spec(SpecId::CANCUN);
        let out = precompiles
            .dispatch(&u64_to_address(4), &[1, 2, 3], 18)
            .unwrap()
            .unwrap();
        assert_eq!(out.bytes[..], [1, 2, 3]);
        assert_eq!(out.gas_used, 18);
        assert_eq!(
            precompiles.dispatch(&u64_to_address(4), &[0; 33], 20),
            Some(Err(PrecompileError::OutOfGas))
        );
    }
}
