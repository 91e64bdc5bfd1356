//! # stratum-primitives
//!
//! Types shared by every stratum crate: numeric and hash types re-exported from
//! `alloy-primitives`, hard fork ids, resolved EIP feature sets and protocol constants.
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;
pub mod eip;
pub mod hardfork;

pub use alloy_primitives::{
    self, address, b256, bytes, fixed_bytes, hex, keccak256, Address, Bytes, FixedBytes, Log,
    LogData, TxKind, B256, I256, U256, uint,
};
pub use constants::*;
pub use eip::{ConfigError, Features};
pub use hardfork::SpecId;

/// Map type used across the workspace.
pub use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
