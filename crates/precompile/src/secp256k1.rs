//! `ecrecover` precompile, backed by the pure Rust `k256` crate.
//!
//! Input format:
//! [32 bytes for message][32 bytes for v][32 bytes for r][32 bytes for s]
//!
//! Output format:
//! [32 bytes for recovered address], empty if recovery fails.
use crate::{
    utilities::right_pad, PrecompileError, PrecompileOutput, PrecompileResult,
    PrecompileWithAddress,
};
use k256::ecdsa::{Error, RecoveryId, Signature, VerifyingKey};
use primitives::{alloy_primitives::B512, keccak256, Bytes, B256};

/// `ecrecover` precompile, containing address and function to run.
pub const ECRECOVER: PrecompileWithAddress =
    PrecompileWithAddress(crate::u64_to_address(1), ec_recover_run);

const ECRECOVER_BASE: u64 = 3_000;

/// `ecrecover` precompile function.
pub fn ec_recover_run(input: &[u8], gas_limit: u64) -> PrecompileResult {
    if ECRECOVER_BASE > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    let input = right_pad::<128>(input);

    // `v` must be a 32-byte big-endian integer equal to 27 or 28.
    if !(input[32..63].iter().all(|&b| b == 0) && matches!(input[63], 27 | 28)) {
        return Ok(PrecompileOutput::new(ECRECOVER_BASE, Bytes::new()));
    }

    let msg = B256::from_slice(&input[0..32]);
    let recid = input[63] - 27;
    let sig = B512::from_slice(&input[64..128]);

    let out = ecrecover(&sig, recid, &msg)
        .map(|address| address.to_vec().into())
        .unwrap_or_default();
    Ok(PrecompileOutput::new(ECRECOVER_BASE, out))
}

/// Recovers the signer address of `msg`, left padded to 32 bytes.
pub fn ecrecover(sig: &B512, mut recid: u8, msg: &B256) -> Result<B256, Error> {
    let mut sig = Signature::from_slice(sig.as_slice())?;

    // normalize signature and flip recovery id if needed.
    if let Some(sig_normalized) = sig.normalize_s() {
        sig = sig_normalized;
        recid ^= 1;
    }
    let recid = RecoveryId::from_byte(recid).ok_or_else(Error::new)?;

    let recovered_key = VerifyingKey::recover_from_prehash(&msg[..], &sig, recid)?;
    let mut hash = keccak256(&recovered_key.to_encoded_point(false).as_bytes()[1..]);

    // truncate to 20 bytes
    hash[..12].fill(0);
    Ok(hash)
}
