//! Precompile result, output and error types.
use primitives::Bytes;

/// A precompile operation result.
///
/// Returns either `Ok(output)` or `Err(error)`. Every error is an exceptional halt that consumes
/// all gas handed to the precompile.
pub type PrecompileResult = Result<PrecompileOutput, PrecompileError>;

/// Precompile function signature: input bytes and gas limit.
pub type PrecompileFn = fn(&[u8], u64) -> PrecompileResult;

/// Precompile execution output.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrecompileOutput {
    /// Gas used by the precompile.
    pub gas_used: u64,
    /// Output bytes.
    pub bytes: Bytes,
}

impl PrecompileOutput {
    /// Returns new precompile output with the given gas used and output bytes.
    pub fn new(gas_used: u64, bytes: Bytes) -> Self {
        Self { gas_used, bytes }
    }
}

/// Precompile failure.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum PrecompileError {
    /// Out of gas error.
    #[error("out of gas")]
    OutOfGas,
    /// The blake2 input length is not 213 bytes.
    #[error("wrong input length for blake2")]
    Blake2WrongLength,
    /// The blake2 final block flag is neither 0 nor 1.
    #[error("wrong final indicator flag for blake2")]
    Blake2WrongFinalIndicatorFlag,
    /// The exponent length does not fit in `usize`.
    #[error("modexp exp overflow")]
    ModexpExpOverflow,
    /// The base length does not fit in `usize`.
    #[error("modexp base overflow")]
    ModexpBaseOverflow,
    /// The modulus length does not fit in `usize`.
    #[error("modexp mod overflow")]
    ModexpModOverflow,
    /// A bn254 coordinate is not a member of the base field.
    #[error("field point not a member of bn254 curve")]
    Bn128FieldPointNotAMember,
    /// The coordinates are not a point on the curve.
    #[error("failed to create affine g point for bn254")]
    Bn128AffineGFailedToCreate,
    /// The pairing input is not a multiple of 192 bytes.
    #[error("bn254 invalid pair length")]
    Bn128PairLength,
    /// The point evaluation input is not 192 bytes.
    #[error("invalid blob input length")]
    BlobInvalidInputLength,
    /// The commitment does not hash to the versioned hash.
    #[error("mismatched blob version")]
    InvalidCommitment,
    /// The KZG proof does not verify.
    #[error("verifying blob kzg proof failed")]
    InvalidProof,
    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

impl PrecompileError {
    /// Returns `true` if the error is out of gas.
    pub fn is_oog(&self) -> bool {
        matches!(self, Self::OutOfGas)
    }
}
