//! alt_bn128 (bn254) addition, scalar multiplication and pairing check, EIP-196 and EIP-197,
//! repriced by EIP-1108.
use crate::{
    utilities::{bool_to_bytes32, right_pad},
    PrecompileError, PrecompileOutput, PrecompileResult, PrecompileWithAddress,
};
use bn::{AffineG1, AffineG2, Fq, Fq2, Group, Gt, G1, G2};

/// Point addition.
pub mod add {
    use super::*;

    const ADDRESS: u64 = 6;

    /// EIP-1108 price.
    pub const ISTANBUL_ADD_GAS_COST: u64 = 150;

    /// Istanbul precompile.
    pub const ISTANBUL: PrecompileWithAddress =
        PrecompileWithAddress(crate::u64_to_address(ADDRESS), |input, gas_limit| {
            run_add(input, ISTANBUL_ADD_GAS_COST, gas_limit)
        });

    /// Original price.
    pub const BYZANTIUM_ADD_GAS_COST: u64 = 500;

    /// Byzantium precompile.
    pub const BYZANTIUM: PrecompileWithAddress =
        PrecompileWithAddress(crate::u64_to_address(ADDRESS), |input, gas_limit| {
            run_add(input, BYZANTIUM_ADD_GAS_COST, gas_limit)
        });
}

/// Scalar multiplication.
pub mod mul {
    use super::*;

    const ADDRESS: u64 = 7;

    /// EIP-1108 price.
    pub const ISTANBUL_MUL_GAS_COST: u64 = 6_000;

    /// Istanbul precompile.
    pub const ISTANBUL: PrecompileWithAddress =
        PrecompileWithAddress(crate::u64_to_address(ADDRESS), |input, gas_limit| {
            run_mul(input, ISTANBUL_MUL_GAS_COST, gas_limit)
        });

    /// Original price.
    pub const BYZANTIUM_MUL_GAS_COST: u64 = 40_000;

    /// Byzantium precompile.
    pub const BYZANTIUM: PrecompileWithAddress =
        PrecompileWithAddress(crate::u64_to_address(ADDRESS), |input, gas_limit| {
            run_mul(input, BYZANTIUM_MUL_GAS_COST, gas_limit)
        });
}

/// Pairing check.
pub mod pair {
    use super::*;

    const ADDRESS: u64 = 8;

    /// EIP-1108 price per pair.
    pub const ISTANBUL_PAIR_PER_POINT: u64 = 34_000;
    /// EIP-1108 base price.
    pub const ISTANBUL_PAIR_BASE: u64 = 45_000;

    /// Istanbul precompile.
    pub const ISTANBUL: PrecompileWithAddress =
        PrecompileWithAddress(crate::u64_to_address(ADDRESS), |input, gas_limit| {
            run_pair(input, ISTANBUL_PAIR_PER_POINT, ISTANBUL_PAIR_BASE, gas_limit)
        });

    /// Original price per pair.
    pub const BYZANTIUM_PAIR_PER_POINT: u64 = 80_000;
    /// Original base price.
    pub const BYZANTIUM_PAIR_BASE: u64 = 100_000;

    /// Byzantium precompile.
    pub const BYZANTIUM: PrecompileWithAddress =
        PrecompileWithAddress(crate::u64_to_address(ADDRESS), |input, gas_limit| {
            run_pair(input, BYZANTIUM_PAIR_PER_POINT, BYZANTIUM_PAIR_BASE, gas_limit)
        });
}

/// FQ_LEN specifies the number of bytes needed to represent an Fq element.
pub const FQ_LEN: usize = 32;

/// SCALAR_LEN specifies the number of bytes needed to represent an Fr element.
pub const SCALAR_LEN: usize = 32;

/// FQ2_LEN specifies the number of bytes needed to represent an Fq^2 element.
pub const FQ2_LEN: usize = 2 * FQ_LEN;

/// G1_LEN specifies the number of bytes needed to represent a G1 element.
pub const G1_LEN: usize = 2 * FQ_LEN;

/// Input length for the add operation.
pub const ADD_INPUT_LEN: usize = 2 * G1_LEN;

/// Input length for the multiplication operation.
pub const MUL_INPUT_LEN: usize = G1_LEN + SCALAR_LEN;

/// Pair element length: one G1 point followed by one G2 point.
pub const PAIR_ELEMENT_LEN: usize = G1_LEN + 2 * FQ2_LEN;

/// Reads a single `Fq` field element from the first 32 bytes of `input`.
#[inline]
fn read_fq(input: &[u8]) -> Result<Fq, PrecompileError> {
    Fq::from_slice(&input[..FQ_LEN]).map_err(|_| PrecompileError::Bn128FieldPointNotAMember)
}

/// Reads an `Fq2` element, imaginary part first.
#[inline]
fn read_fq2(input: &[u8]) -> Result<Fq2, PrecompileError> {
    let y = read_fq(&input[..FQ_LEN])?;
    let x = read_fq(&input[FQ_LEN..2 * FQ_LEN])?;
    Ok(Fq2::new(x, y))
}

/// Reads a G1 point. `(0, 0)` is the point at infinity.
#[inline]
pub fn read_g1_point(input: &[u8]) -> Result<G1, PrecompileError> {
    let px = read_fq(&input[0..FQ_LEN])?;
    let py = read_fq(&input[FQ_LEN..2 * FQ_LEN])?;
    if px == Fq::zero() && py == Fq::zero() {
        Ok(G1::zero())
    } else {
        AffineG1::new(px, py)
            .map(Into::into)
            .map_err(|_| PrecompileError::Bn128AffineGFailedToCreate)
    }
}

/// Reads a G2 point. `(0, 0)` is the point at infinity.
#[inline]
pub fn read_g2_point(input: &[u8]) -> Result<G2, PrecompileError> {
    let ba = read_fq2(&input[0..FQ2_LEN])?;
    let bb = read_fq2(&input[FQ2_LEN..2 * FQ2_LEN])?;
    if ba.is_zero() && bb.is_zero() {
        Ok(G2::zero())
    } else {
        AffineG2::new(ba, bb)
            .map(Into::into)
            .map_err(|_| PrecompileError::Bn128AffineGFailedToCreate)
    }
}

/// Encodes a G1 point as big-endian affine coordinates, all zeroes for infinity.
#[inline]
pub fn encode_g1_point(point: G1) -> Result<[u8; G1_LEN], PrecompileError> {
    let mut output = [0u8; G1_LEN];
    if let Some(point_affine) = AffineG1::from_jacobian(point) {
        point_affine
            .x()
            .to_big_endian(&mut output[..FQ_LEN])
            .map_err(|_| PrecompileError::Bn128FieldPointNotAMember)?;
        point_affine
            .y()
            .to_big_endian(&mut output[FQ_LEN..])
            .map_err(|_| PrecompileError::Bn128FieldPointNotAMember)?;
    }
    Ok(output)
}

/// Runs the point addition with the given flat price.
pub fn run_add(input: &[u8], gas_cost: u64, gas_limit: u64) -> PrecompileResult {
    if gas_cost > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    let input = right_pad::<ADD_INPUT_LEN>(input);

    let p1 = read_g1_point(&input[..G1_LEN])?;
    let p2 = read_g1_point(&input[G1_LEN..])?;
    let output = encode_g1_point(p1 + p2)?;
    Ok(PrecompileOutput::new(gas_cost, output.to_vec().into()))
}

/// Runs the scalar multiplication with the given flat price.
pub fn run_mul(input: &[u8], gas_cost: u64, gas_limit: u64) -> PrecompileResult {
    if gas_cost > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    let input = right_pad::<MUL_INPUT_LEN>(input);

    let p = read_g1_point(&input[..G1_LEN])?;
    // Non canonical scalars are reduced.
    let fr = bn::Fr::from_slice(&input[G1_LEN..G1_LEN + SCALAR_LEN])
        .map_err(|_| PrecompileError::Bn128FieldPointNotAMember)?;
    let output = encode_g1_point(p * fr)?;
    Ok(PrecompileOutput::new(gas_cost, output.to_vec().into()))
}

/// Runs the pairing check priced per pair.
pub fn run_pair(
    input: &[u8],
    pair_per_point_cost: u64,
    pair_base_cost: u64,
    gas_limit: u64,
) -> PrecompileResult {
    let gas_used = (input.len() / PAIR_ELEMENT_LEN) as u64 * pair_per_point_cost + pair_base_cost;
    if gas_used > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    if input.len() % PAIR_ELEMENT_LEN != 0 {
        return Err(PrecompileError::Bn128PairLength);
    }

    let success = if input.is_empty() {
        true
    } else {
        let mut points = Vec::with_capacity(input.len() / PAIR_ELEMENT_LEN);
        for element in input.chunks_exact(PAIR_ELEMENT_LEN) {
            let a = read_g1_point(&element[..G1_LEN])?;
            let b = read_g2_point(&element[G1_LEN..])?;
            // Pairs with a point at infinity contribute nothing.
            if !a.is_zero() && !b.is_zero() {
                points.push((a, b));
            }
        }
        points.is_empty() || bn::pairing_batch(&points) == Gt::one()
    };
    Ok(PrecompileOutput::new(gas_used, bool_to_bytes32(success)))
}
