//! Modular exponentiation precompile, EIP-198 with EIP-2565 repricing.
use crate::{
    utilities::{left_pad, left_pad_vec, right_pad_vec, right_pad_with_offset},
    PrecompileError, PrecompileOutput, PrecompileResult, PrecompileWithAddress,
};
use core::cmp::{max, min};
use primitives::{Bytes, U256};

/// Byzantium pricing.
pub const BYZANTIUM: PrecompileWithAddress =
    PrecompileWithAddress(crate::u64_to_address(5), byzantium_run);

/// Berlin pricing, EIP-2565.
pub const BERLIN: PrecompileWithAddress =
    PrecompileWithAddress(crate::u64_to_address(5), berlin_run);

/// See: <https://eips.ethereum.org/EIPS/eip-198>
pub fn byzantium_run(input: &[u8], gas_limit: u64) -> PrecompileResult {
    run_inner(input, gas_limit, 0, byzantium_gas_calc)
}

/// See: <https://eips.ethereum.org/EIPS/eip-2565>
pub fn berlin_run(input: &[u8], gas_limit: u64) -> PrecompileResult {
    run_inner(input, gas_limit, 200, berlin_gas_calc)
}

/// Parses the three length words, prices the call and runs the exponentiation.
pub fn run_inner<F>(input: &[u8], gas_limit: u64, min_gas: u64, calc_gas: F) -> PrecompileResult
where
    F: FnOnce(u64, u64, u64, &U256) -> u64,
{
    // If there is no minimum gas, return error.
    if min_gas > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    // The format of input is:
    // <length_of_BASE> <length_of_EXPONENT> <length_of_MODULUS> <BASE> <EXPONENT> <MODULUS>
    // Where every length is a 32-byte left-padded integer representing the number of bytes
    // to be taken up by the next value.
    const HEADER_LENGTH: usize = 96;

    let base_len = U256::from_be_bytes(right_pad_with_offset::<32>(input, 0).into_owned());
    let exp_len = U256::from_be_bytes(right_pad_with_offset::<32>(input, 32).into_owned());
    let mod_len = U256::from_be_bytes(right_pad_with_offset::<32>(input, 64).into_owned());

    let Ok(base_len) = usize::try_from(base_len) else {
        return Err(PrecompileError::ModexpBaseOverflow);
    };
    let Ok(mod_len) = usize::try_from(mod_len) else {
        return Err(PrecompileError::ModexpModOverflow);
    };

    // Handle a special case when both the base and mod length are zero.
    if base_len == 0 && mod_len == 0 {
        return Ok(PrecompileOutput::new(min_gas, Bytes::new()));
    }

    let Ok(exp_len) = usize::try_from(exp_len) else {
        return Err(PrecompileError::ModexpExpOverflow);
    };

    // Used to extract ADJUSTED_EXPONENT_LENGTH.
    let exp_highp_len = min(exp_len, 32);

    // Throw away the header data as we already extracted lengths.
    let input = input.get(HEADER_LENGTH..).unwrap_or_default();

    let exp_highp = {
        // Get right padded bytes so if data.len is less then exp_len we will get right padded zeroes.
        let right_padded_highp = right_pad_with_offset::<32>(input, base_len);
        // If exp_len is less then 32 bytes get only exp_len bytes and do left padding.
        let out = left_pad::<32>(&right_padded_highp[..exp_highp_len]);
        U256::from_be_bytes(out.into_owned())
    };

    let gas_cost = calc_gas(base_len as u64, exp_len as u64, mod_len as u64, &exp_highp);
    if gas_cost > gas_limit {
        return Err(PrecompileError::OutOfGas);
    }

    // Padding is needed if the input does not contain all 3 values.
    let input_len = base_len.saturating_add(exp_len).saturating_add(mod_len);
    let input = right_pad_vec(input, input_len);
    let (base, input) = input.split_at(base_len);
    let (exponent, modulus) = input.split_at(exp_len);
    debug_assert_eq!(modulus.len(), mod_len);

    let output = aurora_engine_modexp::modexp(base, exponent, modulus);

    // Left pad the result to modulus length.
    Ok(PrecompileOutput::new(
        gas_cost,
        left_pad_vec(&output, mod_len).into_owned().into(),
    ))
}

/// EIP-198 price.
pub fn byzantium_gas_calc(base_len: u64, exp_len: u64, mod_len: u64, exp_highp: &U256) -> u64 {
    gas_calc::<0, 20, _>(base_len, exp_len, mod_len, exp_highp, |max_len| -> U256 {
        // Take the square of the largest length, discounted past 64 and 1024 bytes.
        let x = U256::from(max_len);
        if max_len <= 64 {
            x * x
        } else if max_len <= 1024 {
            x * x / U256::from(4) + U256::from(96) * x - U256::from(3072)
        } else {
            x * x / U256::from(16) + U256::from(480) * x - U256::from(199680)
        }
    })
}

/// EIP-2565 price.
pub fn berlin_gas_calc(base_len: u64, exp_len: u64, mod_len: u64, exp_highp: &U256) -> u64 {
    gas_calc::<200, 3, _>(base_len, exp_len, mod_len, exp_highp, |max_len| -> U256 {
        let words = U256::from(max_len.div_ceil(8));
        words * words
    })
}

/// Number of squarings the exponent needs, at least one.
pub fn calculate_iteration_count(exp_length: u64, exp_highp: &U256) -> u64 {
    let mut iteration_count: u64 = 0;

    if exp_length <= 32 && exp_highp.is_zero() {
        iteration_count = 0;
    } else if exp_length <= 32 {
        iteration_count = exp_highp.bit_len() as u64 - 1;
    } else if exp_length > 32 {
        iteration_count = (8u64.saturating_mul(exp_length - 32))
            .saturating_add(max(1, exp_highp.bit_len()) as u64 - 1);
    }

    max(iteration_count, 1)
}

/// Shared pricing skeleton of both forks.
pub fn gas_calc<const MIN_PRICE: u64, const GAS_DIVISOR: u64, F>(
    base_size: u64,
    exp_size: u64,
    mod_size: u64,
    exp_highp: &U256,
    calculate_multiplication_complexity: F,
) -> u64
where
    F: Fn(u64) -> U256,
{
    let multiplication_complexity = calculate_multiplication_complexity(max(base_size, mod_size));
    let iteration_count = calculate_iteration_count(exp_size, exp_highp);
    let gas = multiplication_complexity.saturating_mul(U256::from(iteration_count))
        / U256::from(GAS_DIVISOR);
    max(MIN_PRICE, gas.saturating_to())
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::hex;
    use rstest::rstest;

    // 3 ** 0xffff mod 2**256 - 2**32 - 977, from the EIP-198 example.
    const EIP198_EXAMPLE: &str = "0000000000000000000000000000000000000000000000000000000000000001\
        0000000000000000000000000000000000000000000000000000000000000020\
        0000000000000000000000000000000000000000000000000000000000000020\
        03\
        fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2e\
        fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f";

    #[test]
    fn fermat_example() {
        let input = hex::decode(EIP198_EXAMPLE).unwrap();
        let out = byzantium_run(&input, u64::MAX).unwrap();
        assert_eq!(
            out.bytes[..],
            hex!("0000000000000000000000000000000000000000000000000000000000000001")
        );
        // 32 * 32 complexity, 255 squarings
        assert_eq!(out.gas_used, 1024 * 255 / 20);

        let out = berlin_run(&input, u64::MAX).unwrap();
        assert_eq!(out.gas_used, 200.max(16 * 255 / 3));
    }

    #[rstest]
    #[case::small_exponent(1, U256::from(3), 1)]
    #[case::zero_exponent(32, U256::ZERO, 1)]
    #[case::long_exponent(33, U256::from(1), 8)]
    #[case::highp_bits(32, U256::from(0x100), 8)]
    fn iteration_count(#[case] exp_len: u64, #[case] highp: U256, #[case] expected: u64) {
        assert_eq!(calculate_iteration_count(exp_len, &highp), expected);
    }

    #[test]
    fn empty_input() {
        assert_eq!(berlin_run(&[], 200).unwrap().gas_used, 200);
        assert_eq!(berlin_run(&[], 199), Err(PrecompileError::OutOfGas));
        assert!(byzantium_run(&[], 0).unwrap().bytes.is_empty());
    }

    #[test]
    fn zero_modulus_pads_output() {
        // base 2, exp 3, mod 0 of length 2
        let input = [
            &U256::from(1).to_be_bytes::<32>()[..],
            &U256::from(1).to_be_bytes::<32>()[..],
            &U256::from(2).to_be_bytes::<32>()[..],
            &[2, 3, 0, 0],
        ]
        .concat();
        let out = berlin_run(&input, 1_000).unwrap();
        assert_eq!(out.bytes[..], [0, 0]);
    }
}
