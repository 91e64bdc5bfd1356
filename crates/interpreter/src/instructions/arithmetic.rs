use super::i256::{i256_div, i256_mod};
use crate::{gas, Host, Interpreter};
use primitives::U256;

pub fn add<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = op1.wrapping_add(*op2);
}

pub fn mul<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = op1.wrapping_mul(*op2);
}

pub fn sub<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = op1.wrapping_sub(*op2);
}

pub fn div<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    if !op2.is_zero() {
        *op2 = op1.wrapping_div(*op2);
    }
}

pub fn sdiv<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    *op2 = i256_div(op1, *op2);
}

pub fn rem<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    if !op2.is_zero() {
        *op2 = op1.wrapping_rem(*op2);
    }
}

pub fn smod<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    if !op2.is_zero() {
        *op2 = i256_mod(op1, *op2)
    }
}

pub fn addmod<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1, op2], op3, interpreter);
    *op3 = op1.add_mod(op2, *op3)
}

pub fn mulmod<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1, op2], op3, interpreter);
    *op3 = op1.mul_mod(op2, *op3)
}

pub fn exp<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([op1], op2, interpreter);
    gas_or_fail!(interpreter, gas::exp_cost(interpreter.features, *op2));
    *op2 = op1.pow(*op2);
}

/// In the yellow paper `SIGNEXTEND` is defined to take two inputs, we will call them
/// `x` and `y`, and produce one output. The first `t` bits of the output (numbering from the
/// left, starting from 0) are equal to the `t`-th bit of `y`, where `t` is equal to
/// `256 - 8(x + 1)`. The remaining bits of the output are equal to the corresponding bits of `y`.
/// Note: if `x >= 32` then the output is equal to `y` since `t <= 0`. To efficiently implement
/// this algorithm in the case `x < 32` we do the following. Let `b` be equal to the `t`-th bit
/// of `y` and let `s = 255 - t = 8x + 7` (this is effectively the same index as `t`, but
/// numbering the bits from the right instead of the left). We can create a bit mask which is all
/// zeros up to and including the `t`-th bit, and all ones afterwards by computing the quantity
/// `2^s - 1`. We can use this mask to compute the output depending on the value of `b`.
/// If `b == 1` then the yellow paper says the output should be all ones up to
/// and including the `t`-th bit, followed by the remaining bits of `y`; this is equal to
/// `y | !mask` where `|` is the bitwise `OR` and `!` is bitwise negation. Similarly, if
/// `b == 0` then the yellow paper says the output should start with all zeros, then end with
/// bits from `b`; this is equal to `y & mask` where `&` is bitwise `AND`.
pub fn signextend<H: Host + ?Sized>(interpreter: &mut Interpreter, _host: &mut H) {
    popn_top!([ext], x, interpreter);
    // For 31 we also don't need to do anything.
    if ext < U256::from(31) {
        let ext = ext.as_limbs()[0];
        let bit_index = (8 * ext + 7) as usize;
        let bit = x.bit(bit_index);
        let mask = (U256::from(1) << bit_index) - U256::from(1);
        *x = if bit { *x | !mask } else { *x & mask };
    }
}

#[cfg(test)]
mod tests {
    use crate::instructions::test_utils::run_ops;
    use primitives::{SpecId, U256};

    #[test]
    fn wraparound() {
        // MAX + 1 == 0
        let stack = run_ops(&[U256::MAX, U256::from(1)], &[crate::opcode::ADD], SpecId::CANCUN);
        assert_eq!(stack, [U256::ZERO]);
        // 0 - 1 == MAX
        let stack = run_ops(&[U256::from(1), U256::ZERO], &[crate::opcode::SUB], SpecId::CANCUN);
        assert_eq!(stack, [U256::MAX]);
    }

    #[test]
    fn division_by_zero_is_zero() {
        for op in [crate::opcode::DIV, crate::opcode::SDIV, crate::opcode::MOD, crate::opcode::SMOD] {
            let stack = run_ops(&[U256::ZERO, U256::from(7)], &[op], SpecId::CANCUN);
            assert_eq!(stack, [U256::ZERO]);
        }
    }

    #[test]
    fn modular_arithmetic() {
        let stack = run_ops(
            &[U256::from(7), U256::MAX, U256::from(2)],
            &[crate::opcode::ADDMOD],
            SpecId::CANCUN,
        );
        // (MAX + 2) mod 7 without overflow
        assert_eq!(stack, [(U256::MAX % U256::from(7) + U256::from(2)) % U256::from(7)]);
    }

    #[test]
    fn signextend_byte() {
        let stack = run_ops(&[U256::from(0xff), U256::ZERO], &[crate::opcode::SIGNEXTEND], SpecId::CANCUN);
        assert_eq!(stack, [U256::MAX]);
        let stack = run_ops(&[U256::from(0x7f), U256::ZERO], &[crate::opcode::SIGNEXTEND], SpecId::CANCUN);
        assert_eq!(stack, [U256::from(0x7f)]);
    }
}
