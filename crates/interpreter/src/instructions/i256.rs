use core::cmp::Ordering;
use primitives::U256;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Sign {
    Plus,
    Minus,
    Zero,
}

pub const MIN_NEGATIVE_VALUE: U256 = U256::from_limbs([
    0x0000000000000000,
    0x0000000000000000,
    0x0000000000000000,
    0x8000000000000000,
]);

const FLIPH_BITMASK_U64: u64 = 0x7FFFFFFFFFFFFFFF;

#[inline]
pub fn i256_sign(val: &U256) -> Sign {
    if val.bit(U256::BITS - 1) {
        Sign::Minus
    } else if val.is_zero() {
        Sign::Zero
    } else {
        Sign::Plus
    }
}

/// Returns the sign of `val` and replaces it with its absolute value.
#[inline]
pub fn i256_sign_compl(val: &mut U256) -> Sign {
    let sign = i256_sign(val);
    if sign == Sign::Minus {
        two_compl_mut(val);
    }
    sign
}

#[inline]
fn u256_remove_sign(val: &mut U256) {
    let mut limbs = val.into_limbs();
    limbs[3] &= FLIPH_BITMASK_U64;
    *val = U256::from_limbs(limbs);
}

#[inline]
pub fn two_compl_mut(op: &mut U256) {
    *op = two_compl(*op);
}

#[inline]
pub fn two_compl(op: U256) -> U256 {
    op.wrapping_neg()
}

#[inline]
pub fn i256_cmp(first: &U256, second: &U256) -> Ordering {
    let first_sign = i256_sign(first);
    let second_sign = i256_sign(second);
    match first_sign.cmp(&second_sign) {
        // same sign: two's complement order matches unsigned order
        Ordering::Equal => first.cmp(second),
        o => o,
    }
}

impl Ord for Sign {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Sign {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Sign {
    const fn rank(self) -> i8 {
        match self {
            Sign::Minus => -1,
            Sign::Zero => 0,
            Sign::Plus => 1,
        }
    }
}

#[inline]
pub fn i256_div(mut first: U256, mut second: U256) -> U256 {
    let second_sign = i256_sign_compl(&mut second);
    if second_sign == Sign::Zero {
        return U256::ZERO;
    }

    let first_sign = i256_sign_compl(&mut first);
    if first == MIN_NEGATIVE_VALUE && second == U256::from(1) {
        return two_compl(MIN_NEGATIVE_VALUE);
    }

    let mut d = first / second;

    // set sign bit to zero
    u256_remove_sign(&mut d);

    if d.is_zero() {
        return U256::ZERO;
    }

    // sign of the quotient is negative iff exactly one operand is negative
    if (first_sign == Sign::Minus) != (second_sign == Sign::Minus) {
        two_compl(d)
    } else {
        d
    }
}

#[inline]
pub fn i256_mod(mut first: U256, mut second: U256) -> U256 {
    let first_sign = i256_sign_compl(&mut first);
    if first_sign == Sign::Zero {
        return U256::ZERO;
    }

    let second_sign = i256_sign_compl(&mut second);
    if second_sign == Sign::Zero {
        return U256::ZERO;
    }

    let mut r = first % second;

    // set sign bit to zero
    u256_remove_sign(&mut r);

    if r.is_zero() {
        return U256::ZERO;
    }

    if first_sign == Sign::Minus {
        two_compl(r)
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::num::Wrapping;

    #[test]
    fn div_i256() {
        // Sanity checks based on i8. Notice that we need to use `Wrapping` here because
        // Rust will prevent the overflow by default whereas the EVM does not.
        assert_eq!(Wrapping(i8::MIN) / Wrapping(-1), Wrapping(i8::MIN));
        assert_eq!(i8::MAX / -1, -i8::MAX);

        let one = U256::from(1);
        let one_hundred = U256::from(100);
        let fifty = U256::from(50);
        let two = U256::from(2);
        let neg_one_hundred = two_compl(one_hundred);
        let minus_one = two_compl(one);
        let max_value = U256::from(2).pow(U256::from(255)) - U256::from(1);
        let neg_max_value = two_compl(max_value);

        assert_eq!(i256_div(MIN_NEGATIVE_VALUE, minus_one), MIN_NEGATIVE_VALUE);
        assert_eq!(i256_div(MIN_NEGATIVE_VALUE, one), MIN_NEGATIVE_VALUE);
        assert_eq!(i256_div(max_value, one), max_value);
        assert_eq!(i256_div(max_value, minus_one), neg_max_value);
        assert_eq!(i256_div(one_hundred, minus_one), neg_one_hundred);
        assert_eq!(i256_div(one_hundred, two), fifty);
        assert_eq!(i256_div(neg_one_hundred, two), two_compl(fifty));
    }

    #[test]
    fn mod_takes_dividend_sign() {
        let minus_eight = two_compl(U256::from(8));
        let three = U256::from(3);
        assert_eq!(i256_mod(minus_eight, three), two_compl(U256::from(2)));
        assert_eq!(i256_mod(U256::from(8), two_compl(three)), U256::from(2));
        assert_eq!(i256_mod(minus_eight, U256::ZERO), U256::ZERO);
    }

    #[test]
    fn cmp_orders_negatives_first() {
        let minus_one = two_compl(U256::from(1));
        assert_eq!(i256_cmp(&minus_one, &U256::ZERO), Ordering::Less);
        assert_eq!(i256_cmp(&U256::from(1), &minus_one), Ordering::Greater);
        assert_eq!(i256_cmp(&MIN_NEGATIVE_VALUE, &minus_one), Ordering::Less);
    }
}
