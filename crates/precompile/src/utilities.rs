//! Input padding helpers.
//!
//! Precompile inputs shorter than their fixed layout are read as if zero-extended. The helpers
//! only allocate when the input is actually short.
use primitives::{Bytes, U256};
use std::borrow::Cow;

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

fn fill(out: &mut [u8], data: &[u8], side: Side) {
    let at = match side {
        Side::Left => out.len() - data.len(),
        Side::Right => 0,
    };
    out[at..at + data.len()].copy_from_slice(data);
}

fn pad_array<const LEN: usize>(data: &[u8], side: Side) -> Cow<'_, [u8; LEN]> {
    match data.first_chunk::<LEN>() {
        Some(chunk) => Cow::Borrowed(chunk),
        None => {
            let mut out = [0u8; LEN];
            fill(&mut out, data, side);
            Cow::Owned(out)
        }
    }
}

fn pad_slice(data: &[u8], len: usize, side: Side) -> Cow<'_, [u8]> {
    match data.get(..len) {
        Some(prefix) => Cow::Borrowed(prefix),
        None => {
            let mut out = vec![0u8; len];
            fill(&mut out, data, side);
            Cow::Owned(out)
        }
    }
}

/// Reads `LEN` bytes of `data` starting at `offset`, zero-extended on the right.
#[inline]
pub fn right_pad_with_offset<const LEN: usize>(data: &[u8], offset: usize) -> Cow<'_, [u8; LEN]> {
    right_pad(data.get(offset..).unwrap_or_default())
}

/// First `LEN` bytes of `data`, zero-extended on the right.
#[inline]
pub fn right_pad<const LEN: usize>(data: &[u8]) -> Cow<'_, [u8; LEN]> {
    pad_array(data, Side::Right)
}

/// First `len` bytes of `data`, zero-extended on the right.
#[inline]
pub fn right_pad_vec(data: &[u8], len: usize) -> Cow<'_, [u8]> {
    pad_slice(data, len, Side::Right)
}

/// First `LEN` bytes of `data`, zero-extended on the left.
#[inline]
pub fn left_pad<const LEN: usize>(data: &[u8]) -> Cow<'_, [u8; LEN]> {
    pad_array(data, Side::Left)
}

/// First `len` bytes of `data`, zero-extended on the left.
#[inline]
pub fn left_pad_vec(data: &[u8], len: usize) -> Cow<'_, [u8]> {
    pad_slice(data, len, Side::Left)
}

/// A boolean as a 32-byte big-endian word.
#[inline]
pub fn bool_to_bytes32(value: bool) -> Bytes {
    Bytes::copy_from_slice(&U256::from(value as u8).to_be_bytes::<32>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_zero_extended() {
        let data = [1, 2, 3, 4];
        let right = right_pad::<8>(&data);
        assert!(matches!(right, Cow::Owned(_)));
        assert_eq!(right[..], [1, 2, 3, 4, 0, 0, 0, 0]);

        let left = left_pad::<8>(&data);
        assert_eq!(left[..], [0, 0, 0, 0, 1, 2, 3, 4]);
        assert_eq!(left_pad_vec(&data, 6)[..], [0, 0, 1, 2, 3, 4]);
        assert_eq!(right_pad_vec(&data, 6)[..], [1, 2, 3, 4, 0, 0]);
    }

    #[test]
    fn long_input_is_borrowed() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let padded = right_pad::<8>(&data);
        assert!(matches!(padded, Cow::Borrowed(_)));
        assert_eq!(padded[..], [1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(matches!(right_pad_vec(&data, 3), Cow::Borrowed(&[1, 2, 3])));
    }

    #[test]
    fn offset_past_end_reads_zeroes() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        assert_eq!(right_pad_with_offset::<4>(&data, 8)[..], [9, 10, 0, 0]);
        assert_eq!(right_pad_with_offset::<4>(&data, 100)[..], [0, 0, 0, 0]);
    }

    #[test]
    fn bool_word() {
        assert_eq!(bool_to_bytes32(false)[..], [0; 32]);
        let word = bool_to_bytes32(true);
        assert_eq!(word[..31], [0; 31]);
        assert_eq!(word[31], 1);
    }
}
