use core::fmt;
use primitives::{B256, U256};

/// EVM interpreter stack limit.
pub const STACK_LIMIT: usize = 1024;

/// EVM stack.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stack {
    data: Vec<U256>,
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{x}")?;
        }
        f.write_str("]")
    }
}

impl Default for Stack {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    /// Instantiate a new stack with the [default stack limit][STACK_LIMIT].
    #[inline]
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(STACK_LIMIT),
        }
    }

    /// Returns the length of the stack in words.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns whether the stack is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the underlying data of the stack, bottom first.
    #[inline]
    pub fn data(&self) -> &[U256] {
        &self.data
    }

    /// Push a new value onto the stack.
    ///
    /// Returns `false` and leaves the stack unchanged if the limit would be exceeded.
    #[inline]
    #[must_use]
    pub fn push(&mut self, value: U256) -> bool {
        if self.data.len() == STACK_LIMIT {
            return false;
        }
        self.data.push(value);
        true
    }

    /// Pushes a hash as a big-endian word.
    #[inline]
    #[must_use]
    pub fn push_b256(&mut self, value: B256) -> bool {
        self.push(value.into())
    }

    /// Removes the topmost element.
    #[inline]
    pub fn pop(&mut self) -> Option<U256> {
        self.data.pop()
    }

    /// Pops `N` values, the topmost one first.
    ///
    /// Returns `None` and leaves the stack unchanged if fewer than `N` values are present.
    #[inline]
    pub fn popn<const N: usize>(&mut self) -> Option<[U256; N]> {
        if self.data.len() < N {
            return None;
        }
        let mut out = [U256::ZERO; N];
        for slot in out.iter_mut() {
            *slot = self.data.pop()?;
        }
        Some(out)
    }

    /// Pops `N` values and returns a mutable reference to the new top.
    ///
    /// Requires `N + 1` values. The top is overwritten in place by the caller.
    #[inline]
    pub fn popn_top<const N: usize>(&mut self) -> Option<([U256; N], &mut U256)> {
        if self.data.len() < N + 1 {
            return None;
        }
        let popped = self.popn::<N>()?;
        let top = self.data.last_mut()?;
        Some((popped, top))
    }

    /// Peek a value at given index for the stack, where the top of
    /// the stack is at index `0`.
    #[inline]
    pub fn peek(&self, no_from_top: usize) -> Option<U256> {
        if self.data.len() > no_from_top {
            Some(self.data[self.data.len() - no_from_top - 1])
        } else {
            None
        }
    }

    /// Duplicates the `n`th value from the top of the stack, `n` starting at 1.
    ///
    /// Returns `false` on underflow or overflow.
    #[inline]
    #[must_use]
    pub fn dup(&mut self, n: usize) -> bool {
        let len = self.data.len();
        if n == 0 || len < n || len + 1 > STACK_LIMIT {
            return false;
        }
        let value = self.data[len - n];
        self.data.push(value);
        true
    }

    /// Swaps the topmost value with the `n`th value from the top.
    #[inline]
    #[must_use]
    pub fn swap(&mut self, n: usize) -> bool {
        let len = self.data.len();
        if n == 0 || len <= n {
            return false;
        }
        self.data.swap(len - 1, len - 1 - n);
        true
    }

    /// Pushes up to 32 big-endian bytes as one word.
    #[inline]
    #[must_use]
    pub fn push_slice(&mut self, slice: &[u8]) -> bool {
        debug_assert!(slice.len() <= 32);
        let mut word = [0u8; 32];
        word[32 - slice.len()..].copy_from_slice(slice);
        self.push(U256::from_be_bytes(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popn_returns_top_first() {
        let mut stack = Stack::new();
        assert!(stack.push(U256::from(1)));
        assert!(stack.push(U256::from(2)));
        assert_eq!(stack.popn::<2>(), Some([U256::from(2), U256::from(1)]));
        assert!(stack.is_empty());
    }

    #[test]
    fn underflow_leaves_stack() {
        let mut stack = Stack::new();
        assert!(stack.push(U256::from(7)));
        assert_eq!(stack.popn::<2>(), None);
        assert!(stack.popn_top::<1>().is_none());
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn overflow_at_limit() {
        let mut stack = Stack::new();
        for i in 0..STACK_LIMIT {
            assert!(stack.push(U256::from(i)));
        }
        assert!(!stack.push(U256::ZERO));
        assert!(!stack.dup(1));
        assert_eq!(stack.len(), STACK_LIMIT);
    }

    #[test]
    fn dup_and_swap() {
        let mut stack = Stack::new();
        for i in 1..=3u64 {
            assert!(stack.push(U256::from(i)));
        }
        assert!(stack.dup(3));
        assert_eq!(stack.peek(0), Some(U256::from(1)));
        assert!(stack.swap(3));
        assert_eq!(stack.data(), &[U256::from(1), U256::from(2), U256::from(3), U256::from(1)]);
        assert!(!stack.swap(4));
    }

    #[test]
    fn push_slice_left_pads() {
        let mut stack = Stack::new();
        assert!(stack.push_slice(&[0x01, 0x00]));
        assert_eq!(stack.pop(), Some(U256::from(0x100)));
    }
}
