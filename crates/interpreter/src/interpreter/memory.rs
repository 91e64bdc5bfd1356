use core::cmp::min;
use primitives::U256;

/// Byte-addressed frame memory backed by a `Vec`.
///
/// The length is always a multiple of 32 and only ever grows. Sizing and gas are handled by
/// [`resize_memory!`](crate::resize_memory) before any access, so the accessors here assume the
/// range is in bounds.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Create a new empty memory.
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(4 * 1024),
        }
    }

    /// Get the length of the current memory range.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Return true if current effective memory range is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the full memory.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the type and returns the full memory.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Grows memory to `new_size` bytes, zero filled. Never shrinks.
    #[inline]
    pub fn resize(&mut self, new_size: usize) {
        if new_size > self.data.len() {
            self.data.resize(new_size, 0);
        }
    }

    /// Get memory region at given offset.
    #[inline]
    pub fn slice(&self, offset: usize, size: usize) -> &[u8] {
        &self.data[offset..offset + size]
    }

    /// Set a single byte.
    #[inline]
    pub fn set_byte(&mut self, index: usize, byte: u8) {
        self.data[index] = byte;
    }

    /// Writes a word big-endian at `index`.
    #[inline]
    pub fn set_u256(&mut self, index: usize, value: U256) {
        self.data[index..index + 32].copy_from_slice(&value.to_be_bytes::<{ U256::BYTES }>());
    }

    /// Reads a big-endian word at `index`.
    #[inline]
    pub fn get_u256(&self, index: usize) -> U256 {
        U256::from_be_slice(self.slice(index, 32))
    }

    /// Set memory region at given offset.
    #[inline]
    pub fn set(&mut self, offset: usize, value: &[u8]) {
        if !value.is_empty() {
            self.data[offset..(value.len() + offset)].copy_from_slice(value);
        }
    }

    /// Copies `len` bytes of `data` starting at `data_offset` into memory.
    ///
    /// Bytes past the end of `data` are written as zero.
    #[inline]
    pub fn set_data(&mut self, memory_offset: usize, data_offset: usize, len: usize, data: &[u8]) {
        if data_offset >= data.len() {
            self.data[memory_offset..memory_offset + len].fill(0);
            return;
        }
        let data_end = min(data_offset.saturating_add(len), data.len());
        let memory_data_end = memory_offset + (data_end - data_offset);
        self.data[memory_offset..memory_data_end].copy_from_slice(&data[data_offset..data_end]);
        self.data[memory_data_end..memory_offset + len].fill(0);
    }

    /// In memory copy given a src, dst, and length. Overlapping ranges are handled.
    #[inline]
    pub fn copy(&mut self, dst: usize, src: usize, length: usize) {
        self.data.copy_within(src..src + length, dst);
    }
}

/// Number of 32-byte words needed to hold `len` bytes.
#[inline]
pub const fn num_words(len: u64) -> u64 {
    len.saturating_add(31) / 32
}

/// [`num_words`] for memory offsets.
#[inline]
pub const fn num_words_usize(len: usize) -> usize {
    len.saturating_add(31) / 32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_overlapping() {
        let mut memory = Memory::new();
        let data: Vec<u8> = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        memory.resize(32);
        memory.set_data(0, 0, data.len(), &data);
        memory.copy(2, 0, 4);
        assert_eq!(memory.slice(0, 6), &[1, 2, 1, 2, 3, 4]);
    }

    #[test]
    fn set_data_zero_fills_past_source() {
        let mut memory = Memory::new();
        memory.resize(32);
        memory.set(0, &[0xff; 32]);
        memory.set_data(0, 2, 4, &[1, 2, 3]);
        assert_eq!(memory.slice(0, 5), &[3, 0, 0, 0, 0xff]);
        memory.set_data(0, 100, 2, &[1, 2, 3]);
        assert_eq!(memory.slice(0, 2), &[0, 0]);
    }

    #[test]
    fn never_shrinks() {
        let mut memory = Memory::new();
        memory.resize(64);
        memory.resize(32);
        assert_eq!(memory.len(), 64);
    }

    #[test]
    fn words() {
        assert_eq!(num_words(0), 0);
        assert_eq!(num_words(1), 1);
        assert_eq!(num_words(32), 1);
        assert_eq!(num_words(33), 2);
        assert_eq!(num_words(u64::MAX), u64::MAX / 32);
    }
}
