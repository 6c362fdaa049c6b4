//! Packed fixed-length bit vectors

use crate::bits::validate_bits;
use crate::error::Result;
use std::fmt;
use std::ops::BitXorAssign;

const WORD_BITS: usize = u64::BITS as usize;

/// Fixed-length vector over GF(2)
///
/// Bit `i` lives in word `i / 64` at position `i % 64`. Bits past `len` in the
/// last word are always zero, which keeps equality, hashing and popcounts
/// exact without masking on every read.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Gf2Vector {
    len: usize,
    words: Vec<u64>,
}

impl Gf2Vector {
    /// Create an all-zero vector of `len` bits
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            words: vec![0; len.div_ceil(WORD_BITS)],
        }
    }

    /// Create an all-one vector of `len` bits
    pub fn ones(len: usize) -> Self {
        let mut vector = Self {
            len,
            words: vec![u64::MAX; len.div_ceil(WORD_BITS)],
        };
        vector.clear_tail();
        vector
    }

    /// Build a vector from a 0/1 bit slice
    pub fn from_bits(bits: &[u8]) -> Result<Self> {
        validate_bits(bits)?;
        Ok(Self::from_bits_unchecked(bits))
    }

    /// Build a vector from bits already known to be 0/1
    pub(crate) fn from_bits_unchecked(bits: &[u8]) -> Self {
        let mut vector = Self::zeros(bits.len());
        for (word, chunk) in vector.words.iter_mut().zip(bits.chunks(WORD_BITS)) {
            for (offset, &bit) in chunk.iter().enumerate() {
                *word |= u64::from(bit & 1) << offset;
            }
        }
        vector
    }

    /// Build a vector whose bit `i` is `f(i)`
    pub fn from_fn(len: usize, mut f: impl FnMut(usize) -> bool) -> Self {
        let mut vector = Self::zeros(len);
        for index in 0..len {
            if f(index) {
                vector.words[index / WORD_BITS] |= 1 << (index % WORD_BITS);
            }
        }
        vector
    }

    /// Number of bits
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read bit `index` as 0 or 1
    ///
    /// Panics if `index >= len`, like slice indexing.
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        assert!(index < self.len, "bit index {index} out of range {}", self.len);
        ((self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1) as u8
    }

    /// Write bit `index`
    #[inline]
    pub fn set(&mut self, index: usize, bit: bool) {
        assert!(index < self.len, "bit index {index} out of range {}", self.len);
        let mask = 1u64 << (index % WORD_BITS);
        if bit {
            self.words[index / WORD_BITS] |= mask;
        } else {
            self.words[index / WORD_BITS] &= !mask;
        }
    }

    /// Flip bit `index`
    #[inline]
    pub fn flip(&mut self, index: usize) {
        assert!(index < self.len, "bit index {index} out of range {}", self.len);
        self.words[index / WORD_BITS] ^= 1 << (index % WORD_BITS);
    }

    /// In-place addition over GF(2)
    #[inline]
    pub fn xor_assign(&mut self, other: &Gf2Vector) {
        debug_assert_eq!(self.len, other.len, "vector length mismatch");
        for (lhs, rhs) in self.words.iter_mut().zip(&other.words) {
            *lhs ^= rhs;
        }
    }

    /// Inner product over GF(2): parity of `self & other`
    #[inline]
    pub fn and_parity(&self, other: &Gf2Vector) -> u8 {
        debug_assert_eq!(self.len, other.len, "vector length mismatch");
        let ones: u32 = self
            .words
            .iter()
            .zip(&other.words)
            .map(|(lhs, rhs)| (lhs & rhs).count_ones())
            .sum();
        (ones & 1) as u8
    }

    /// Hamming weight
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Expand into one byte per bit
    pub fn to_bits(&self) -> Vec<u8> {
        let mut bits = vec![0u8; self.len];
        self.write_bits(&mut bits);
        bits
    }

    /// Expand into a caller-provided buffer of exactly `len` bytes
    pub fn write_bits(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.len);
        for (chunk, &word) in out.chunks_mut(WORD_BITS).zip(&self.words) {
            for (offset, bit) in chunk.iter_mut().enumerate() {
                *bit = ((word >> offset) & 1) as u8;
            }
        }
    }

    fn clear_tail(&mut self) {
        let used = self.len % WORD_BITS;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }
}

impl BitXorAssign<&Gf2Vector> for Gf2Vector {
    fn bitxor_assign(&mut self, rhs: &Gf2Vector) {
        self.xor_assign(rhs);
    }
}

impl fmt::Display for Gf2Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..self.len {
            f.write_str(if self.get(index) == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Gf2Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gf2Vector({self})")
    }
}
