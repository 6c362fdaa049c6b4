//! Bit stream helpers
//!
//! A bit stream is a byte slice holding one 0/1 value per element. The helpers
//! here validate streams, apply and strip block padding, and convert between
//! packed bytes and bit streams for callers that start from raw files.

use crate::error::{CodeError, Result};

/// Bits per byte when expanding payloads
pub const BYTE_SIZE: usize = 8;

/// Check that every element is exactly 0 or 1
pub fn validate_bits(bits: &[u8]) -> Result<()> {
    match bits.iter().position(|&bit| bit > 1) {
        Some(position) => Err(CodeError::NonBinarySymbol {
            position,
            value: bits[position],
        }),
        None => Ok(()),
    }
}

/// Number of zero bits needed to extend `len` to a multiple of `block`
///
/// `p = (block - len mod block) mod block`. A zero block size yields 0.
pub fn padding_for(len: usize, block: usize) -> usize {
    if block == 0 {
        return 0;
    }
    (block - len % block) % block
}

/// Append zero bits so the stream divides into `block`-sized blocks
///
/// Returns the padded stream and the padding count that must be handed to
/// [`strip_padding`] after decoding.
pub fn pad(bits: &[u8], block: usize) -> (Vec<u8>, usize) {
    let padding = padding_for(bits.len(), block);
    let mut padded = Vec::with_capacity(bits.len() + padding);
    padded.extend_from_slice(bits);
    padded.resize(bits.len() + padding, 0);
    (padded, padding)
}

/// Drop the trailing `padding` bits added by [`pad`]
pub fn strip_padding(mut bits: Vec<u8>, padding: usize) -> Result<Vec<u8>> {
    if padding > bits.len() {
        return Err(CodeError::invalid(
            "padding",
            format!("{} exceeds stream length {}", padding, bits.len()),
        ));
    }
    bits.truncate(bits.len() - padding);
    Ok(bits)
}

/// Count positions where two streams differ
///
/// Streams of unequal length count the excess as errors.
pub fn count_bit_errors(expected: &[u8], actual: &[u8]) -> usize {
    let overlap = expected
        .iter()
        .zip(actual)
        .filter(|(lhs, rhs)| lhs != rhs)
        .count();
    overlap + expected.len().abs_diff(actual.len())
}

/// Expand bytes into bits, most significant bit first
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * BYTE_SIZE);
    for &byte in bytes {
        for shift in (0..BYTE_SIZE).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Pack bits back into bytes, most significant bit first
pub fn bits_to_bytes(bits: &[u8]) -> Result<Vec<u8>> {
    if bits.len() % BYTE_SIZE != 0 {
        return Err(CodeError::LengthMismatch {
            len: bits.len(),
            block: BYTE_SIZE,
        });
    }
    validate_bits(bits)?;
    Ok(bits
        .chunks_exact(BYTE_SIZE)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit))
        .collect())
}
