//! Block encoder: `codeword = message · G (mod 2)`

use crate::bits::validate_bits;
use crate::error::{CodeError, Result};
use crate::gf2::Gf2Matrix;
use rayon::prelude::*;
use std::slice::ChunksExact;

/// Encode a stream whose length is a multiple of `k`
///
/// Blocks are encoded independently and concatenated in stream order, giving
/// `(len / k) * n` output bits. All validation happens before any output.
pub fn encode(message: &[u8], k: usize, n: usize, generator: &Gf2Matrix) -> Result<Vec<u8>> {
    validate_stream(message, k, n, generator)?;
    let mut codeword = vec![0u8; message.len() / k * n];
    for (block, out) in message.chunks_exact(k).zip(codeword.chunks_exact_mut(n)) {
        encode_block_into(block, generator, out);
    }
    Ok(codeword)
}

/// Same output as [`encode`], with blocks spread over the rayon pool
pub fn encode_parallel(
    message: &[u8],
    k: usize,
    n: usize,
    generator: &Gf2Matrix,
) -> Result<Vec<u8>> {
    validate_stream(message, k, n, generator)?;
    let mut codeword = vec![0u8; message.len() / k * n];
    message
        .par_chunks_exact(k)
        .zip(codeword.par_chunks_exact_mut(n))
        .for_each(|(block, out)| encode_block_into(block, generator, out));
    Ok(codeword)
}

/// Encode exactly one `k`-bit block
pub fn encode_block(block: &[u8], generator: &Gf2Matrix) -> Result<Vec<u8>> {
    if block.len() != generator.row_count() {
        return Err(CodeError::LengthMismatch {
            len: block.len(),
            block: generator.row_count(),
        });
    }
    validate_bits(block)?;
    Ok(generator.vector_mul(block).to_bits())
}

/// Lazily encode a stream block by block
///
/// The stream is validated up front; the returned iterator then yields one
/// codeword per message block and can be cloned to restart from any point.
pub fn encode_blocks<'a>(
    message: &'a [u8],
    k: usize,
    n: usize,
    generator: &'a Gf2Matrix,
) -> Result<EncodedBlocks<'a>> {
    validate_stream(message, k, n, generator)?;
    Ok(EncodedBlocks {
        blocks: message.chunks_exact(k),
        generator,
    })
}

/// Iterator returned by [`encode_blocks`]
#[derive(Clone)]
pub struct EncodedBlocks<'a> {
    blocks: ChunksExact<'a, u8>,
    generator: &'a Gf2Matrix,
}

impl Iterator for EncodedBlocks<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        self.blocks
            .next()
            .map(|block| self.generator.vector_mul(block).to_bits())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.blocks.size_hint()
    }
}

impl ExactSizeIterator for EncodedBlocks<'_> {}

#[inline]
pub(crate) fn encode_block_into(block: &[u8], generator: &Gf2Matrix, out: &mut [u8]) {
    generator.vector_mul(block).write_bits(out);
}

pub(crate) fn validate_stream(
    message: &[u8],
    k: usize,
    n: usize,
    generator: &Gf2Matrix,
) -> Result<()> {
    if k == 0 || n == 0 {
        return Err(CodeError::invalid(
            "dimensions",
            format!("block lengths must be positive, got k = {k}, n = {n}"),
        ));
    }
    generator.ensure_shape("generator matrix", k, n)?;
    if message.len() % k != 0 {
        return Err(CodeError::LengthMismatch {
            len: message.len(),
            block: k,
        });
    }
    validate_bits(message)
}
