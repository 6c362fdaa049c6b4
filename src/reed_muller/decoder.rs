//! Majority-logic (Reed) decoder
//!
//! Each block is decoded by walking the control stages in order. A stage
//! evaluates its parity checks against the current residual, decides each of
//! its coefficients by strict majority, and then removes the decided
//! contributions from the residual so the next stage sees only lower-degree
//! structure. Blocks never fail to decode: a block corrupted beyond the
//! code's radius simply yields the best majority decision.

use super::builder::{ControlMatrices, DecodingStage};
use crate::bits::validate_bits;
use crate::error::{CodeError, Result};
use crate::gf2::Gf2Vector;
use log::trace;
use rayon::prelude::*;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::slice::ChunksExact;

/// Decision taken when exactly half of a coefficient's checks are odd
pub const TIE_BREAK_BIT: u8 = 0;

/// What one stage decided for one block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageOutcome {
    /// Coefficients decided by the stage
    pub votes: usize,
    /// Votes that split evenly and fell back to [`TIE_BREAK_BIT`]
    pub ties: usize,
}

/// Per-block decoding statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockTrace {
    pub stages: usize,
    pub ties: usize,
}

/// Stream-level decoding statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    pub blocks: usize,
    pub ties: usize,
    pub blocks_with_ties: usize,
}

impl DecodeSummary {
    pub fn record(&mut self, trace: BlockTrace) {
        self.blocks += 1;
        self.ties += trace.ties;
        if trace.ties > 0 {
            self.blocks_with_ties += 1;
        }
    }

    pub fn merge(mut self, other: DecodeSummary) -> DecodeSummary {
        self.blocks += other.blocks;
        self.ties += other.ties;
        self.blocks_with_ties += other.blocks_with_ties;
        self
    }
}

/// Decode a stream whose length is a multiple of `n`
///
/// Output is `(len / n) * k` bits. Fails only on malformed input, never on
/// uncorrectable blocks.
pub fn decode(received: &[u8], control: &ControlMatrices, k: usize, n: usize) -> Result<Vec<u8>> {
    decode_traced(received, control, k, n).map(|(message, _)| message)
}

/// [`decode`] plus tie statistics
pub fn decode_traced(
    received: &[u8],
    control: &ControlMatrices,
    k: usize,
    n: usize,
) -> Result<(Vec<u8>, DecodeSummary)> {
    validate_stream(received, control, k, n)?;
    let mut message = vec![0u8; received.len() / n * k];
    let mut summary = DecodeSummary::default();
    for (block, out) in received.chunks_exact(n).zip(message.chunks_exact_mut(k)) {
        summary.record(decode_block_into(block, control, out));
    }
    Ok((message, summary))
}

/// Same output as [`decode`], with blocks spread over the rayon pool
pub fn decode_parallel(
    received: &[u8],
    control: &ControlMatrices,
    k: usize,
    n: usize,
) -> Result<Vec<u8>> {
    validate_stream(received, control, k, n)?;
    let mut message = vec![0u8; received.len() / n * k];
    received
        .par_chunks_exact(n)
        .zip(message.par_chunks_exact_mut(k))
        .for_each(|(block, out)| {
            decode_block_into(block, control, out);
        });
    Ok(message)
}

/// Decode exactly one `n`-bit block
pub fn decode_block(block: &[u8], control: &ControlMatrices) -> Result<(Vec<u8>, BlockTrace)> {
    if block.len() != control.n() {
        return Err(CodeError::LengthMismatch {
            len: block.len(),
            block: control.n(),
        });
    }
    validate_bits(block)?;
    let mut message = vec![0u8; control.k()];
    let trace = decode_block_into(block, control, &mut message);
    Ok((message, trace))
}

/// Run one stage against `residual`
///
/// Decided coefficients are written into `message` at their coefficient
/// index, then the contributions of those decided as 1 are subtracted from
/// `residual`. Checks are all evaluated before the residual changes.
pub fn decode_stage(
    stage: &DecodingStage,
    residual: &mut Gf2Vector,
    message: &mut [u8],
) -> StageOutcome {
    let control = stage.control();
    let mut outcome = StageOutcome::default();
    let mut decided_ones: SmallVec<[usize; 16]> = SmallVec::new();

    for (vote_index, vote) in stage.votes().iter().enumerate() {
        let checks = vote.checks();
        let total = checks.len();
        let odd = checks
            .filter(|&row| control.row_parity(row, residual) == 1)
            .count();
        let bit = match (2 * odd).cmp(&total) {
            Ordering::Greater => 1,
            Ordering::Less => 0,
            Ordering::Equal => {
                outcome.ties += 1;
                TIE_BREAK_BIT
            }
        };
        trace!(
            "stage {} coefficient {}: {}/{} odd checks -> {}",
            stage.index(),
            vote.coefficient(),
            odd,
            total,
            bit
        );
        message[vote.coefficient()] = bit;
        if bit == 1 {
            decided_ones.push(vote_index);
        }
        outcome.votes += 1;
    }

    for vote_index in decided_ones {
        residual.xor_assign(stage.votes()[vote_index].contribution());
    }
    outcome
}

/// Lazily decode a stream block by block
pub fn decode_blocks<'a>(
    received: &'a [u8],
    control: &'a ControlMatrices,
    k: usize,
    n: usize,
) -> Result<DecodedBlocks<'a>> {
    validate_stream(received, control, k, n)?;
    Ok(DecodedBlocks {
        blocks: received.chunks_exact(n),
        control,
    })
}

/// Iterator returned by [`decode_blocks`]
#[derive(Clone)]
pub struct DecodedBlocks<'a> {
    blocks: ChunksExact<'a, u8>,
    control: &'a ControlMatrices,
}

impl Iterator for DecodedBlocks<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        let block = self.blocks.next()?;
        let mut message = vec![0u8; self.control.k()];
        decode_block_into(block, self.control, &mut message);
        Some(message)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.blocks.size_hint()
    }
}

impl ExactSizeIterator for DecodedBlocks<'_> {}

pub(crate) fn decode_block_into(
    block: &[u8],
    control: &ControlMatrices,
    out: &mut [u8],
) -> BlockTrace {
    let mut residual = Gf2Vector::from_bits_unchecked(block);
    let mut trace = BlockTrace::default();
    for stage in control.stages() {
        let outcome = decode_stage(stage, &mut residual, out);
        trace.stages += 1;
        trace.ties += outcome.ties;
    }
    trace
}

pub(crate) fn validate_stream(
    received: &[u8],
    control: &ControlMatrices,
    k: usize,
    n: usize,
) -> Result<()> {
    control.ensure_dimensions(k, n)?;
    if received.len() % n != 0 {
        return Err(CodeError::LengthMismatch {
            len: received.len(),
            block: n,
        });
    }
    validate_bits(received)
}
