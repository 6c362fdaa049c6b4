//! Fast Hadamard transform decoder for first-order codes RM(1, m)
//!
//! The received block is mapped to ±1 values (0 → +1, 1 → −1) and multiplied
//! in turn by the `m` Kronecker factors `H_m^i = I_{2^(m-i)} ⊗ H_2 ⊗ I_{2^(i-1)}`
//! with `H_2 = [[1, 1], [1, -1]]`. Each factor is one butterfly pass. The
//! transform entry with the largest magnitude names the affine function
//! closest to the received block: its index gives the linear coefficients and
//! its sign gives the constant term.

use super::decoder::{BlockTrace, DecodeSummary};
use super::params::CodeOrder;
use crate::bits::validate_bits;
use crate::error::{CodeError, Result};
use log::trace;

/// Decode a stream of RM(1, m) blocks with the fast Hadamard transform
///
/// Output layout matches the majority decoder: the constant coefficient
/// first, then `x_0 .. x_{m-1}`.
pub fn decode_hadamard(received: &[u8], order: CodeOrder) -> Result<Vec<u8>> {
    decode_hadamard_traced(received, order).map(|(message, _)| message)
}

/// [`decode_hadamard`] plus tie statistics
///
/// A tie is counted when several transform entries share the largest
/// magnitude; the smallest index wins.
pub fn decode_hadamard_traced(
    received: &[u8],
    order: CodeOrder,
) -> Result<(Vec<u8>, DecodeSummary)> {
    validate_stream(received, order)?;
    let (k, n) = (order.k(), order.n());
    let mut message = vec![0u8; received.len() / n * k];
    let mut summary = DecodeSummary::default();
    let mut scratch = vec![0i32; n];
    for (block, out) in received.chunks_exact(n).zip(message.chunks_exact_mut(k)) {
        summary.record(hadamard_block_into(block, &mut scratch, out));
    }
    Ok((message, summary))
}

/// Multiply `values` by the `stage`-th Kronecker factor (0-based) in place
///
/// # Panics
///
/// Panics if `values.len()` is not a multiple of `2 << stage`.
pub fn hadamard_stage(values: &mut [i32], stage: usize) {
    let half = 1usize << stage;
    assert!(
        values.len() % (half << 1) == 0,
        "{} values cannot be split into butterflies of width {}",
        values.len(),
        half << 1
    );
    for base in (0..values.len()).step_by(half << 1) {
        for offset in base..base + half {
            let a = values[offset];
            let b = values[offset + half];
            values[offset] = a + b;
            values[offset + half] = a - b;
        }
    }
}

pub(crate) fn hadamard_block_into(block: &[u8], scratch: &mut [i32], out: &mut [u8]) -> BlockTrace {
    let n = block.len();
    let variables = n.trailing_zeros() as usize;
    for (value, &bit) in scratch.iter_mut().zip(block) {
        *value = if bit == 0 { 1 } else { -1 };
    }
    for stage in 0..variables {
        hadamard_stage(scratch, stage);
    }

    let mut best = 0usize;
    let mut ties = 0usize;
    for (index, value) in scratch.iter().enumerate().skip(1) {
        match value.abs().cmp(&scratch[best].abs()) {
            std::cmp::Ordering::Greater => {
                best = index;
                ties = 0;
            }
            std::cmp::Ordering::Equal => ties += 1,
            std::cmp::Ordering::Less => {}
        }
    }
    trace!(
        "hadamard peak {} at index {} ({} equal peaks)",
        scratch[best],
        best,
        ties
    );

    out[0] = u8::from(scratch[best] < 0);
    for (variable, bit) in out[1..].iter_mut().enumerate() {
        *bit = ((best >> variable) & 1) as u8;
    }
    BlockTrace {
        stages: variables,
        ties: usize::from(ties > 0),
    }
}

fn validate_stream(received: &[u8], order: CodeOrder) -> Result<()> {
    if !order.is_first_order() {
        return Err(CodeError::invalid(
            "order",
            format!("Hadamard decoding needs a first-order code, got {order}"),
        ));
    }
    let n = order.n();
    if received.len() % n != 0 {
        return Err(CodeError::LengthMismatch {
            len: received.len(),
            block: n,
        });
    }
    validate_bits(received)
}
