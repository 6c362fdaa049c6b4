//! Codec sessions: padded stream encoding, decoding and channel simulation
//!
//! A [`ReedMullerCodec`] builds the matrices for one code order once and then
//! processes whole streams. Streams are cut into batches of blocks; between
//! batches the session reports progress and checks its [`CancelToken`], so a
//! long run can be abandoned without ever leaving a half-processed block
//! behind. Within a batch blocks are independent and may run on a rayon pool.

use crate::bits::{count_bit_errors, pad, strip_padding, validate_bits};
use crate::channel::BinarySymmetricChannel;
use crate::config::{CodecConfig, DecoderKind};
use crate::error::{CodeError, Result};
use crate::reed_muller::{self, BlockTrace, CodeMatrices, CodeOrder, DecodeSummary};
use crate::reporters::{SilentSimulationReporter, SimulationReporter};
use log::debug;
use rand::Rng;
use rayon::prelude::*;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

// ============================================================================
// Cancellation
// ============================================================================

/// Shared flag that stops a running session between batches
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Pipeline step named in progress reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Encode,
    Transmit,
    Decode,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Encode => f.write_str("Encoding"),
            PipelineStage::Transmit => f.write_str("Transmitting"),
            PipelineStage::Decode => f.write_str("Decoding"),
        }
    }
}

/// Codeword stream plus what is needed to undo the padding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStream {
    pub bits: Vec<u8>,
    /// Zero bits appended to the message before encoding
    pub padding: usize,
    /// Message length before padding
    pub message_len: usize,
}

/// Outcome of one encode, transmit, decode run
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub order: CodeOrder,
    pub error_probability: f64,
    pub message_len: usize,
    pub padding: usize,
    pub codeword_len: usize,
    /// Bits the channel flipped in the codeword stream
    pub channel_flips: usize,
    /// Message bits still wrong after decoding
    pub residual_errors: usize,
    /// Message bits wrong when sent through the same channel without coding
    pub uncoded_errors: usize,
    pub decode_summary: DecodeSummary,
    pub encode_time: Duration,
    pub decode_time: Duration,
    /// Decoded message, padding removed
    pub decoded: Vec<u8>,
    /// The raw message after its own trip through the channel
    pub uncoded: Vec<u8>,
}

impl SimulationReport {
    pub fn coded_bit_error_rate(&self) -> f64 {
        ratio(self.residual_errors, self.message_len)
    }

    pub fn uncoded_bit_error_rate(&self) -> f64 {
        ratio(self.uncoded_errors, self.message_len)
    }

    /// Observed flip rate over the codeword stream
    pub fn channel_error_rate(&self) -> f64 {
        ratio(self.channel_flips, self.codeword_len)
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Code {} over BSC(pe = {})", self.order, self.error_probability)?;
        writeln!(
            f,
            "  Message bits: {} (+{} padding), codeword bits: {}",
            self.message_len, self.padding, self.codeword_len
        )?;
        writeln!(
            f,
            "  Channel flips: {} ({:.4}%)",
            self.channel_flips,
            self.channel_error_rate() * 100.0
        )?;
        writeln!(
            f,
            "  Residual errors after decoding: {} ({:.4}%)",
            self.residual_errors,
            self.coded_bit_error_rate() * 100.0
        )?;
        writeln!(
            f,
            "  Errors without coding: {} ({:.4}%)",
            self.uncoded_errors,
            self.uncoded_bit_error_rate() * 100.0
        )?;
        if self.decode_summary.ties > 0 {
            writeln!(
                f,
                "  Tied votes: {} in {} blocks",
                self.decode_summary.ties, self.decode_summary.blocks_with_ties
            )?;
        }
        writeln!(
            f,
            "  Encode time: {:.3?}, decode time: {:.3?}",
            self.encode_time, self.decode_time
        )
    }
}

// ============================================================================
// Codec Session
// ============================================================================

/// Encoder and decoder for one Reed-Muller code
pub struct ReedMullerCodec {
    code: CodeMatrices,
    config: CodecConfig,
    pool: Option<rayon::ThreadPool>,
}

impl ReedMullerCodec {
    /// Build the code matrices and the session's thread pool
    pub fn new(order: CodeOrder, config: CodecConfig) -> Result<Self> {
        if config.decoder == DecoderKind::FastHadamard && !order.is_first_order() {
            return Err(CodeError::invalid(
                "decoder",
                format!("the Hadamard decoder only handles first-order codes, got {order}"),
            ));
        }
        let code = reed_muller::build(order)?;
        let pool = config.thread_pool();
        debug!(
            "Codec session for {}: decoder {}, {} threads, {} blocks per batch",
            order,
            config.decoder,
            config.effective_threads(),
            config.batch_blocks
        );
        Ok(Self { code, config, pool })
    }

    #[inline]
    pub fn order(&self) -> CodeOrder {
        self.code.order()
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.code.k()
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.code.n()
    }

    #[inline]
    pub fn code(&self) -> &CodeMatrices {
        &self.code
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Pad `message` to whole blocks and encode it
    pub fn encode_stream(&self, message: &[u8]) -> Result<EncodedStream> {
        self.encode_stream_with(message, &SilentSimulationReporter, &CancelToken::new())
    }

    pub fn encode_stream_with<P: SimulationReporter + ?Sized>(
        &self,
        message: &[u8],
        reporter: &P,
        cancel: &CancelToken,
    ) -> Result<EncodedStream> {
        validate_bits(message)?;
        let (padded, padding) = pad(message, self.k());
        let generator = self.code.generator();
        let (bits, _) = self.process_batches(
            &padded,
            self.k(),
            self.n(),
            PipelineStage::Encode,
            reporter,
            cancel,
            |block, _, out| {
                reed_muller::encoder::encode_block_into(block, generator, out);
                BlockTrace::default()
            },
        )?;
        Ok(EncodedStream {
            bits,
            padding,
            message_len: message.len(),
        })
    }

    /// Decode a received stream and drop `padding` trailing message bits
    pub fn decode_stream(&self, received: &[u8], padding: usize) -> Result<Vec<u8>> {
        self.decode_stream_with(received, padding, &SilentSimulationReporter, &CancelToken::new())
            .map(|(message, _)| message)
    }

    pub fn decode_stream_with<P: SimulationReporter + ?Sized>(
        &self,
        received: &[u8],
        padding: usize,
        reporter: &P,
        cancel: &CancelToken,
    ) -> Result<(Vec<u8>, DecodeSummary)> {
        let control = self.code.control();
        reed_muller::decoder::validate_stream(received, control, self.k(), self.n())?;
        let decoded_len = received.len() / self.n() * self.k();
        if padding > decoded_len {
            return Err(CodeError::invalid(
                "padding",
                format!("{padding} exceeds decoded length {decoded_len}"),
            ));
        }

        let (message, summary) = match self.config.decoder {
            DecoderKind::MajorityLogic => self.process_batches(
                received,
                self.n(),
                self.k(),
                PipelineStage::Decode,
                reporter,
                cancel,
                |block, _, out| reed_muller::decoder::decode_block_into(block, control, out),
            )?,
            DecoderKind::FastHadamard => self.process_batches(
                received,
                self.n(),
                self.k(),
                PipelineStage::Decode,
                reporter,
                cancel,
                reed_muller::hadamard::hadamard_block_into,
            )?,
        };
        Ok((strip_padding(message, padding)?, summary))
    }

    /// Encode, send through `channel`, decode, and compare with the uncoded
    /// transmission of the same message over the same channel
    pub fn simulate<R, P>(
        &self,
        message: &[u8],
        channel: &BinarySymmetricChannel,
        rng: &mut R,
        reporter: &P,
        cancel: &CancelToken,
    ) -> Result<SimulationReport>
    where
        R: Rng + ?Sized,
        P: SimulationReporter + ?Sized,
    {
        reporter.report_code(self.order(), self.k(), self.n());

        let start = Instant::now();
        let encoded = self.encode_stream_with(message, reporter, cancel)?;
        let encode_time = start.elapsed();
        debug!(
            "Encoded {} message bits into {} codeword bits in {:?}",
            message.len(),
            encoded.bits.len(),
            encode_time
        );

        reporter.report_stage_start(PipelineStage::Transmit, encoded.bits.len() / self.n());
        let (received, channel_flips) = channel.transmit_counting(&encoded.bits, rng);

        let start = Instant::now();
        let (decoded, decode_summary) =
            self.decode_stream_with(&received, encoded.padding, reporter, cancel)?;
        let decode_time = start.elapsed();
        debug!(
            "Decoded {} blocks in {:?} ({} tied votes)",
            decode_summary.blocks, decode_time, decode_summary.ties
        );

        let uncoded = channel.transmit(message, rng);

        let report = SimulationReport {
            order: self.order(),
            error_probability: channel.error_probability().value(),
            message_len: message.len(),
            padding: encoded.padding,
            codeword_len: encoded.bits.len(),
            channel_flips,
            residual_errors: count_bit_errors(message, &decoded),
            uncoded_errors: count_bit_errors(message, &uncoded),
            decode_summary,
            encode_time,
            decode_time,
            decoded,
            uncoded,
        };
        reporter.report_results(&report);
        Ok(report)
    }

    /// Map every `in_block`-sized block of `input` to an `out_block`-sized
    /// block of the output, batch by batch
    ///
    /// `transform` gets a scratch buffer it may reuse across blocks.
    #[allow(clippy::too_many_arguments)]
    fn process_batches<P, F>(
        &self,
        input: &[u8],
        in_block: usize,
        out_block: usize,
        stage: PipelineStage,
        reporter: &P,
        cancel: &CancelToken,
        transform: F,
    ) -> Result<(Vec<u8>, DecodeSummary)>
    where
        P: SimulationReporter + ?Sized,
        F: Fn(&[u8], &mut [i32], &mut [u8]) -> BlockTrace + Sync,
    {
        let total = input.len() / in_block;
        let batch = self.config.batch_blocks.max(1);
        let scratch_len = self.n();
        let mut output = vec![0u8; total * out_block];
        let mut summary = DecodeSummary::default();
        reporter.report_stage_start(stage, total);

        for (index, (inputs, outputs)) in input
            .chunks(batch * in_block)
            .zip(output.chunks_mut(batch * out_block))
            .enumerate()
        {
            let completed = index * batch;
            if cancel.is_cancelled() {
                debug!("{stage} cancelled after {completed} of {total} blocks");
                return Err(CodeError::Cancelled { completed, total });
            }

            let batch_summary = match &self.pool {
                Some(pool) => pool.install(|| {
                    inputs
                        .par_chunks_exact(in_block)
                        .zip(outputs.par_chunks_exact_mut(out_block))
                        .map_init(
                            || vec![0i32; scratch_len],
                            |scratch, (block, out)| transform(block, scratch.as_mut_slice(), out),
                        )
                        .fold(DecodeSummary::default, |mut acc, trace| {
                            acc.record(trace);
                            acc
                        })
                        .reduce(DecodeSummary::default, DecodeSummary::merge)
                }),
                None => {
                    let mut scratch = vec![0i32; scratch_len];
                    let mut acc = DecodeSummary::default();
                    for (block, out) in inputs
                        .chunks_exact(in_block)
                        .zip(outputs.chunks_exact_mut(out_block))
                    {
                        acc.record(transform(block, &mut scratch[..], out));
                    }
                    acc
                }
            };
            summary = summary.merge(batch_summary);
            reporter.report_block_progress(stage, summary.blocks, total);
        }
        Ok((output, summary))
    }
}
