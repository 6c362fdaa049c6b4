//! Configuration for codec sessions

use crate::error::{CodeError, Result};
use log::warn;
use std::fmt;
use std::str::FromStr;

/// Blocks processed between cancellation checks by default
pub const DEFAULT_BATCH_BLOCKS: usize = 1024;

/// Which decoder a codec session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderKind {
    /// Reed's multi-stage majority logic, any order
    #[default]
    MajorityLogic,
    /// Fast Hadamard transform, first-order codes only
    FastHadamard,
}

impl FromStr for DecoderKind {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "majority" | "majority-logic" | "reed" => Ok(DecoderKind::MajorityLogic),
            "hadamard" | "fht" | "fast-hadamard" => Ok(DecoderKind::FastHadamard),
            other => Err(CodeError::invalid(
                "decoder",
                format!("unknown decoder '{other}', expected 'majority' or 'hadamard'"),
            )),
        }
    }
}

impl fmt::Display for DecoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecoderKind::MajorityLogic => f.write_str("majority"),
            DecoderKind::FastHadamard => f.write_str("hadamard"),
        }
    }
}

/// Configuration for encoding and decoding streams
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Number of threads for block processing (0 = auto-detect)
    pub threads: usize,
    /// Whether to spread blocks over a thread pool (false = single-threaded)
    pub parallel: bool,
    /// Blocks per batch; cancellation is checked between batches
    pub batch_blocks: usize,
    pub decoder: DecoderKind,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            threads: 0, // Auto-detect CPU cores
            parallel: true,
            batch_blocks: DEFAULT_BATCH_BLOCKS,
            decoder: DecoderKind::MajorityLogic,
        }
    }
}

impl CodecConfig {
    pub fn new(threads: usize, parallel: bool) -> Self {
        Self {
            threads,
            parallel,
            ..Self::default()
        }
    }

    pub fn sequential() -> Self {
        Self::new(1, false)
    }

    pub fn with_decoder(mut self, decoder: DecoderKind) -> Self {
        self.decoder = decoder;
        self
    }

    /// Zero is clamped to one block per batch
    pub fn with_batch_blocks(mut self, batch_blocks: usize) -> Self {
        self.batch_blocks = batch_blocks.max(1);
        self
    }

    pub fn from_args(matches: &clap::ArgMatches) -> Result<Self> {
        let threads = matches
            .get_one::<String>("threads")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let parallel = !matches.get_flag("no-parallel");

        let decoder = matches
            .get_one::<String>("decoder")
            .map(|s| s.parse::<DecoderKind>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self::new(threads, parallel).with_decoder(decoder))
    }

    /// Get effective thread count (auto-detect if 0)
    pub fn effective_threads(&self) -> usize {
        match (self.parallel, self.threads) {
            (false, _) => 1, // Sequential mode always uses single thread
            (true, 0) => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            (true, n) => n,
        }
    }

    /// Dedicated rayon pool sized by [`effective_threads`](Self::effective_threads)
    ///
    /// `None` in sequential mode, or when the pool cannot be created, in which
    /// case work runs on the caller's thread.
    pub fn thread_pool(&self) -> Option<rayon::ThreadPool> {
        let threads = self.effective_threads();
        if threads <= 1 {
            return None;
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| warn!("Could not build a {threads}-thread pool, running sequentially: {e}"))
            .ok()
    }
}
