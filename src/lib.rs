//! Reed-Muller block coding with majority-logic decoding
//!
//! Messages are bit streams (one 0/1 value per `u8`). They are cut into
//! `k`-bit blocks, encoded into `n = 2^m`-bit codewords, corrupted by a
//! simulated binary symmetric channel and decoded again by Reed's multi-stage
//! majority logic.

pub mod args;
pub mod bits;
pub mod channel;
pub mod codec;
pub mod config;
pub mod error;
pub mod gf2;
pub mod reed_muller;
pub mod reporters;

pub use args::parse_args;
pub use channel::{transmit, BinarySymmetricChannel, ErrorProbability};
pub use codec::{CancelToken, EncodedStream, PipelineStage, ReedMullerCodec, SimulationReport};
pub use config::{CodecConfig, DecoderKind};
pub use error::{CodeError, Result};
pub use reed_muller::{build, decode, encode, CodeMatrices, CodeOrder, ControlMatrices};
