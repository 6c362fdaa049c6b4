//! Reed-Muller Codes Module
//!
//! Binary Reed-Muller codes RM(r, m) with block length `2^m`. Encoding is a
//! generator-matrix product over GF(2). Decoding is Reed's multi-stage
//! majority logic, with a fast Hadamard transform decoder for first-order
//! codes.

pub mod builder;
pub mod decoder;
pub mod encoder;
pub mod hadamard;
pub mod params;

pub use builder::{
    build, CodeMatrices, CoefficientVote, ControlMatrices, DecodingStage, MAX_CONTROL_ENTRIES,
};
pub use decoder::{
    decode, decode_block, decode_blocks, decode_parallel, decode_stage, decode_traced,
    BlockTrace, DecodeSummary, DecodedBlocks, StageOutcome, TIE_BREAK_BIT,
};
pub use encoder::{encode, encode_block, encode_blocks, encode_parallel, EncodedBlocks};
pub use hadamard::{decode_hadamard, decode_hadamard_traced, hadamard_stage};
pub use params::{binomial, monomials, CodeOrder, Monomial, MAX_VARIABLES};
