//! Binary symmetric channel simulator
//!
//! Every bit passes through the channel independently and is inverted with
//! probability `pe`. The random source is always supplied by the caller so
//! that seeded generators reproduce the same corruption; [`transmit`] is the
//! convenience entry point that draws from the thread-local generator.

use crate::error::{CodeError, Result};
use rand::Rng;
use std::fmt;

/// Bit error probability, guaranteed to lie in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct ErrorProbability(f64);

impl ErrorProbability {
    /// A perfect channel
    pub const ZERO: ErrorProbability = ErrorProbability(0.0);

    pub fn new(pe: f64) -> Result<Self> {
        if pe.is_nan() || !(0.0..=1.0).contains(&pe) {
            return Err(CodeError::invalid(
                "pe",
                format!("{pe} is not a probability in [0, 1]"),
            ));
        }
        Ok(Self(pe))
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ErrorProbability {
    type Error = CodeError;

    fn try_from(pe: f64) -> Result<Self> {
        Self::new(pe)
    }
}

impl fmt::Display for ErrorProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Memoryless channel flipping each bit with a fixed probability
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BinarySymmetricChannel {
    pe: ErrorProbability,
}

impl BinarySymmetricChannel {
    pub fn new(pe: f64) -> Result<Self> {
        ErrorProbability::new(pe).map(Self::with_probability)
    }

    pub fn with_probability(pe: ErrorProbability) -> Self {
        Self { pe }
    }

    #[inline]
    pub fn error_probability(&self) -> ErrorProbability {
        self.pe
    }

    /// Copy `bits` through the channel
    ///
    /// Input symbols are not validated: a flip toggles the low bit, so 0/1
    /// streams stay binary.
    pub fn transmit<R: Rng + ?Sized>(&self, bits: &[u8], rng: &mut R) -> Vec<u8> {
        let mut received = bits.to_vec();
        self.transmit_in_place(&mut received, rng);
        received
    }

    /// Corrupt `bits` in place, returning how many were flipped
    pub fn transmit_in_place<R: Rng + ?Sized>(&self, bits: &mut [u8], rng: &mut R) -> usize {
        let pe = self.pe.value();
        if pe == 0.0 {
            return 0;
        }
        if pe == 1.0 {
            bits.iter_mut().for_each(|bit| *bit ^= 1);
            return bits.len();
        }
        let mut flips = 0;
        for bit in bits.iter_mut() {
            if rng.random_bool(pe) {
                *bit ^= 1;
                flips += 1;
            }
        }
        flips
    }

    /// [`transmit`](Self::transmit) plus the number of flipped bits
    pub fn transmit_counting<R: Rng + ?Sized>(&self, bits: &[u8], rng: &mut R) -> (Vec<u8>, usize) {
        let mut received = bits.to_vec();
        let flips = self.transmit_in_place(&mut received, rng);
        (received, flips)
    }
}

/// Send `bits` through a BSC with probability `pe` using the thread-local RNG
pub fn transmit(bits: &[u8], pe: f64) -> Result<Vec<u8>> {
    let channel = BinarySymmetricChannel::new(pe)?;
    Ok(channel.transmit(bits, &mut rand::rng()))
}
