//! Linear algebra over GF(2)
//!
//! Bits are packed into `u64` words. Addition is XOR, multiplication is AND,
//! so a matrix-vector product is an XOR fold of the rows selected by the
//! vector and an inner product is the parity of a masked popcount. No
//! floating point or general numeric matrix type is involved.

pub mod matrix;
pub mod sparse;
pub mod vector;

pub use matrix::Gf2Matrix;
pub use sparse::SparseGf2Matrix;
pub use vector::Gf2Vector;
