//! Row-major matrices over GF(2)

use super::vector::Gf2Vector;
use crate::error::{CodeError, Result};
use std::fmt;

/// Matrix over GF(2) stored as packed rows of equal length
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Gf2Matrix {
    cols: usize,
    rows: Vec<Gf2Vector>,
}

impl Gf2Matrix {
    /// Create an empty matrix with `cols` columns and no rows
    pub fn new(cols: usize) -> Self {
        Self {
            cols,
            rows: Vec::new(),
        }
    }

    /// Assemble a matrix from packed rows, all of which must have `cols` bits
    pub fn from_rows(cols: usize, rows: Vec<Gf2Vector>) -> Result<Self> {
        if let Some(bad) = rows.iter().find(|row| row.len() != cols) {
            return Err(CodeError::DimensionMismatch {
                what: "matrix row length",
                expected: cols,
                found: bad.len(),
            });
        }
        Ok(Self { cols, rows })
    }

    /// Assemble a matrix from 0/1 rows; the first row fixes the column count
    pub fn from_bit_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        let packed = rows
            .iter()
            .map(|row| Gf2Vector::from_bits(row.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(cols, packed)
    }

    /// Append one row
    pub fn push_row(&mut self, row: Gf2Vector) -> Result<()> {
        if row.len() != self.cols {
            return Err(CodeError::DimensionMismatch {
                what: "matrix row length",
                expected: self.cols,
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    #[inline]
    pub fn row(&self, index: usize) -> &Gf2Vector {
        &self.rows[index]
    }

    #[inline]
    pub fn rows(&self) -> &[Gf2Vector] {
        &self.rows
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols)
    }

    /// Fail with `DimensionMismatch` unless the matrix is `rows × cols`
    pub fn ensure_shape(&self, what: &'static str, rows: usize, cols: usize) -> Result<()> {
        if self.rows.len() != rows {
            return Err(CodeError::DimensionMismatch {
                what,
                expected: rows,
                found: self.rows.len(),
            });
        }
        if self.cols != cols {
            return Err(CodeError::DimensionMismatch {
                what,
                expected: cols,
                found: self.cols,
            });
        }
        Ok(())
    }

    /// Row vector times matrix: XOR of the rows selected by the 1 bits of `vector`
    ///
    /// `vector` must hold exactly one 0/1 entry per row.
    pub fn vector_mul(&self, vector: &[u8]) -> Gf2Vector {
        debug_assert_eq!(vector.len(), self.rows.len());
        let mut product = Gf2Vector::zeros(self.cols);
        for (row, &bit) in self.rows.iter().zip(vector) {
            if bit == 1 {
                product.xor_assign(row);
            }
        }
        product
    }
}

impl fmt::Debug for Gf2Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Gf2Matrix {}x{} [", self.rows.len(), self.cols)?;
        for row in &self.rows {
            writeln!(f, "  {row}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_mul_is_row_xor() {
        let matrix = Gf2Matrix::from_bit_rows(&[[1u8, 1, 0, 0], [0, 1, 1, 0], [0, 0, 1, 1]]).unwrap();
        assert_eq!(matrix.shape(), (3, 4));
        assert_eq!(matrix.vector_mul(&[1, 0, 1]).to_bits(), vec![1, 1, 1, 1]);
        assert_eq!(matrix.vector_mul(&[1, 1, 1]).to_bits(), vec![1, 0, 0, 1]);
        assert_eq!(matrix.vector_mul(&[0, 0, 0]).count_ones(), 0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows: Vec<Vec<u8>> = vec![vec![1, 0, 1], vec![1, 0]];
        let err = Gf2Matrix::from_bit_rows(&rows).unwrap_err();
        assert!(matches!(err, CodeError::DimensionMismatch { expected: 3, found: 2, .. }));
    }

    #[test]
    fn test_ensure_shape() {
        let matrix = Gf2Matrix::from_bit_rows(&[[1u8, 0], [0, 1]]).unwrap();
        assert!(matrix.ensure_shape("identity", 2, 2).is_ok());
        assert!(matrix.ensure_shape("identity", 3, 2).is_err());
        assert!(matrix.ensure_shape("identity", 2, 3).is_err());
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut matrix = Gf2Matrix::new(3);
        assert!(matrix.push_row(Gf2Vector::ones(3)).is_ok());
        assert!(matrix.push_row(Gf2Vector::ones(4)).is_err());
        assert_eq!(matrix.row_count(), 1);
    }
}
