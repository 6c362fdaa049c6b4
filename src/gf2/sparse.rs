//! Sparse matrices over GF(2)
//!
//! Parity checks touch few positions compared to the block length, so each
//! row is stored as its sorted list of 1 columns in one flat arena.

use super::matrix::Gf2Matrix;
use super::vector::Gf2Vector;
use crate::error::{CodeError, Result};

/// Row-compressed GF(2) matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseGf2Matrix {
    cols: usize,
    offsets: Vec<usize>,
    positions: Vec<u32>,
}

impl SparseGf2Matrix {
    /// Create an empty matrix with `cols` columns
    pub fn new(cols: usize) -> Self {
        Self {
            cols,
            offsets: vec![0],
            positions: Vec::new(),
        }
    }

    /// Assemble from per-row column lists
    pub fn from_rows(cols: usize, rows: Vec<Vec<usize>>) -> Result<Self> {
        let mut matrix = Self::new(cols);
        for row in rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }

    /// Append a row given by the columns holding a 1
    ///
    /// Columns are sorted and repeated columns cancel in pairs, as they would
    /// when adding the unit vectors over GF(2).
    pub fn push_row(&mut self, mut columns: Vec<usize>) -> Result<()> {
        if let Some(&bad) = columns.iter().find(|&&col| col >= self.cols) {
            return Err(CodeError::DimensionMismatch {
                what: "sparse row column index",
                expected: self.cols,
                found: bad,
            });
        }
        columns.sort_unstable();
        let start = self.positions.len();
        for col in columns {
            if self.positions.len() > start && self.positions.last() == Some(&(col as u32)) {
                self.positions.pop();
            } else {
                self.positions.push(col as u32);
            }
        }
        self.offsets.push(self.positions.len());
        Ok(())
    }

    /// Append a row whose columns are already sorted, distinct and in range
    pub(crate) fn push_sorted_row(&mut self, columns: impl IntoIterator<Item = usize>) {
        self.positions
            .extend(columns.into_iter().map(|col| col as u32));
        self.offsets.push(self.positions.len());
    }

    #[inline]
    pub fn row(&self, index: usize) -> &[u32] {
        &self.positions[self.offsets[index]..self.offsets[index + 1]]
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored 1 entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.positions.len()
    }

    /// Inner product of row `index` with `vector` over GF(2)
    #[inline]
    pub fn row_parity(&self, index: usize, vector: &Gf2Vector) -> u8 {
        self.row(index)
            .iter()
            .fold(0u8, |acc, &col| acc ^ vector.get(col as usize))
    }

    /// Dense copy, mostly for inspection and tests
    pub fn to_dense(&self) -> Result<Gf2Matrix> {
        let rows = (0..self.row_count())
            .map(|index| {
                let row = self.row(index);
                Gf2Vector::from_fn(self.cols, |col| row.binary_search(&(col as u32)).is_ok())
            })
            .collect();
        Gf2Matrix::from_rows(self.cols, rows)
    }
}
