//! Generator and control matrix construction
//!
//! For RM(r, m) the generator has one row per monomial of degree at most `r`
//! (see [`monomials`] for the row order). Column `x` is the evaluation point
//! whose variable `x_i` is bit `i` of `x`.
//!
//! The control structure is a list of decoding stages, highest degree first.
//! The coefficient of a degree-`d` monomial `S` equals, for every codeword
//! whose residual has degree at most `d`, the sum of the codeword over each
//! coset `{x : x_T = a}` where `T` is the complement of `S`. Those `2^(m-d)`
//! disjoint cosets are the parity checks that vote on the coefficient.

use super::params::{monomials, CodeOrder, Monomial};
use crate::error::{CodeError, Result};
use crate::gf2::{Gf2Matrix, Gf2Vector, SparseGf2Matrix};
use log::debug;
use std::ops::Range;

/// Upper bound on stored control entries (`k * n`), about 64 MiB of indices
pub const MAX_CONTROL_ENTRIES: usize = 1 << 24;

// ============================================================================
// Control Structure
// ============================================================================

/// The parity checks that vote on one message coefficient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoefficientVote {
    coefficient: usize,
    checks: Range<usize>,
    contribution: Gf2Vector,
}

impl CoefficientVote {
    /// `checks` is a row range of the owning stage's control matrix;
    /// `contribution` is the generator row removed from the residual when the
    /// coefficient is decided as 1.
    pub fn new(coefficient: usize, checks: Range<usize>, contribution: Gf2Vector) -> Self {
        Self {
            coefficient,
            checks,
            contribution,
        }
    }

    /// Index of the decided bit within the message block
    #[inline]
    pub fn coefficient(&self) -> usize {
        self.coefficient
    }

    #[inline]
    pub fn checks(&self) -> Range<usize> {
        self.checks.clone()
    }

    #[inline]
    pub fn contribution(&self) -> &Gf2Vector {
        &self.contribution
    }
}

/// One majority-logic stage: a control matrix and the votes drawn from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodingStage {
    index: usize,
    control: SparseGf2Matrix,
    votes: Vec<CoefficientVote>,
}

impl DecodingStage {
    /// `index` tags the stage; Reed-Muller stages use the monomial degree
    pub fn new(index: usize, control: SparseGf2Matrix, votes: Vec<CoefficientVote>) -> Self {
        Self {
            index,
            control,
            votes,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn control(&self) -> &SparseGf2Matrix {
        &self.control
    }

    #[inline]
    pub fn votes(&self) -> &[CoefficientVote] {
        &self.votes
    }
}

/// Ordered decoding stages for one code, validated against `(k, n)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMatrices {
    k: usize,
    n: usize,
    stages: Vec<DecodingStage>,
}

impl ControlMatrices {
    /// Validate and assemble a stage list
    ///
    /// Every coefficient `0..k` must be decided by exactly one vote, every vote
    /// needs at least one check, and every row and contribution is `n` wide.
    pub fn new(k: usize, n: usize, stages: Vec<DecodingStage>) -> Result<Self> {
        if k == 0 || n == 0 || k > n {
            return Err(CodeError::invalid(
                "dimensions",
                format!("need 1 <= k <= n, got k = {k}, n = {n}"),
            ));
        }

        let mut decided = vec![false; k];
        for stage in &stages {
            if stage.control.cols() != n {
                return Err(CodeError::DimensionMismatch {
                    what: "control matrix columns",
                    expected: n,
                    found: stage.control.cols(),
                });
            }
            let rows = stage.control.row_count();
            for vote in &stage.votes {
                if vote.coefficient >= k {
                    return Err(CodeError::DimensionMismatch {
                        what: "coefficient index",
                        expected: k,
                        found: vote.coefficient,
                    });
                }
                if vote.checks.start > vote.checks.end || vote.checks.end > rows {
                    return Err(CodeError::DimensionMismatch {
                        what: "control rows",
                        expected: rows,
                        found: vote.checks.end,
                    });
                }
                if vote.checks.is_empty() {
                    return Err(CodeError::invalid(
                        "checks",
                        format!("coefficient {} has no parity checks", vote.coefficient),
                    ));
                }
                if vote.contribution.len() != n {
                    return Err(CodeError::DimensionMismatch {
                        what: "contribution length",
                        expected: n,
                        found: vote.contribution.len(),
                    });
                }
                if std::mem::replace(&mut decided[vote.coefficient], true) {
                    return Err(CodeError::invalid(
                        "coefficients",
                        format!("coefficient {} is decided twice", vote.coefficient),
                    ));
                }
            }
        }
        if let Some(missing) = decided.iter().position(|&done| !done) {
            return Err(CodeError::invalid(
                "coefficients",
                format!("coefficient {missing} is never decided"),
            ));
        }

        Ok(Self { k, n, stages })
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn stages(&self) -> &[DecodingStage] {
        &self.stages
    }

    /// Total number of parity checks across all stages
    pub fn check_count(&self) -> usize {
        self.stages
            .iter()
            .map(|stage| stage.control.row_count())
            .sum()
    }

    /// Fail with `DimensionMismatch` unless built for `(k, n)`
    pub fn ensure_dimensions(&self, k: usize, n: usize) -> Result<()> {
        if self.k != k {
            return Err(CodeError::DimensionMismatch {
                what: "control message length",
                expected: k,
                found: self.k,
            });
        }
        if self.n != n {
            return Err(CodeError::DimensionMismatch {
                what: "control block length",
                expected: n,
                found: self.n,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Built Code
// ============================================================================

/// Immutable matrices for one code order, shared by encoder and decoder
#[derive(Debug, Clone)]
pub struct CodeMatrices {
    order: CodeOrder,
    generator: Gf2Matrix,
    control: ControlMatrices,
}

impl CodeMatrices {
    #[inline]
    pub fn order(&self) -> CodeOrder {
        self.order
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.control.k()
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.control.n()
    }

    #[inline]
    pub fn generator(&self) -> &Gf2Matrix {
        &self.generator
    }

    #[inline]
    pub fn control(&self) -> &ControlMatrices {
        &self.control
    }
}

/// Build the generator and control matrices for `order`
///
/// Deterministic; the result can be cached and shared across threads.
pub fn build(order: CodeOrder) -> Result<CodeMatrices> {
    let (k, n) = (order.k(), order.n());
    if k.saturating_mul(n) > MAX_CONTROL_ENTRIES {
        return Err(CodeError::invalid(
            "order",
            format!("{order} needs {} control entries, limit is {MAX_CONTROL_ENTRIES}", k * n),
        ));
    }

    let monomials = monomials(order);
    let generator = generator_matrix(order.n(), &monomials)?;
    let control = control_matrices(order, &monomials, &generator)?;

    debug!(
        "Built {}: k={}, n={}, {} stages, {} parity checks",
        order,
        k,
        n,
        control.stages().len(),
        control.check_count()
    );

    Ok(CodeMatrices {
        order,
        generator,
        control,
    })
}

fn generator_matrix(n: usize, monomials: &[Monomial]) -> Result<Gf2Matrix> {
    let rows = monomials
        .iter()
        .map(|monomial| {
            let mask = monomial.mask();
            Gf2Vector::from_fn(n, |point| point & mask == mask)
        })
        .collect();
    Gf2Matrix::from_rows(n, rows)
}

fn control_matrices(
    order: CodeOrder,
    monomials: &[Monomial],
    generator: &Gf2Matrix,
) -> Result<ControlMatrices> {
    let n = order.n();
    let all_points = n - 1;

    let stages = (0..=order.degree())
        .rev()
        .map(|degree| {
            let mut control = SparseGf2Matrix::new(n);
            let mut votes = Vec::new();
            for (coefficient, monomial) in monomials.iter().enumerate() {
                if monomial.degree() != degree {
                    continue;
                }
                let free = monomial.mask();
                let fixed = all_points & !free;
                let first = control.row_count();
                for assignment in submasks(fixed) {
                    control.push_sorted_row(submasks(free).map(|offset| assignment | offset));
                }
                votes.push(CoefficientVote::new(
                    coefficient,
                    first..control.row_count(),
                    generator.row(coefficient).clone(),
                ));
            }
            DecodingStage::new(degree, control, votes)
        })
        .collect();

    ControlMatrices::new(order.k(), n, stages)
}

/// All submasks of `mask` in ascending order, starting with 0
fn submasks(mask: usize) -> impl Iterator<Item = usize> {
    let mut next = Some(0usize);
    std::iter::from_fn(move || {
        let current = next?;
        next = (current != mask).then(|| current.wrapping_sub(mask) & mask);
        Some(current)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submasks_ascending() {
        assert_eq!(submasks(0b101).collect::<Vec<_>>(), vec![0, 1, 4, 5]);
        assert_eq!(submasks(0).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_rm13_generator_rows() {
        let code = build(CodeOrder::first_order(3).unwrap()).unwrap();
        let rows: Vec<String> = code.generator().rows().iter().map(|r| r.to_string()).collect();
        assert_eq!(rows, ["11111111", "01010101", "00110011", "00001111"]);
    }

    #[test]
    fn test_stage_layout() {
        let code = build(CodeOrder::new(2, 4).unwrap()).unwrap();
        let stages = code.control().stages();
        assert_eq!(stages.iter().map(|s| s.index()).collect::<Vec<_>>(), vec![2, 1, 0]);
        // C(4,2) monomials with 2^(4-2) checks each
        assert_eq!(stages[0].votes().len(), 6);
        assert_eq!(stages[0].control().row_count(), 24);
        assert_eq!(stages[2].control().row_count(), 16);
        // every coefficient touches k*n entries in total
        let nnz: usize = stages.iter().map(|s| s.control().nnz()).sum();
        assert_eq!(nnz, code.k() * code.n());
    }

    #[test]
    fn test_checks_sum_to_coefficient() {
        let code = build(CodeOrder::new(2, 4).unwrap()).unwrap();
        let stage = &code.control().stages()[0];
        // x0x1 alone: every check of its vote is odd, others stay even
        let x0x1 = code.generator().row(5).clone();
        for vote in stage.votes() {
            for row in vote.checks() {
                let expected = u8::from(vote.coefficient() == 5);
                assert_eq!(stage.control().row_parity(row, &x0x1), expected);
            }
        }
    }

    #[test]
    fn test_control_validation() {
        let control = SparseGf2Matrix::from_rows(2, vec![vec![0], vec![1]]).unwrap();
        let vote = CoefficientVote::new(0, 0..2, Gf2Vector::ones(2));
        let stage = DecodingStage::new(0, control, vec![vote.clone()]);
        assert!(ControlMatrices::new(1, 2, vec![stage.clone()]).is_ok());

        // second coefficient never decided
        assert!(ControlMatrices::new(2, 2, vec![stage.clone()]).is_err());
        // wrong width
        assert!(matches!(
            ControlMatrices::new(1, 3, vec![stage]),
            Err(CodeError::DimensionMismatch { .. })
        ));
        // vote past the end of the control rows
        let short = SparseGf2Matrix::from_rows(2, vec![vec![0]]).unwrap();
        let stage = DecodingStage::new(0, short, vec![vote]);
        assert!(ControlMatrices::new(1, 2, vec![stage]).is_err());
    }

    #[test]
    fn test_size_limit() {
        assert!(build(CodeOrder::new(8, 16).unwrap()).is_err());
        assert!(build(CodeOrder::first_order(16).unwrap()).is_ok());
    }
}
