//! Code parameters for the Reed-Muller family RM(r, m)

use crate::error::{CodeError, Result};
use smallvec::SmallVec;
use std::fmt;

/// Largest supported number of variables (codeword length 2^16)
pub const MAX_VARIABLES: usize = 16;

/// Reed-Muller code order: RM(degree, variables)
///
/// Block length `n = 2^m`, message length `k = sum_{i<=r} C(m, i)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeOrder {
    degree: usize,
    variables: usize,
}

impl CodeOrder {
    /// RM(r, m); fails when `r > m` or `m` exceeds [`MAX_VARIABLES`]
    pub fn new(degree: usize, variables: usize) -> Result<Self> {
        if variables > MAX_VARIABLES {
            return Err(CodeError::invalid(
                "variables",
                format!("m = {variables} exceeds the maximum of {MAX_VARIABLES}"),
            ));
        }
        if degree > variables {
            return Err(CodeError::invalid(
                "degree",
                format!("r = {degree} exceeds m = {variables}"),
            ));
        }
        Ok(Self { degree, variables })
    }

    /// RM(1, m), the family selected by a single integer order parameter
    ///
    /// `m = 0` has no first-degree monomial and collapses to RM(0, 0).
    pub fn first_order(variables: usize) -> Result<Self> {
        Self::new(variables.min(1), variables)
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    #[inline]
    pub fn variables(&self) -> usize {
        self.variables
    }

    /// Message block length
    pub fn k(&self) -> usize {
        (0..=self.degree)
            .map(|d| binomial(self.variables, d))
            .sum()
    }

    /// Codeword block length
    #[inline]
    pub fn n(&self) -> usize {
        1 << self.variables
    }

    /// Minimum Hamming distance `2^(m - r)`
    #[inline]
    pub fn min_distance(&self) -> usize {
        1 << (self.variables - self.degree)
    }

    /// Error weight that majority decoding always corrects
    #[inline]
    pub fn correctable_errors(&self) -> usize {
        (self.min_distance() - 1) / 2
    }

    #[inline]
    pub fn is_first_order(&self) -> bool {
        self.degree == 1
    }
}

impl TryFrom<i64> for CodeOrder {
    type Error = CodeError;

    /// Interpret a raw integer order parameter as `m` of RM(1, m)
    fn try_from(raw: i64) -> Result<Self> {
        let variables = usize::try_from(raw).map_err(|_| {
            CodeError::invalid("order", format!("{raw} is negative"))
        })?;
        Self::first_order(variables)
    }
}

impl fmt::Display for CodeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RM({}, {})", self.degree, self.variables)
    }
}

/// Product of distinct variables `x_{i1} x_{i2} ...`; the empty product is 1
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Monomial {
    variables: SmallVec<[usize; 4]>,
}

impl Monomial {
    pub fn new(variables: &[usize]) -> Self {
        let mut variables: SmallVec<[usize; 4]> = SmallVec::from_slice(variables);
        variables.sort_unstable();
        variables.dedup();
        Self { variables }
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn variables(&self) -> &[usize] {
        &self.variables
    }

    /// Bit mask of the variables, as a point index mask
    pub fn mask(&self) -> usize {
        self.variables.iter().fold(0, |mask, &var| mask | (1 << var))
    }

    /// Value at evaluation point `x`, where variable `i` is bit `i` of `x`
    #[inline]
    pub fn evaluate(&self, point: usize) -> bool {
        let mask = self.mask();
        point & mask == mask
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variables.is_empty() {
            return f.write_str("1");
        }
        for var in &self.variables {
            write!(f, "x{var}")?;
        }
        Ok(())
    }
}

/// Monomials of RM(r, m) in generator row order
///
/// Degree 0 first, then each degree in lexicographic order of variable sets.
pub fn monomials(order: CodeOrder) -> Vec<Monomial> {
    let mut out = Vec::with_capacity(order.k());
    for degree in 0..=order.degree() {
        for_each_combination(order.variables(), degree, |combo| out.push(Monomial::new(combo)));
    }
    out
}

/// Binomial coefficient C(n, k)
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

fn for_each_combination(n: usize, k: usize, mut visit: impl FnMut(&[usize])) {
    if k > n {
        return;
    }
    let mut combo: Vec<usize> = (0..k).collect();
    loop {
        visit(&combo);
        // Advance the rightmost index that still has room
        let Some(pos) = (0..k).rev().find(|&i| combo[i] < n - k + i) else {
            return;
        };
        combo[pos] += 1;
        for i in pos + 1..k {
            combo[i] = combo[i - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let rm13 = CodeOrder::first_order(3).unwrap();
        assert_eq!((rm13.k(), rm13.n()), (4, 8));
        assert_eq!(rm13.min_distance(), 4);
        assert_eq!(rm13.correctable_errors(), 1);

        let rm24 = CodeOrder::new(2, 4).unwrap();
        assert_eq!((rm24.k(), rm24.n()), (11, 16));

        let rm00 = CodeOrder::first_order(0).unwrap();
        assert_eq!((rm00.k(), rm00.n()), (1, 1));
    }

    #[test]
    fn test_invalid_orders() {
        assert!(CodeOrder::new(3, 2).is_err());
        assert!(CodeOrder::new(1, MAX_VARIABLES + 1).is_err());
        assert!(CodeOrder::try_from(-1i64).is_err());
        assert_eq!(CodeOrder::try_from(4i64).unwrap(), CodeOrder::new(1, 4).unwrap());
    }

    #[test]
    fn test_monomial_order() {
        let names: Vec<String> = monomials(CodeOrder::new(2, 3).unwrap())
            .iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(names, ["1", "x0", "x1", "x2", "x0x1", "x0x2", "x1x2"]);
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(16, 8), 12870);
        assert_eq!(binomial(3, 4), 0);
        assert_eq!(binomial(0, 0), 1);
    }
}
