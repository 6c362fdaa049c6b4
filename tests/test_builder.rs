use rmcode::reed_muller::{build, monomials, CodeOrder, MAX_CONTROL_ENTRIES, MAX_VARIABLES};
use rmcode::CodeError;

#[test]
fn test_generator_dimensions() {
    for variables in 1..=6 {
        for degree in 0..=variables {
            let order = CodeOrder::new(degree, variables).unwrap();
            let code = build(order).unwrap();
            assert_eq!(code.generator().shape(), (order.k(), order.n()));
            assert_eq!(code.control().k(), order.k());
            assert_eq!(code.control().n(), order.n());
        }
    }
}

#[test]
fn test_generator_rows_are_monomial_evaluations() {
    let order = CodeOrder::new(2, 3).unwrap();
    let code = build(order).unwrap();
    for (row, monomial) in code.generator().rows().iter().zip(monomials(order)) {
        for point in 0..order.n() {
            assert_eq!(row.get(point), u8::from(monomial.evaluate(point)), "{monomial} at {point}");
        }
        assert_eq!(row.count_ones(), order.n() >> monomial.degree());
    }
}

#[test]
fn test_stages_ordered_by_degree() {
    let code = build(CodeOrder::new(3, 5).unwrap()).unwrap();
    let degrees: Vec<usize> = code.control().stages().iter().map(|s| s.index()).collect();
    assert_eq!(degrees, vec![3, 2, 1, 0]);
    for stage in code.control().stages() {
        for vote in stage.votes() {
            // 2^(m - d) disjoint checks of 2^d points each
            assert_eq!(vote.checks().len(), 1 << (5 - stage.index()));
            for row in vote.checks() {
                assert_eq!(stage.control().row(row).len(), 1 << stage.index());
            }
        }
    }
}

#[test]
fn test_full_order_is_identity_like() {
    // RM(m, m) has k = n: every point is its own codeword bit
    let code = build(CodeOrder::new(3, 3).unwrap()).unwrap();
    assert_eq!((code.k(), code.n()), (8, 8));
    assert_eq!(code.order().min_distance(), 1);
}

#[test]
fn test_order_limits() {
    assert!(matches!(
        CodeOrder::new(1, MAX_VARIABLES + 1),
        Err(CodeError::InvalidParameter { name: "variables", .. })
    ));
    let too_big = CodeOrder::new(MAX_VARIABLES / 2, MAX_VARIABLES).unwrap();
    assert!(too_big.k() * too_big.n() > MAX_CONTROL_ENTRIES);
    assert!(matches!(build(too_big), Err(CodeError::InvalidParameter { .. })));
}

#[test]
fn test_raw_integer_order() {
    assert!(CodeOrder::try_from(-3i64).is_err());
    let order = CodeOrder::try_from(3i64).unwrap();
    assert_eq!((order.k(), order.n()), (4, 8));
}
