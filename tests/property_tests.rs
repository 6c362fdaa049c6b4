//! Property-based tests for Reed-Muller coding
//!
//! Random code orders with up to six variables and random message streams,
//! checking the algebraic guarantees of the code.

use proptest::prelude::*;
use rmcode::reed_muller::{build, decode, decode_hadamard, encode, CodeOrder};
use rmcode::{CodecConfig, ReedMullerCodec};

/// An order RM(r, m) with m <= 6 and a whole number of message blocks
fn order_and_message() -> impl Strategy<Value = (CodeOrder, Vec<u8>)> {
    (1usize..=6)
        .prop_flat_map(|m| (Just(m), 0..=m))
        .prop_flat_map(|(m, r)| {
            let order = CodeOrder::new(r, m).unwrap();
            let k = order.k();
            (
                Just(order),
                (1usize..=4).prop_flat_map(move |blocks| {
                    proptest::collection::vec(0u8..=1, blocks * k)
                }),
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: a clean channel always round-trips
    #[test]
    fn prop_round_trip_without_noise((order, message) in order_and_message()) {
        let code = build(order).unwrap();
        let codeword = encode(&message, code.k(), code.n(), code.generator()).unwrap();
        prop_assert_eq!(codeword.len(), message.len() / code.k() * code.n());
        let decoded = decode(&codeword, code.control(), code.k(), code.n()).unwrap();
        prop_assert_eq!(decoded, message);
    }

    /// Property: encoding is linear over GF(2)
    #[test]
    fn prop_encoding_is_linear(
        (order, a) in order_and_message(),
        seed in any::<u64>(),
    ) {
        let code = build(order).unwrap();
        let b: Vec<u8> = (0..a.len())
            .map(|i| (seed.rotate_left(i as u32 % 64) & 1) as u8)
            .collect();
        let sum: Vec<u8> = a.iter().zip(&b).map(|(x, y)| x ^ y).collect();

        let (k, n) = (code.k(), code.n());
        let ca = encode(&a, k, n, code.generator()).unwrap();
        let cb = encode(&b, k, n, code.generator()).unwrap();
        let csum = encode(&sum, k, n, code.generator()).unwrap();
        let xored: Vec<u8> = ca.iter().zip(&cb).map(|(x, y)| x ^ y).collect();
        prop_assert_eq!(csum, xored);
    }

    /// Property: up to (2^(m-r) - 1) / 2 errors per block are corrected
    #[test]
    fn prop_corrects_within_radius(
        (order, message) in order_and_message(),
        positions in proptest::collection::vec(any::<usize>(), 0..16),
    ) {
        let code = build(order).unwrap();
        let (k, n) = (code.k(), code.n());
        let mut received = encode(&message, k, n, code.generator()).unwrap();

        let mut offsets: Vec<usize> = positions.iter().map(|p| p % n).collect();
        offsets.sort_unstable();
        offsets.dedup();
        offsets.truncate(order.correctable_errors());
        for block in 0..received.len() / n {
            for &offset in &offsets {
                received[block * n + offset] ^= 1;
            }
        }

        prop_assert_eq!(decode(&received, code.control(), k, n).unwrap(), message);
    }

    /// Property: both decoders agree inside the correction radius
    #[test]
    fn prop_hadamard_matches_majority(
        m in 1usize..=7,
        blocks in proptest::collection::vec(any::<u64>(), 1..4),
        error in any::<usize>(),
    ) {
        let order = CodeOrder::first_order(m).unwrap();
        let code = build(order).unwrap();
        let (k, n) = (code.k(), code.n());
        let message: Vec<u8> = blocks
            .iter()
            .flat_map(|word| (0..k).map(move |i| ((word >> i) & 1) as u8))
            .collect();
        let mut received = encode(&message, k, n, code.generator()).unwrap();
        if order.correctable_errors() > 0 {
            let len = received.len();
            received[error % len] ^= 1;
        }

        let majority = decode(&received, code.control(), k, n).unwrap();
        prop_assert_eq!(&decode_hadamard(&received, order).unwrap(), &majority);
        prop_assert_eq!(majority, message);
    }

    /// Property: padding is removed exactly, whatever the stream length
    #[test]
    fn prop_padding_symmetry(
        m in 1usize..=5,
        message in proptest::collection::vec(0u8..=1, 0..200),
    ) {
        let codec = ReedMullerCodec::new(
            CodeOrder::first_order(m).unwrap(),
            CodecConfig::sequential(),
        )
        .unwrap();
        let encoded = codec.encode_stream(&message).unwrap();
        prop_assert!(encoded.padding < codec.k());
        prop_assert_eq!(codec.decode_stream(&encoded.bits, encoded.padding).unwrap(), message);
    }
}
