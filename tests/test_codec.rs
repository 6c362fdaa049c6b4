use rand::rngs::StdRng;
use rand::SeedableRng;
use rmcode::codec::PipelineStage;
use rmcode::reporters::{Reporter, SilentSimulationReporter, SimulationReporter};
use rmcode::{
    BinarySymmetricChannel, CancelToken, CodeError, CodeOrder, CodecConfig, DecoderKind,
    ReedMullerCodec, SimulationReport,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

fn message(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 13 + i / 7) % 2) as u8).collect()
}

fn codec(order: CodeOrder, config: CodecConfig) -> ReedMullerCodec {
    ReedMullerCodec::new(order, config).unwrap()
}

#[test]
fn test_padding_symmetry() {
    let codec = codec(CodeOrder::first_order(4).unwrap(), CodecConfig::sequential());
    for len in [0, 1, 4, 5, 6, 23, 100] {
        let bits = message(len);
        let encoded = codec.encode_stream(&bits).unwrap();
        assert_eq!((encoded.message_len + encoded.padding) % codec.k(), 0);
        assert!(encoded.padding < codec.k());
        assert_eq!(encoded.bits.len(), (len + encoded.padding) / codec.k() * codec.n());
        assert_eq!(codec.decode_stream(&encoded.bits, encoded.padding).unwrap(), bits);
    }
}

#[test]
fn test_blocks_encode_independently_at_boundaries() {
    let codec = codec(CodeOrder::first_order(3).unwrap(), CodecConfig::sequential());
    let joint_of = |a: &[u8], b: &[u8]| {
        let joined: Vec<u8> = a.iter().chain(b).copied().collect();
        codec.encode_stream(&joined).unwrap().bits
    };
    let separate_of = |a: &[u8], b: &[u8]| {
        let mut bits = codec.encode_stream(a).unwrap().bits;
        bits.extend(codec.encode_stream(b).unwrap().bits);
        bits
    };

    // Both halves end on a block boundary
    let (a, b) = (message(8), [0u8, 1, 1, 0]);
    assert_eq!(separate_of(&a, &b), joint_of(&a, &b));

    // The first half is padded on its own, which shifts every later block
    let (a, b) = ([1u8, 0, 1, 1, 1], [0u8, 1, 1]);
    let separate = separate_of(&a, &b);
    let joint = joint_of(&a, &b);
    assert_eq!(separate.len(), 24);
    assert_eq!(joint.len(), 16);
    assert_ne!(separate, joint);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let order = CodeOrder::new(2, 5).unwrap();
    let sequential = codec(order, CodecConfig::sequential().with_batch_blocks(7));
    let parallel = codec(order, CodecConfig::new(4, true).with_batch_blocks(7));
    let bits = message(16 * 100 + 3);

    let encoded = sequential.encode_stream(&bits).unwrap();
    assert_eq!(parallel.encode_stream(&bits).unwrap(), encoded);

    let channel = BinarySymmetricChannel::new(0.05).unwrap();
    let received = channel.transmit(&encoded.bits, &mut StdRng::seed_from_u64(8));
    assert_eq!(
        sequential.decode_stream(&received, encoded.padding).unwrap(),
        parallel.decode_stream(&received, encoded.padding).unwrap()
    );
}

#[test]
fn test_decoders_agree_on_clean_stream() {
    let order = CodeOrder::first_order(6).unwrap();
    let majority = codec(order, CodecConfig::sequential());
    let hadamard = codec(
        order,
        CodecConfig::sequential().with_decoder(DecoderKind::FastHadamard),
    );
    let bits = message(7 * 40);
    let encoded = majority.encode_stream(&bits).unwrap();
    assert_eq!(hadamard.decode_stream(&encoded.bits, encoded.padding).unwrap(), bits);
}

#[test]
fn test_decode_stream_validation() {
    let codec = codec(CodeOrder::first_order(3).unwrap(), CodecConfig::sequential());
    assert!(matches!(
        codec.decode_stream(&[0; 9], 0),
        Err(CodeError::LengthMismatch { len: 9, block: 8 })
    ));
    assert!(matches!(
        codec.decode_stream(&[0; 8], 5),
        Err(CodeError::InvalidParameter { name: "padding", .. })
    ));
    assert!(matches!(
        codec.encode_stream(&[0, 1, 2]),
        Err(CodeError::NonBinarySymbol { position: 2, value: 2 })
    ));
}

#[test]
fn test_cancellation_between_batches() {
    let codec = codec(
        CodeOrder::first_order(3).unwrap(),
        CodecConfig::sequential().with_batch_blocks(4),
    );
    let cancel = CancelToken::new();

    /// Cancels once the first batch is reported
    struct CancelAfterFirst(CancelToken);
    impl Reporter for CancelAfterFirst {
        fn report_progress(&self, _message: &str, _progress: f64) {}
        fn report_error(&self, _error: &str) {}
        fn report_complete(&self, _message: &str) {}
    }
    impl SimulationReporter for CancelAfterFirst {
        fn report_code(&self, _order: CodeOrder, _k: usize, _n: usize) {}
        fn report_stage_start(&self, _stage: PipelineStage, _blocks: usize) {}
        fn report_block_progress(&self, _stage: PipelineStage, _completed: usize, _total: usize) {
            self.0.cancel();
        }
        fn report_results(&self, _report: &SimulationReport) {}
    }

    let result = codec.encode_stream_with(&message(40), &CancelAfterFirst(cancel.clone()), &cancel);
    assert_eq!(result, Err(CodeError::Cancelled { completed: 4, total: 10 }));
}

#[test]
fn test_cancelled_before_simulation() {
    let codec = codec(CodeOrder::first_order(3).unwrap(), CodecConfig::sequential());
    let cancel = CancelToken::new();
    cancel.cancel();
    let result = codec.simulate(
        &message(16),
        &BinarySymmetricChannel::new(0.1).unwrap(),
        &mut StdRng::seed_from_u64(0),
        &SilentSimulationReporter,
        &cancel,
    );
    assert!(matches!(result, Err(CodeError::Cancelled { completed: 0, .. })));
}

#[derive(Default)]
struct RecordingReporter {
    stages: Mutex<Vec<PipelineStage>>,
    progress_calls: AtomicUsize,
    results: AtomicUsize,
}

impl Reporter for RecordingReporter {
    fn report_progress(&self, _message: &str, _progress: f64) {}
    fn report_error(&self, _error: &str) {}
    fn report_complete(&self, _message: &str) {}
}

impl SimulationReporter for RecordingReporter {
    fn report_code(&self, _order: CodeOrder, _k: usize, _n: usize) {}
    fn report_stage_start(&self, stage: PipelineStage, _blocks: usize) {
        self.stages.lock().unwrap().push(stage);
    }
    fn report_block_progress(&self, _stage: PipelineStage, _completed: usize, _total: usize) {
        self.progress_calls.fetch_add(1, Ordering::Relaxed);
    }
    fn report_results(&self, _report: &SimulationReport) {
        self.results.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn test_simulation_improves_on_uncoded() {
    let codec = codec(CodeOrder::first_order(5).unwrap(), CodecConfig::default());
    let bits = message(6 * 2000);
    let channel = BinarySymmetricChannel::new(0.05).unwrap();
    let reporter = RecordingReporter::default();
    let report = codec
        .simulate(
            &bits,
            &channel,
            &mut StdRng::seed_from_u64(2024),
            &reporter,
            &CancelToken::new(),
        )
        .unwrap();

    assert_eq!(report.message_len, bits.len());
    assert_eq!(report.codeword_len, 2000 * 32);
    assert!(report.channel_flips > 0);
    assert!(report.uncoded_errors > 0);
    assert!(report.residual_errors < report.uncoded_errors);
    assert_eq!(report.decoded.len(), bits.len());
    assert!(report.to_string().contains("RM(1, 5)"));

    let stages = reporter.stages.lock().unwrap().clone();
    assert_eq!(
        stages,
        vec![PipelineStage::Encode, PipelineStage::Transmit, PipelineStage::Decode]
    );
    assert!(reporter.progress_calls.load(Ordering::Relaxed) >= 2);
    assert_eq!(reporter.results.load(Ordering::Relaxed), 1);
}
