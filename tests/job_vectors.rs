//! Integration tests for generation-transaction job construction.
//!
//! These exercise the full path a pool takes: template in, `coinb1` /
//! `coinb2` out, miner extra-nonce inserted, and the completed byte stream
//! decoded back for block submission.

use bitcoin::consensus::deserialize;
use bitcoin::hashes::Hash;
use bitcoin::transaction::Version;
use bitcoin::{Amount, BlockHash, ScriptBuf, Sequence, Transaction, TxOut};

use gentx::{
    encoding, validation, BlockTemplate, GenerationBuilder, GenerationError, PayToScript,
    RewardAllocator,
};

/// Height of the golden-vector block.
const GOLDEN_HEIGHT: u32 = 277_316;

/// Pinned build timestamp for the golden vector.
const GOLDEN_TIME: u64 = 1_386_694_227;

fn golden_template() -> BlockTemplate {
    BlockTemplate::new(
        GOLDEN_HEIGHT,
        Amount::from_sat(2_509_094_928),
        BlockHash::all_zeros(),
    )
}

fn payout_script() -> ScriptBuf {
    ScriptBuf::from_bytes(vec![
        0x76, 0xa9, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x88, 0xac,
    ])
}

fn golden_job() -> gentx::GenerationTransaction {
    GenerationBuilder::new(golden_template())
        .pool_tag("pool-test")
        .extra_nonce_size(8)
        .timestamp(GOLDEN_TIME)
        .build(&PayToScript::new(payout_script()))
        .unwrap()
}

// ============================================================
// Golden vector
// ============================================================

#[test]
fn golden_coinb1_decodes_to_expected_header() {
    let job = golden_job();
    let decoded = validation::decode_coinb1(&job.coinb1()).unwrap();

    assert_eq!(decoded.version, 1);
    assert_eq!(decoded.input_count, 1);
    assert_eq!(
        decoded.script_len,
        job.script().part1().len() + 8 + job.script().part2().len()
    );
    assert_eq!(decoded.script_prefix, job.script().part1());
}

#[test]
fn golden_part1_starts_with_height_push() {
    let job = golden_job();
    // 277316 = 0x043B44, minimal push: 03 44 3b 04
    assert_eq!(&job.script().part1()[..4], &[0x03, 0x44, 0x3b, 0x04]);
}

#[test]
fn golden_part2_is_tagged() {
    let job = golden_job();
    let mut expected = vec![9u8];
    expected.extend_from_slice(b"pool-test");
    assert_eq!(job.script().part2(), &expected[..]);
}

#[test]
fn golden_height_round_trips_through_script() {
    let job = golden_job();
    let (height, _) = encoding::decode_script_number(job.script().part1()).unwrap();
    assert_eq!(height, GOLDEN_HEIGHT as u64);
}

// ============================================================
// Full-transaction round trip
// ============================================================

#[test]
fn round_trip_parses_as_one_input_transaction() {
    let job = golden_job();

    let mut raw = job.coinb1();
    raw.extend_from_slice(&[0u8; 8]);
    raw.extend_from_slice(&job.coinb2());

    let tx: Transaction = deserialize(&raw).unwrap();
    assert_eq!(tx.input.len(), 1);
    assert!(tx.input[0].previous_output.is_null());
    assert_eq!(tx.input[0].sequence, Sequence::ZERO);
    assert_eq!(tx.version, Version::ONE);
    assert_eq!(tx.lock_time.to_consensus_u32(), 0);

    // Outputs match what the allocator supplied
    assert_eq!(tx.output.len(), 1);
    assert_eq!(tx.output[0].value, Amount::from_sat(2_509_094_928));
    assert_eq!(tx.output[0].script_pubkey, payout_script());

    assert!(validation::validate_generation_structure(&tx).is_ok());
}

#[test]
fn round_trip_script_carries_all_three_sections() {
    let job = golden_job();
    let nonce = [0x5a; 8];
    let tx = job.assemble(&nonce).unwrap();

    let script = tx.input[0].script_sig.as_bytes();
    let parts = job.script();
    assert_eq!(script.len(), parts.script_len());
    assert_eq!(&script[..parts.part1().len()], parts.part1());
    assert_eq!(
        &script[parts.extra_nonce_offset()..parts.extra_nonce_offset() + 8],
        &nonce
    );
    assert_eq!(&script[script.len() - parts.part2().len()..], parts.part2());
}

#[test]
fn round_trip_with_multiple_outputs() {
    struct TwoWay;
    impl RewardAllocator for TwoWay {
        type Error = core::convert::Infallible;
        fn allocate(&self, template: &BlockTemplate) -> Result<Vec<TxOut>, Self::Error> {
            let total = template.coinbase_value().to_sat();
            Ok(vec![
                TxOut {
                    value: Amount::from_sat(total / 2),
                    script_pubkey: payout_script(),
                },
                TxOut {
                    value: Amount::from_sat(total - total / 2),
                    script_pubkey: ScriptBuf::new_op_return(&[]),
                },
            ])
        }
    }

    let job = GenerationBuilder::new(golden_template())
        .pool_tag("pool-test")
        .timestamp(GOLDEN_TIME)
        .build(&TwoWay)
        .unwrap();

    let tx = job.assemble(&[0u8; 8]).unwrap();
    assert_eq!(tx.output.len(), 2);
    assert_eq!(tx.output, job.outputs());
}

// ============================================================
// Version and sentinel invariants
// ============================================================

#[test]
fn version_follows_transaction_comment_support() {
    let without = GenerationBuilder::new(golden_template())
        .timestamp(GOLDEN_TIME)
        .build(&PayToScript::new(payout_script()))
        .unwrap();
    assert_eq!(without.version(), Version::ONE);

    let with = GenerationBuilder::new(golden_template())
        .timestamp(GOLDEN_TIME)
        .transaction_comments(true)
        .build(&PayToScript::new(payout_script()))
        .unwrap();
    assert_eq!(with.version(), Version::TWO);
}

#[test]
fn sentinel_is_independent_of_template_contents() {
    for (height, hash_byte) in [(1u32, 0x11u8), (840_000, 0x22), (GOLDEN_HEIGHT, 0x33)] {
        let template = BlockTemplate::new(
            height,
            Amount::from_sat(1),
            BlockHash::from_byte_array([hash_byte; 32]),
        );
        let job = GenerationBuilder::new(template)
            .timestamp(GOLDEN_TIME)
            .build(&PayToScript::new(payout_script()))
            .unwrap();

        let tx = job.assemble(&[0u8; 8]).unwrap();
        assert!(tx.input[0].previous_output.is_null());
        assert_eq!(tx.input[0].previous_output.vout, u32::MAX);
        assert_eq!(tx.input[0].sequence, Sequence::ZERO);
    }
}

// ============================================================
// Determinism
// ============================================================

#[test]
fn identical_inputs_produce_identical_jobs() {
    let a = golden_job();
    let b = golden_job();
    assert_eq!(a.coinb1(), b.coinb1());
    assert_eq!(a.coinb2(), b.coinb2());
}

#[test]
fn wall_clock_timestamp_is_non_decreasing() {
    let builder = GenerationBuilder::new(golden_template()).pool_tag("pool-test");
    let allocator = PayToScript::new(payout_script());

    let first = builder.clone().build(&allocator).unwrap();
    let second = builder.build(&allocator).unwrap();

    let time_of = |job: &gentx::GenerationTransaction| {
        let part1 = job.script().part1();
        let (_, height_used) = encoding::decode_script_number(part1).unwrap();
        let (time, _) = encoding::decode_script_number(&part1[height_used..]).unwrap();
        time
    };

    assert!(time_of(&second) >= time_of(&first));
}

// ============================================================
// Budget enforcement
// ============================================================

#[test]
fn every_admissible_hole_width_builds() {
    let probe = golden_job();
    let available = 100 - probe.script().part1().len() - probe.script().part2().len();

    for hole in 2..=available {
        let job = GenerationBuilder::new(golden_template())
            .pool_tag("pool-test")
            .extra_nonce_size(hole)
            .timestamp(GOLDEN_TIME)
            .build(&PayToScript::new(payout_script()))
            .unwrap();
        assert!(job.script().script_len() <= 100);

        // The declared script length always covers the hole exactly
        let decoded = validation::decode_coinb1(&job.coinb1()).unwrap();
        assert_eq!(
            decoded.script_len,
            decoded.script_prefix.len() + hole + job.script().part2().len()
        );
    }
}

#[test]
fn out_of_budget_hole_widths_fail() {
    let probe = golden_job();
    let available = 100 - probe.script().part1().len() - probe.script().part2().len();

    for hole in [0, 1, available + 1, 200] {
        let result = GenerationBuilder::new(golden_template())
            .pool_tag("pool-test")
            .extra_nonce_size(hole)
            .timestamp(GOLDEN_TIME)
            .build(&PayToScript::new(payout_script()));
        assert!(
            matches!(result, Err(GenerationError::Configuration(_))),
            "hole width {} should not build",
            hole
        );
    }
}

// ============================================================
// Submission-path errors
// ============================================================

#[test]
fn wrong_size_extra_nonce_is_rejected() {
    let job = golden_job();
    assert!(matches!(
        job.assemble_raw(&[0u8; 4]),
        Err(GenerationError::ExtraNonceSizeMismatch {
            expected: 8,
            got: 4
        })
    ));
    assert!(matches!(
        job.assemble_raw(&[0u8; 9]),
        Err(GenerationError::ExtraNonceSizeMismatch {
            expected: 8,
            got: 9
        })
    ));
}

#[test]
fn aux_flagged_template_round_trips() {
    let template = golden_template().with_aux_flags_hex("fabe6d6d").unwrap();
    let job = GenerationBuilder::new(template)
        .pool_tag("pool-test")
        .timestamp(GOLDEN_TIME)
        .build(&PayToScript::new(payout_script()))
        .unwrap();

    let tx = job.assemble(&[0u8; 8]).unwrap();
    assert!(validation::validate_generation_structure(&tx).is_ok());

    // Aux flags sit between the height and time pushes
    let script = tx.input[0].script_sig.as_bytes();
    assert_eq!(&script[4..8], &[0xfa, 0xbe, 0x6d, 0x6d]);
}
