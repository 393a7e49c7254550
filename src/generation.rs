//! Generation-transaction assembly and the two-part job serialization.
//!
//! [`GenerationBuilder`] turns one accepted [`BlockTemplate`] plus pool
//! configuration into an immutable [`GenerationTransaction`]. The
//! transaction's signature script is held as two halves around the
//! extra-nonce hole, and the two job products
//! [`coinb1`](GenerationTransaction::coinb1) /
//! [`coinb2`](GenerationTransaction::coinb2) frame that hole in the full
//! serialized byte stream:
//!
//! ```text
//! coinb1 || extra-nonce || coinb2
//! ```
//!
//! The job-distribution layer sends both halves to every connected miner
//! once per job; each miner inserts its own extra-nonce bytes, so nothing
//! is re-serialized per miner. For block submission the completed stream
//! can be reassembled and decoded via
//! [`assemble`](GenerationTransaction::assemble).

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use bitcoin::absolute::LockTime;
use bitcoin::consensus::Decodable;
use bitcoin::transaction::Version;
use bitcoin::{Sequence, Transaction, TxOut};

use crate::allocator::RewardAllocator;
use crate::encoding;
use crate::error::{ConfigurationError, GenerationError};
use crate::script::{self, ScriptParts};
use crate::template::BlockTemplate;

/// Hole width reserved when the builder is not told otherwise.
pub const DEFAULT_EXTRA_NONCE_SIZE: usize = 8;

/// Serialized bytes of coinb1 ahead of the script: version, input count,
/// previous-output sentinel (hash and index).
const COINB1_FIXED_PREFIX: usize = 4 + 1 + 32 + 4;

/// An immutable generation (coinbase) transaction with a split signature
/// script.
///
/// Built once per block template; read-only afterwards, so a single
/// instance can be shared across any number of concurrent miner sessions.
/// A newer template replaces the whole object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTransaction {
    version: Version,
    script: ScriptParts,
    sequence: Sequence,
    outputs: Vec<TxOut>,
    lock_time: LockTime,
    comment: Option<Vec<u8>>,
}

impl GenerationTransaction {
    /// Transaction version: 2 when transaction comments are supported,
    /// otherwise 1.
    pub fn version(&self) -> Version {
        self.version
    }

    /// The two signature-script halves and the hole between them.
    pub fn script(&self) -> &ScriptParts {
        &self.script
    }

    /// Input sequence number (always 0).
    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// Reward outputs, exactly as the allocator returned them.
    pub fn outputs(&self) -> &[TxOut] {
        &self.outputs
    }

    /// Lock time (always 0).
    pub fn lock_time(&self) -> LockTime {
        self.lock_time
    }

    /// The transaction comment, on chains that carry one.
    pub fn comment(&self) -> Option<&[u8]> {
        self.comment.as_deref()
    }

    /// Width of the extra-nonce hole in bytes.
    pub fn extra_nonce_size(&self) -> usize {
        self.script.extra_nonce_size()
    }

    /// Offset of the extra-nonce hole from the start of the serialized
    /// transaction. Equal to the length of [`coinb1`](Self::coinb1).
    pub fn extra_nonce_offset(&self) -> usize {
        COINB1_FIXED_PREFIX
            + encoding::varint_size(self.script.script_len() as u64)
            + self.script.part1().len()
    }

    /// First half of the serialized transaction.
    ///
    /// Layout: version, input count (1), the all-zero previous-output hash,
    /// the `0xFFFFFFFF` previous-output index, the total script-length
    /// prefix, and script part 1. The extra-nonce hole begins where these
    /// bytes end.
    pub fn coinb1(&self) -> Vec<u8> {
        let script_len = self.script.script_len() as u64;
        let mut buf = Vec::with_capacity(self.extra_nonce_offset());
        buf.extend_from_slice(&encoding::encode_u32_le(self.version.0 as u32));
        buf.extend_from_slice(&encoding::encode_varint(1));
        buf.extend_from_slice(&[0u8; 32]);
        buf.extend_from_slice(&encoding::encode_u32_le(u32::MAX));
        buf.extend_from_slice(&encoding::encode_varint(script_len));
        buf.extend_from_slice(self.script.part1());
        buf
    }

    /// Second half of the serialized transaction.
    ///
    /// Layout: script part 2, the input sequence number, the output count,
    /// each output as value plus length-prefixed locking script, and the
    /// lock time. On chains with transaction comments the length-prefixed
    /// comment payload follows the lock time.
    pub fn coinb2(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(self.script.part2());
        buf.extend_from_slice(&encoding::encode_u32_le(self.sequence.to_consensus_u32()));
        buf.extend_from_slice(&encoding::encode_varint(self.outputs.len() as u64));
        for output in &self.outputs {
            buf.extend_from_slice(&encoding::encode_u64_le(output.value.to_sat()));
            let script_pubkey = output.script_pubkey.as_bytes();
            buf.extend_from_slice(&encoding::encode_varint(script_pubkey.len() as u64));
            buf.extend_from_slice(script_pubkey);
        }
        buf.extend_from_slice(&encoding::encode_u32_le(self.lock_time.to_consensus_u32()));
        if let Some(comment) = &self.comment {
            buf.extend_from_slice(&encoding::encode_varint(comment.len() as u64));
            buf.extend_from_slice(comment);
        }
        buf
    }

    /// Reassemble the raw transaction bytes with a concrete extra nonce.
    ///
    /// This is the submission path, not the per-miner job path: the
    /// job-distribution layer performs the same concatenation itself when
    /// hashing candidate blocks.
    ///
    /// # Errors
    ///
    /// [`GenerationError::ExtraNonceSizeMismatch`] when `extra_nonce` does
    /// not fill the hole exactly.
    pub fn assemble_raw(&self, extra_nonce: &[u8]) -> Result<Vec<u8>, GenerationError> {
        if extra_nonce.len() != self.extra_nonce_size() {
            return Err(GenerationError::ExtraNonceSizeMismatch {
                expected: self.extra_nonce_size(),
                got: extra_nonce.len(),
            });
        }

        let coinb1 = self.coinb1();
        let coinb2 = self.coinb2();

        let mut raw = Vec::with_capacity(coinb1.len() + extra_nonce.len() + coinb2.len());
        raw.extend_from_slice(&coinb1);
        raw.extend_from_slice(extra_nonce);
        raw.extend_from_slice(&coinb2);
        Ok(raw)
    }

    /// Reassemble with a concrete extra nonce and decode the result back
    /// into a [`Transaction`] for block submission.
    pub fn assemble(&self, extra_nonce: &[u8]) -> Result<Transaction, GenerationError> {
        let raw = self.assemble_raw(extra_nonce)?;
        let mut cursor = &raw[..];
        Transaction::consensus_decode(&mut cursor).map_err(|_| {
            GenerationError::InvalidStructure {
                reason: "failed to decode reassembled generation transaction",
            }
        })
    }
}

/// Builder for generation transactions, one per block template.
///
/// Defaults:
/// - Extra-nonce hole: 8 bytes
/// - Transaction comments: disabled (version 1)
/// - Pool tag: empty
/// - Timestamp: wall clock at build time
///
/// # Examples
///
/// ```
/// use gentx::{BlockTemplate, GenerationBuilder, PayToScript};
/// use bitcoin::hashes::Hash;
/// use bitcoin::{Amount, BlockHash, ScriptBuf};
///
/// let template = BlockTemplate::new(
///     840_000,
///     Amount::from_sat(312_500_000),
///     BlockHash::all_zeros(),
/// );
///
/// let job = GenerationBuilder::new(template)
///     .pool_tag("/gentx/")
///     .extra_nonce_size(8)
///     .build(&PayToScript::new(ScriptBuf::new_op_return(&[])))
///     .unwrap();
///
/// // Each miner inserts its own extra nonce between the two halves.
/// let tx = job.assemble(&[0u8; 8]).unwrap();
/// assert!(tx.is_coinbase());
/// ```
#[derive(Debug, Clone)]
pub struct GenerationBuilder {
    template: BlockTemplate,
    pool_tag: String,
    extra_nonce_size: usize,
    transaction_comments: bool,
    comment: Option<Vec<u8>>,
    timestamp: Option<u64>,
}

impl GenerationBuilder {
    /// Create a builder for the given accepted template.
    pub fn new(template: BlockTemplate) -> Self {
        Self {
            template,
            pool_tag: String::new(),
            extra_nonce_size: DEFAULT_EXTRA_NONCE_SIZE,
            transaction_comments: false,
            comment: None,
            timestamp: None,
        }
    }

    /// Set the pool-identifying tag placed after the extra-nonce hole.
    pub fn pool_tag(mut self, tag: &str) -> Self {
        self.pool_tag = tag.into();
        self
    }

    /// Set the extra-nonce hole width in bytes.
    ///
    /// The stratum layer picks this so that its per-connection counter plus
    /// the miner-rolled counter fill the hole exactly.
    ///
    /// Default: 8 bytes.
    pub fn extra_nonce_size(mut self, size: usize) -> Self {
        self.extra_nonce_size = size;
        self
    }

    /// Enable or disable transaction comments.
    ///
    /// Chains that support comment payloads use transaction version 2;
    /// all others stay on version 1.
    pub fn transaction_comments(mut self, enabled: bool) -> Self {
        self.transaction_comments = enabled;
        self
    }

    /// Set the comment payload carried after the lock time.
    ///
    /// Requires transaction comments to be enabled; the build fails rather
    /// than dropping the payload silently.
    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = Some(comment.to_vec());
        self
    }

    /// Pin the script timestamp instead of reading the wall clock.
    ///
    /// Whole seconds since the unix epoch. Mandatory on `no_std` builds,
    /// where no wall clock is available.
    pub fn timestamp(mut self, unix_time: u64) -> Self {
        self.timestamp = Some(unix_time);
        self
    }

    /// Build the transaction, drawing reward outputs from `allocator`.
    ///
    /// The allocator is invoked exactly once and its outputs are stored
    /// verbatim. Construction is a single linear pass; there is no retry
    /// or partial-build state.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when the script budget is violated, a
    /// primitive fails to encode, no timestamp is available, or the
    /// allocator fails.
    pub fn build<A: RewardAllocator>(
        &self,
        allocator: &A,
    ) -> Result<GenerationTransaction, GenerationError> {
        let version = if self.transaction_comments {
            Version::TWO
        } else {
            Version::ONE
        };

        if self.comment.is_some() && !self.transaction_comments {
            return Err(ConfigurationError::CommentUnsupported.into());
        }

        let unix_time = match self.timestamp {
            Some(t) => t,
            None => unix_time_now()?,
        };

        let script = script::build_script_parts(
            self.template.height(),
            self.template.aux_flags(),
            unix_time,
            self.extra_nonce_size,
            &self.pool_tag,
        )?;

        let outputs = allocator
            .allocate(&self.template)
            .map_err(|e| GenerationError::Allocation(format!("{e:?}")))?;

        Ok(GenerationTransaction {
            version,
            script,
            sequence: Sequence::ZERO,
            outputs,
            lock_time: LockTime::ZERO,
            comment: self.comment.clone(),
        })
    }
}

#[cfg(feature = "std")]
fn unix_time_now() -> Result<u64, GenerationError> {
    use std::time::{SystemTime, UNIX_EPOCH};
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the unix epoch");
    Ok(elapsed.as_secs())
}

#[cfg(not(feature = "std"))]
fn unix_time_now() -> Result<u64, GenerationError> {
    Err(crate::error::ConfigurationError::TimestampRequired.into())
}
