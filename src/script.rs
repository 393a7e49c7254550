//! Coinbase signature-script construction.
//!
//! The signature script of a generation transaction is logically one script
//! but is materialized as two immutable halves framing an extra-nonce hole:
//!
//! ```text
//! [height push][aux flags][time push]  [extra-nonce hole]  [pool tag]
//! `------------ part 1 -------------'                      `- part 2 -'
//! ```
//!
//! Both halves are shared unchanged across every miner session working the
//! same job; only the hole contents differ per miner. The insertion contract
//! is: offset = end of part 1, length = the hole width fixed at build time.
//! The total (part1 + hole + part2) must stay within the consensus bound of
//! 2 to 100 bytes.

use alloc::vec::Vec;

use crate::encoding;
use crate::error::{ConfigurationError, GenerationError, ValidationError};

/// Maximum coinbase signature-script size in bytes (consensus rule).
pub const MAX_COINBASE_SCRIPT_SIZE: usize = 100;

/// Minimum coinbase signature-script size in bytes (consensus rule).
pub const MIN_COINBASE_SCRIPT_SIZE: usize = 2;

/// Smallest extra-nonce hole a job may reserve.
pub const MIN_EXTRA_NONCE_SIZE: usize = 2;

/// The two immutable halves of a coinbase signature script.
///
/// The extra-nonce hole between them is never materialized here; the
/// job-distribution layer tells each miner the hole width and the miner
/// supplies the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptParts {
    part1: Vec<u8>,
    part2: Vec<u8>,
    extra_nonce_size: usize,
}

impl ScriptParts {
    /// Bytes before the hole: height push, aux flags, time push.
    pub fn part1(&self) -> &[u8] {
        &self.part1
    }

    /// Bytes after the hole: the length-prefixed pool tag.
    pub fn part2(&self) -> &[u8] {
        &self.part2
    }

    /// Width of the extra-nonce hole in bytes.
    pub fn extra_nonce_size(&self) -> usize {
        self.extra_nonce_size
    }

    /// Offset of the hole from the start of the signature script.
    pub fn extra_nonce_offset(&self) -> usize {
        self.part1.len()
    }

    /// Total script length: part 1 + hole + part 2.
    pub fn script_len(&self) -> usize {
        self.part1.len() + self.extra_nonce_size + self.part2.len()
    }
}

/// Assemble the two signature-script halves for a job.
///
/// Part 1 carries the minimally encoded block height (the first script
/// item), the template's aux flags verbatim, and the current unix time in
/// whole seconds; part 2 carries the pool tag as a length-prefixed string.
///
/// # Errors
///
/// [`ValidationError::ScriptTooLong`] when the fixed parts leave no room
/// for even the minimum hole within the 100-byte budget;
/// [`ConfigurationError::ExtraNonceOutOfRange`] when the requested hole
/// width falls outside what the remaining budget admits.
pub fn build_script_parts(
    height: u32,
    aux_flags: &[u8],
    unix_time: u64,
    extra_nonce_size: usize,
    pool_tag: &str,
) -> Result<ScriptParts, GenerationError> {
    let height_push = encoding::encode_script_number(height as u64)?;
    let time_push = encoding::encode_script_number(unix_time)?;

    let mut part1 = Vec::with_capacity(height_push.len() + aux_flags.len() + time_push.len());
    part1.extend_from_slice(&height_push);
    part1.extend_from_slice(aux_flags);
    part1.extend_from_slice(&time_push);

    let part2 = encoding::encode_var_string(pool_tag);

    let fixed = part1.len() + part2.len();
    if fixed + MIN_EXTRA_NONCE_SIZE > MAX_COINBASE_SCRIPT_SIZE {
        return Err(ValidationError::ScriptTooLong {
            size: fixed + MIN_EXTRA_NONCE_SIZE,
            max: MAX_COINBASE_SCRIPT_SIZE,
        }
        .into());
    }

    let available = MAX_COINBASE_SCRIPT_SIZE - fixed;
    if extra_nonce_size < MIN_EXTRA_NONCE_SIZE || extra_nonce_size > available {
        return Err(ConfigurationError::ExtraNonceOutOfRange {
            requested: extra_nonce_size,
            min: MIN_EXTRA_NONCE_SIZE,
            available,
        }
        .into());
    }

    Ok(ScriptParts {
        part1,
        part2,
        extra_nonce_size,
    })
}
