//! Structure validation and job-byte decoding.
//!
//! The builder never emits invalid structures itself; these checks guard
//! the seams where bytes cross trust boundaries: transactions reassembled
//! from miner-submitted extra nonces ahead of block submission, and job
//! halves inspected by tests and monitoring tools.

use alloc::vec::Vec;

use bitcoin::{OutPoint, Script, Transaction};

use crate::encoding;
use crate::error::{EncodingError, GenerationError, ValidationError};
use crate::script::{MAX_COINBASE_SCRIPT_SIZE, MIN_COINBASE_SCRIPT_SIZE};

/// Decoded fixed header of a `coinb1` byte sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coinb1 {
    /// Transaction version.
    pub version: u32,
    /// Declared input count (1 for a generation transaction).
    pub input_count: u64,
    /// Declared total signature-script length: part 1 plus the extra-nonce
    /// hole plus part 2.
    pub script_len: usize,
    /// The script bytes present in this half (part 1).
    pub script_prefix: Vec<u8>,
}

/// Validate that a transaction has generation-transaction structure.
///
/// Checks: exactly one input, the sentinel previous-output (all-zero hash,
/// `0xFFFFFFFF` index), and a signature script within the consensus bound.
/// Returns every violation found, not just the first.
pub fn validate_generation_structure(tx: &Transaction) -> Result<(), Vec<GenerationError>> {
    let mut errors = Vec::new();

    if tx.input.len() != 1 {
        errors.push(GenerationError::InvalidStructure {
            reason: "generation transaction must have exactly one input",
        });
    }

    if let Some(input) = tx.input.first() {
        if input.previous_output != OutPoint::null() {
            errors.push(GenerationError::InvalidStructure {
                reason: "input previous-output must be the null sentinel",
            });
        }

        let script_len = input.script_sig.as_bytes().len();
        if script_len > MAX_COINBASE_SCRIPT_SIZE {
            errors.push(
                ValidationError::ScriptTooLong {
                    size: script_len,
                    max: MAX_COINBASE_SCRIPT_SIZE,
                }
                .into(),
            );
        }
        if script_len < MIN_COINBASE_SCRIPT_SIZE {
            errors.push(
                ValidationError::ScriptTooShort {
                    size: script_len,
                    min: MIN_COINBASE_SCRIPT_SIZE,
                }
                .into(),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Decode the block height from the leading push of a signature script.
///
/// The height is the first script item, encoded as a minimal script
/// number.
pub fn extract_height(script: &Script) -> Result<u32, EncodingError> {
    let (value, _) = encoding::decode_script_number(script.as_bytes())?;
    u32::try_from(value).map_err(|_| EncodingError::InvalidScriptNumber {
        reason: "height exceeds 32 bits",
    })
}

/// Decode the fixed header of a `coinb1` half.
///
/// # Errors
///
/// [`GenerationError::InvalidStructure`] when the previous-output is not
/// the sentinel; [`GenerationError::Encoding`] on truncated or malformed
/// fields.
pub fn decode_coinb1(bytes: &[u8]) -> Result<Coinb1, GenerationError> {
    let mut offset = 0usize;

    let version = take_u32_le(bytes, &mut offset)?;

    let (input_count, used) = encoding::read_varint(&bytes[offset..])?;
    offset += used;

    let hash = take(bytes, &mut offset, 32)?;
    if hash.iter().any(|&b| b != 0) {
        return Err(GenerationError::InvalidStructure {
            reason: "previous-output hash is not the zero sentinel",
        });
    }

    let index = take_u32_le(bytes, &mut offset)?;
    if index != u32::MAX {
        return Err(GenerationError::InvalidStructure {
            reason: "previous-output index is not 0xffffffff",
        });
    }

    let (script_len, used) = encoding::read_varint(&bytes[offset..])?;
    offset += used;

    Ok(Coinb1 {
        version,
        input_count,
        script_len: script_len as usize,
        script_prefix: bytes[offset..].to_vec(),
    })
}

fn take<'a>(bytes: &'a [u8], offset: &mut usize, n: usize) -> Result<&'a [u8], GenerationError> {
    let slice = bytes
        .get(*offset..*offset + n)
        .ok_or(GenerationError::Encoding(EncodingError::UnexpectedEnd))?;
    *offset += n;
    Ok(slice)
}

fn take_u32_le(bytes: &[u8], offset: &mut usize) -> Result<u32, GenerationError> {
    let slice = take(bytes, offset, 4)?;
    let mut arr = [0u8; 4];
    arr.copy_from_slice(slice);
    Ok(u32::from_le_bytes(arr))
}
