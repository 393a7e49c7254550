//! Block-template boundary.
//!
//! A [`BlockTemplate`] carries the slice of daemon RPC state that
//! generation-transaction construction consumes. Field data is validated
//! where the template is accepted and the record is immutable afterwards; a
//! newer template replaces the old one wholesale, there is no in-place
//! merging.

use alloc::vec::Vec;

use bitcoin::hex::{FromHex, HexToBytesError};
use bitcoin::{Amount, BlockHash};

use crate::error::ValidationError;

/// Daemon-supplied description of the candidate block being worked on.
///
/// Only the fields the generation transaction needs are carried; the job
/// scheduler keeps the rest of the RPC response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTemplate {
    height: u32,
    coinbase_value: Amount,
    previous_block_hash: BlockHash,
    aux_flags: Vec<u8>,
}

impl BlockTemplate {
    /// Create a template with no coinbase aux flags.
    pub fn new(height: u32, coinbase_value: Amount, previous_block_hash: BlockHash) -> Self {
        Self {
            height,
            coinbase_value,
            previous_block_hash,
            aux_flags: Vec::new(),
        }
    }

    /// Attach coinbase aux flags that are already raw bytes.
    pub fn with_aux_flags(mut self, flags: &[u8]) -> Self {
        self.aux_flags = flags.to_vec();
        self
    }

    /// Attach coinbase aux flags from the hex string the daemon reports.
    ///
    /// Fails fast on malformed hex: a template whose aux flags cannot be
    /// decoded is rejected here, never defaulted to empty flags.
    pub fn with_aux_flags_hex(self, hex: &str) -> Result<Self, ValidationError> {
        let flags = Vec::<u8>::from_hex(hex).map_err(|e| match e {
            HexToBytesError::OddLengthString(_) => ValidationError::AuxFlagsHex {
                reason: "odd-length hex string",
            },
            _ => ValidationError::AuxFlagsHex {
                reason: "invalid hex digit",
            },
        })?;
        Ok(self.with_aux_flags(&flags))
    }

    /// Height of the candidate block.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total funds available to the generation transaction (subsidy plus
    /// fees), in the smallest currency unit.
    pub fn coinbase_value(&self) -> Amount {
        self.coinbase_value
    }

    /// Hash of the block this candidate builds on.
    pub fn previous_block_hash(&self) -> BlockHash {
        self.previous_block_hash
    }

    /// Coinbase aux flags to embed after the height push.
    pub fn aux_flags(&self) -> &[u8] {
        &self.aux_flags
    }
}
