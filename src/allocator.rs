//! Reward-output allocation.
//!
//! Payout policy varies per pool and per chain, so output allocation is
//! injected rather than built in. The builder calls [`RewardAllocator`]
//! exactly once per template and stores whatever outputs it returns,
//! verbatim. Implementations can model any policy:
//!
//! - **Static**: the full template value to one script ([`PayToScript`])
//! - **Fee split**: pool fee output plus miner payout outputs
//! - **Custom**: donation outputs, merge-mining commitments, treasuries

use alloc::vec;
use alloc::vec::Vec;

use bitcoin::{ScriptBuf, TxOut};

use crate::template::BlockTemplate;

/// Trait for producing the reward outputs of a generation transaction.
///
/// Implementations receive the accepted block template and return the
/// complete output list, including the split of
/// [`coinbase_value`](BlockTemplate::coinbase_value) between the parties
/// the pool pays.
pub trait RewardAllocator {
    /// The error type returned by allocation.
    type Error: core::fmt::Debug;

    /// Produce the outputs for the transaction built from `template`.
    ///
    /// Called exactly once per build.
    fn allocate(&self, template: &BlockTemplate) -> Result<Vec<TxOut>, Self::Error>;
}

/// Allocator that pays the full template value to one locking script.
///
/// The simplest policy, suitable for solo operation or for pools that
/// sweep the reward to a treasury address and settle shares off-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayToScript(ScriptBuf);

impl PayToScript {
    /// Create an allocator paying everything to `script`.
    pub fn new(script: ScriptBuf) -> Self {
        Self(script)
    }

    /// Return a reference to the locking script.
    pub fn inner(&self) -> &ScriptBuf {
        &self.0
    }

    /// Consume the allocator and return the locking script.
    pub fn into_inner(self) -> ScriptBuf {
        self.0
    }
}

impl RewardAllocator for PayToScript {
    type Error = core::convert::Infallible;

    fn allocate(&self, template: &BlockTemplate) -> Result<Vec<TxOut>, Self::Error> {
        Ok(vec![TxOut {
            value: template.coinbase_value(),
            script_pubkey: self.0.clone(),
        }])
    }
}

impl From<ScriptBuf> for PayToScript {
    fn from(script: ScriptBuf) -> Self {
        Self::new(script)
    }
}
