//! # gentx
//!
//! A Rust library for constructing the generation (coinbase) transactions a
//! mining pool's job-distribution layer hands to its miners.
//!
//! The crate builds one immutable generation transaction per block template
//! and serializes it as the two byte sequences miners know as `coinb1` and
//! `coinb2`: the halves framing the extra-nonce hole. Every connected miner
//! receives the same two halves and inserts its own extra-nonce bytes, so a
//! job is serialized once per template instead of once per miner.
//!
//! ## Quick Start
//!
//! ```rust
//! use gentx::{BlockTemplate, GenerationBuilder, PayToScript};
//! use bitcoin::hashes::Hash;
//! use bitcoin::{Amount, BlockHash, ScriptBuf};
//!
//! // The daemon poller hands us a fresh template
//! let template = BlockTemplate::new(
//!     840_000,
//!     Amount::from_sat(312_500_000),
//!     BlockHash::all_zeros(),
//! );
//!
//! let job = GenerationBuilder::new(template)
//!     .pool_tag("/gentx/")
//!     .extra_nonce_size(8)
//!     .build(&PayToScript::new(ScriptBuf::new_op_return(&[])))
//!     .unwrap();
//!
//! // The stratum layer broadcasts these with the job notification
//! let coinb1 = job.coinb1();
//! let coinb2 = job.coinb2();
//!
//! // A miner's submission reassembles into a full transaction
//! let tx = job.assemble(&[0u8; 8]).unwrap();
//! assert!(tx.is_coinbase());
//! ```
//!
//! ## Modules
//!
//! - [`generation`] - [`GenerationBuilder`] and the split [`GenerationTransaction`]
//! - [`template`] - [`BlockTemplate`] boundary accepted from the daemon poller
//! - [`allocator`] - [`RewardAllocator`] trait and [`PayToScript`] for payout policy
//! - [`script`] - Two-part coinbase signature-script construction
//! - [`encoding`] - Little-endian, varint and script-number primitives
//! - [`validation`] - Structure validation and job-byte decoding
//! - [`error`] - Error types

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod allocator;
pub mod encoding;
pub mod error;
pub mod generation;
pub mod script;
pub mod template;
pub mod validation;

// Re-export primary types for convenience.
pub use allocator::{PayToScript, RewardAllocator};
pub use error::{ConfigurationError, EncodingError, GenerationError, ValidationError};
pub use generation::{GenerationBuilder, GenerationTransaction};
pub use script::ScriptParts;
pub use template::BlockTemplate;

// Re-export commonly used bitcoin types so users don't need a separate
// bitcoin dependency for basic usage.
pub use bitcoin;
