//! Error types for generation-transaction construction.
//!
//! Failures are grouped into the three categories the job-distribution layer
//! tells apart: template data rejected at the boundary ([`ValidationError`]),
//! primitive encodings out of range ([`EncodingError`]), and pool
//! configuration that conflicts with the script budget
//! ([`ConfigurationError`]). [`GenerationError`] is the sum type returned by
//! the builder and the serializers.

use alloc::string::String;
use core::fmt;

/// Malformed or oversized data in an externally supplied block template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The template's coinbase aux flags were not valid hex.
    AuxFlagsHex {
        /// What the hex decoder rejected.
        reason: &'static str,
    },
    /// The coinbase signature script exceeds the consensus maximum.
    ScriptTooLong {
        /// Actual (or implied) size in bytes.
        size: usize,
        /// Maximum allowed size (100).
        max: usize,
    },
    /// The coinbase signature script is below the consensus minimum.
    ScriptTooShort {
        /// Actual size in bytes.
        size: usize,
        /// Minimum required size (2).
        min: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::AuxFlagsHex { reason } => {
                write!(f, "invalid coinbase aux flags: {}", reason)
            }
            ValidationError::ScriptTooLong { size, max } => {
                write!(f, "coinbase script too long: {} bytes (max {})", size, max)
            }
            ValidationError::ScriptTooShort { size, min } => {
                write!(f, "coinbase script too short: {} bytes (min {})", size, min)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ValidationError {}

/// A primitive value fell outside the representable range of its chain
/// encoding, or bytes could not be decoded back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The script-number payload would exceed the supported push width.
    ScriptNumberTooLarge {
        /// The value that failed to encode.
        value: u64,
        /// Maximum payload width in bytes.
        max_bytes: usize,
    },
    /// A script-number push could not be decoded.
    InvalidScriptNumber {
        /// What the decoder rejected.
        reason: &'static str,
    },
    /// A varint was not minimally encoded.
    NonMinimalVarInt,
    /// Ran out of bytes while decoding.
    UnexpectedEnd,
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingError::ScriptNumberTooLarge { value, max_bytes } => {
                write!(
                    f,
                    "script number {} does not fit in {} payload bytes",
                    value, max_bytes
                )
            }
            EncodingError::InvalidScriptNumber { reason } => {
                write!(f, "invalid script number: {}", reason)
            }
            EncodingError::NonMinimalVarInt => {
                write!(f, "varint is not minimally encoded")
            }
            EncodingError::UnexpectedEnd => {
                write!(f, "unexpected end of input")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodingError {}

/// Pool configuration that cannot produce a valid generation transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The extra-nonce hole does not fit the script-length budget.
    ExtraNonceOutOfRange {
        /// Requested hole width in bytes.
        requested: usize,
        /// Smallest permitted width.
        min: usize,
        /// Largest width the remaining budget admits.
        available: usize,
    },
    /// No timestamp was supplied and the build has no wall clock to read.
    TimestampRequired,
    /// A transaction comment was supplied but comment support is disabled.
    CommentUnsupported,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::ExtraNonceOutOfRange {
                requested,
                min,
                available,
            } => {
                write!(
                    f,
                    "extra-nonce size {} outside permitted range [{}, {}]",
                    requested, min, available
                )
            }
            ConfigurationError::TimestampRequired => {
                write!(f, "an explicit timestamp is required without std")
            }
            ConfigurationError::CommentUnsupported => {
                write!(
                    f,
                    "a transaction comment requires transaction-comment support"
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigurationError {}

/// Any failure while building or serializing a generation transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Block-template data was rejected.
    Validation(ValidationError),
    /// A primitive encoding failed.
    Encoding(EncodingError),
    /// Pool configuration conflicts with the script budget.
    Configuration(ConfigurationError),
    /// Extra-nonce bytes handed to the serializer don't match the hole size.
    ExtraNonceSizeMismatch {
        /// Hole width fixed at construction time.
        expected: usize,
        /// Actual size in bytes.
        got: usize,
    },
    /// Bytes did not have generation-transaction structure.
    InvalidStructure {
        /// Description of the structural issue.
        reason: &'static str,
    },
    /// The reward-allocation collaborator failed.
    Allocation(String),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Validation(e) => write!(f, "{}", e),
            GenerationError::Encoding(e) => write!(f, "{}", e),
            GenerationError::Configuration(e) => write!(f, "{}", e),
            GenerationError::ExtraNonceSizeMismatch { expected, got } => {
                write!(
                    f,
                    "extra-nonce size mismatch: expected {} bytes, got {}",
                    expected, got
                )
            }
            GenerationError::InvalidStructure { reason } => {
                write!(f, "invalid generation transaction: {}", reason)
            }
            GenerationError::Allocation(reason) => {
                write!(f, "reward allocation failed: {}", reason)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::Validation(e) => Some(e),
            GenerationError::Encoding(e) => Some(e),
            GenerationError::Configuration(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for GenerationError {
    fn from(e: ValidationError) -> Self {
        GenerationError::Validation(e)
    }
}

impl From<EncodingError> for GenerationError {
    fn from(e: EncodingError) -> Self {
        GenerationError::Encoding(e)
    }
}

impl From<ConfigurationError> for GenerationError {
    fn from(e: ConfigurationError) -> Self {
        GenerationError::Configuration(e)
    }
}
