//! Operation log codec errors
//!
//! Every decode failure is explicit and fatal to the surrounding parse: a
//! log that cannot be decoded exactly is corrupt, and corruption is never
//! ignored.

use thiserror::Error;

use crate::span::SpanError;

/// Result type for op encoding and decoding
pub type CodecResult<T> = Result<T, CodecError>;

/// Op codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Payload ended before the named field was complete
    #[error("Op record truncated while reading {field}")]
    Truncated { field: &'static str },

    /// Payload continued past the end of the operand record
    #[error("Trailing bytes after {context}")]
    TrailingBytes { context: &'static str },

    /// A length-prefixed string field was not valid UTF-8
    #[error("Invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    /// Opcode byte has no assigned operation
    #[error("Unknown opcode {0:#04x}")]
    UnknownOpcode(u8),

    /// Opcode byte is reserved and never carries operands
    #[error("Reserved opcode {0:#04x} in op stream")]
    ReservedOpcode(u8),

    /// Overlay kind byte has no assigned overlay
    #[error("Unknown overlay kind {0:#04x}")]
    UnknownOverlayKind(u8),

    /// Interned index points outside the intern table
    #[error("Intern index {index} out of range for table of {table_len} entries")]
    InternIndexOutOfRange { index: u32, table_len: u32 },

    /// A literal was not interned before emission
    #[error("Value '{0}' missing from intern table")]
    MissingInternEntry(String),

    /// Decoded span operands violate the span invariants
    #[error(transparent)]
    Span(#[from] SpanError),
}
