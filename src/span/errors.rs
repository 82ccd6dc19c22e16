//! Span error types
//!
//! Span construction and splitting are strict: a span that would address
//! nothing, or a split that would produce one, is rejected at the point of
//! detection and never papered over.

use thiserror::Error;

/// Result type for span operations
pub type SpanResult<T> = Result<T, SpanError>;

/// Span errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanError {
    /// Stream positions are 1-based; a start of 0 addresses nothing
    #[error("Malformed span: start must be >= 1, got {0}")]
    StartBeforeStream(u64),

    /// A span must cover at least one position
    #[error("Malformed span: width must be >= 1")]
    ZeroWidth,

    /// Split offsets must fall strictly inside the span
    #[error("Split offset {offset} out of bounds for span of width {width} (valid range: 1..{width})")]
    SplitOutOfBounds { offset: u64, width: u64 },
}
