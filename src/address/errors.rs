//! Address error types

use thiserror::Error;

use crate::span::SpanError;

/// Result type for address operations
pub type AddressResult<T> = Result<T, AddressError>;

/// Address errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// An address must carry at least one segment
    #[error("Malformed address: empty input")]
    Empty,

    /// Segments are non-negative decimal integers
    #[error("Malformed address: segment '{0}' is not a non-negative integer")]
    MalformedSegment(String),

    /// A span suffix must be exactly `start.width`
    #[error("Malformed address: span suffix '{0}' is not of the form start.width")]
    MalformedSpanSuffix(String),

    /// Span suffix bounds violate the span invariants
    #[error("Malformed address span: {0}")]
    InvalidSpanBounds(#[from] SpanError),

    /// Link-element matchers only accept link-element addresses
    #[error("Address {0} is not a link element")]
    NotALinkElement(String),

    /// Range matchers only accept addresses carrying a span suffix
    #[error("Address {0} carries no span")]
    SpanRequired(String),
}
