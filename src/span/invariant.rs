//! Invariant stream spans
//!
//! An invariant span addresses a contiguous byte range in the immutable,
//! as-authored content of a document version. Offsets are fixed at authoring
//! time and never move, so an invariant span also records which document's
//! content it addresses (an empty hash means the span is local to the
//! document being edited).

use serde::Serialize;

use super::errors::{SpanError, SpanResult};
use super::partition::Partition;

/// A contiguous range in the invariant (as-authored) stream of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InvariantSpan {
    start: u64,
    width: u64,
    document_hash: String,
}

impl InvariantSpan {
    /// Create a span covering `width` positions beginning at `start` in the
    /// document identified by `document_hash`.
    ///
    /// An empty hash denotes the document currently being edited. Fails if
    /// `start` is 0 or `width` is 0.
    pub fn new(start: u64, width: u64, document_hash: impl Into<String>) -> SpanResult<Self> {
        if start < 1 {
            return Err(SpanError::StartBeforeStream(start));
        }
        if width < 1 {
            return Err(SpanError::ZeroWidth);
        }
        Ok(Self {
            start,
            width,
            document_hash: document_hash.into(),
        })
    }

    /// First covered position.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Number of covered positions.
    pub fn width(&self) -> u64 {
        self.width
    }

    /// Last covered position (`start + width - 1`).
    pub fn end(&self) -> u64 {
        self.start + self.width - 1
    }

    /// Content hash of the owning document; empty for same-document spans.
    pub fn document_hash(&self) -> &str {
        &self.document_hash
    }

    /// True if the two spans share at least one position.
    ///
    /// Purely positional: the owning document hashes are not compared.
    /// Ranges are closed on both sides, so boundary-touching counts.
    pub fn overlaps(&self, other: &InvariantSpan) -> bool {
        self.start <= other.end() && other.start <= self.end()
    }

    /// Split into two adjacent spans at an internal offset.
    ///
    /// Both halves keep the owning document hash. The offset must satisfy
    /// `1 <= offset < width`.
    pub fn split(&self, offset: u64) -> SpanResult<Partition<InvariantSpan>> {
        if offset < 1 || offset >= self.width {
            return Err(SpanError::SplitOutOfBounds {
                offset,
                width: self.width,
            });
        }
        Ok(Partition {
            left: InvariantSpan {
                start: self.start,
                width: offset,
                document_hash: self.document_hash.clone(),
            },
            right: InvariantSpan {
                start: self.start + offset,
                width: self.width - offset,
                document_hash: self.document_hash.clone(),
            },
        })
    }
}
