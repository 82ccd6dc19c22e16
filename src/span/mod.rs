//! Span algebra over document byte ranges
//!
//! A span is a `(start, width)` value addressing a contiguous, 1-based byte
//! range in either the invariant (as-authored) or variant (rendered) stream
//! of a document.
//!
//! # Invariants Enforced
//!
//! - Every span has `start >= 1` and `width >= 1`; violations fail at
//!   construction, never later.
//! - Spans are immutable values: splitting returns new spans.
//! - Covered positions form the closed range `[start, start + width - 1]`;
//!   overlap tests treat both endpoints as inclusive, so boundary-touching
//!   spans overlap.

mod errors;
mod invariant;
mod partition;
mod variant;

pub use errors::{SpanError, SpanResult};
pub use invariant::InvariantSpan;
pub use partition::Partition;
pub use variant::VariantSpan;
