//! Partition of a span into two adjacent halves

/// The result of splitting a span at an internal offset.
///
/// The two halves are adjacent and their concatenation covers exactly the
/// original range: `left` keeps the original start, `right` begins where
/// `left` ends, and the widths sum to the original width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition<S> {
    /// First `offset` positions of the original span
    pub left: S,
    /// Remaining positions of the original span
    pub right: S,
}
