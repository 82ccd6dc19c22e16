//! Hierarchical tumbler addresses
//!
//! Every structural element of the docuverse (network, document, version,
//! element, byte range) is named by a tumbler: an ordered sequence of
//! non-negative integer segments, optionally qualified by a span suffix
//! addressing a byte range inside the named element.
//!
//! Canonical string form: dot-separated decimal segments, with an optional
//! `~start.width` suffix, e.g. `1.1.0.1.0.2.1~1.500`.
//!
//! Zero segments act as field separators inside a tumbler; the segments
//! after the last zero form the element subpath. Element type `2` is the
//! reserved link space, so an address names a link element exactly when its
//! element subpath begins with `2`.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::span::InvariantSpan;

use super::errors::{AddressError, AddressResult};

/// Element-type segment reserved for the link space.
const LINK_SPACE: u64 = 2;

/// A hierarchical docuverse address, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    segments: Vec<u64>,
    span: Option<InvariantSpan>,
}

impl Address {
    /// Build an address from raw segments, without a span suffix.
    pub fn new(segments: Vec<u64>) -> AddressResult<Self> {
        if segments.is_empty() {
            return Err(AddressError::Empty);
        }
        Ok(Self {
            segments,
            span: None,
        })
    }

    /// Build an address from raw segments with a `start~width` span suffix.
    pub fn with_span(segments: Vec<u64>, start: u64, width: u64) -> AddressResult<Self> {
        if segments.is_empty() {
            return Err(AddressError::Empty);
        }
        let span = InvariantSpan::new(start, width, "")?;
        Ok(Self {
            segments,
            span: Some(span),
        })
    }

    /// Parse the canonical string form.
    ///
    /// Fails on empty input, non-numeric segments, and malformed or
    /// zero-width span suffixes.
    pub fn parse(input: &str) -> AddressResult<Self> {
        if input.is_empty() {
            return Err(AddressError::Empty);
        }

        let (path, suffix) = match input.split_once('~') {
            Some((path, suffix)) => (path, Some(suffix)),
            None => (input, None),
        };

        if path.is_empty() {
            return Err(AddressError::Empty);
        }

        let mut segments = Vec::new();
        for part in path.split('.') {
            let segment = parse_component(part)
                .ok_or_else(|| AddressError::MalformedSegment(part.to_string()))?;
            segments.push(segment);
        }

        let span = match suffix {
            None => None,
            Some(suffix) => {
                let (start, width) = suffix
                    .split_once('.')
                    .ok_or_else(|| AddressError::MalformedSpanSuffix(suffix.to_string()))?;
                let start = parse_component(start)
                    .ok_or_else(|| AddressError::MalformedSpanSuffix(suffix.to_string()))?;
                let width = parse_component(width)
                    .ok_or_else(|| AddressError::MalformedSpanSuffix(suffix.to_string()))?;
                Some(InvariantSpan::new(start, width, "")?)
            }
        };

        Ok(Self { segments, span })
    }

    /// The segment path, without the span suffix.
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// The span suffix, if present.
    pub fn span(&self) -> Option<&InvariantSpan> {
        self.span.as_ref()
    }

    /// True if the address carries a span suffix.
    pub fn has_span(&self) -> bool {
        self.span.is_some()
    }

    /// Start of the span suffix, if present.
    pub fn span_start(&self) -> Option<u64> {
        self.span.as_ref().map(InvariantSpan::start)
    }

    /// Width of the span suffix, if present.
    pub fn span_width(&self) -> Option<u64> {
        self.span.as_ref().map(InvariantSpan::width)
    }

    /// True if the address names an element in the reserved link space.
    ///
    /// The element subpath is everything after the last zero segment; link
    /// elements are those whose subpath begins with `2`.
    pub fn is_link_element(&self) -> bool {
        let subpath_start = self
            .segments
            .iter()
            .rposition(|&segment| segment == 0)
            .map(|separator| separator + 1);
        match subpath_start {
            Some(first) => self.segments.get(first) == Some(&LINK_SPACE),
            None => false,
        }
    }
}

/// Parse one decimal component, rejecting signs, whitespace, and empties.
fn parse_component(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        if let Some(span) = &self.span {
            write!(f, "~{}.{}", span.start(), span.width())?;
        }
        Ok(())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Address::parse(&text).map_err(D::Error::custom)
    }
}
