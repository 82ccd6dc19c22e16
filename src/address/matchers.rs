//! Address matchers
//!
//! Pure predicates over addresses, used to filter query results. Matchers
//! validate their member sets at construction and never fail at match time.

use std::collections::HashSet;

use crate::span::InvariantSpan;

use super::errors::{AddressError, AddressResult};
use super::tumbler::Address;

/// Matches addresses by exact set membership.
///
/// An absent or empty member set is permissive: every address matches. This
/// is the default for unfiltered queries.
#[derive(Debug, Clone, Default)]
pub struct AddressSetMatcher {
    members: Option<HashSet<Address>>,
}

impl AddressSetMatcher {
    /// Build a matcher from an optional member set.
    pub fn new(members: Option<HashSet<Address>>) -> Self {
        Self { members }
    }

    /// Build a matcher whose members must all be link elements.
    pub fn link_elements_only(members: Option<HashSet<Address>>) -> AddressResult<Self> {
        if let Some(set) = &members {
            for member in set {
                if !member.is_link_element() {
                    return Err(AddressError::NotALinkElement(member.to_string()));
                }
            }
        }
        Ok(Self { members })
    }

    /// True if the member set is absent/empty or contains `addr` exactly.
    ///
    /// Membership is structural, so an address with a span suffix only
    /// matches a member carrying the same suffix.
    pub fn matches(&self, addr: &Address) -> bool {
        match &self.members {
            None => true,
            Some(set) if set.is_empty() => true,
            Some(set) => set.contains(addr),
        }
    }
}

/// Matches addresses whose span inclusively overlaps any member's span.
///
/// Every member must carry a span suffix; construction fails otherwise.
/// Overlap treats span ranges as closed on both sides, so ranges that touch
/// at exactly one boundary position match.
#[derive(Debug, Clone)]
pub struct SpanRangeMatcher {
    member_spans: Vec<InvariantSpan>,
}

impl SpanRangeMatcher {
    /// Build a matcher from member addresses, all of which must carry spans.
    pub fn new(members: &[Address]) -> AddressResult<Self> {
        let mut member_spans = Vec::with_capacity(members.len());
        for member in members {
            match member.span() {
                Some(span) => member_spans.push(span.clone()),
                None => return Err(AddressError::SpanRequired(member.to_string())),
            }
        }
        Ok(Self { member_spans })
    }

    /// True if `addr` carries a span that overlaps any member's span.
    ///
    /// Spanless queries never match a range matcher.
    pub fn matches(&self, addr: &Address) -> bool {
        match addr.span() {
            Some(query) => self.member_spans.iter().any(|m| m.overlaps(query)),
            None => false,
        }
    }
}
