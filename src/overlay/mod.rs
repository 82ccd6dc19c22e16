//! Presentation and topological overlays
//!
//! Overlays are non-textual metadata attached to a span of the variant
//! stream: presentation markers (bold, italic, fonts) and topological
//! markers (links to other documents).
//!
//! String-valued overlays carry a deferred interning index alongside the
//! literal value. The index is assigned by the document compiler in a
//! dedicated pass over the frozen op list; it is derived state, so equality,
//! ordering, and hashing consider only the overlay kind and literal value.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// Stable one-byte tags for overlay kinds, used by the wire codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(u8)]
pub enum OverlayKind {
    Bold = 1,
    Italic = 2,
    Underline = 3,
    Strikethrough = 4,
    FontFamily = 5,
    FontSize = 6,
    Link = 7,
}

impl OverlayKind {
    /// Convert from the wire byte, returning `None` for unassigned values.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(OverlayKind::Bold),
            2 => Some(OverlayKind::Italic),
            3 => Some(OverlayKind::Underline),
            4 => Some(OverlayKind::Strikethrough),
            5 => Some(OverlayKind::FontFamily),
            6 => Some(OverlayKind::FontSize),
            7 => Some(OverlayKind::Link),
            _ => None,
        }
    }

    /// Convert to the wire byte.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One overlay attached to a span.
#[derive(Debug, Clone, Serialize)]
pub enum Overlay {
    /// Singleton presentation markers
    Bold,
    Italic,
    Underline,
    Strikethrough,
    /// Font family by name, with a deferred interning index for the name
    FontFamily {
        family: String,
        value_index: Option<u32>,
    },
    /// Font size in points
    FontSize {
        size: u32,
        value_index: Option<u32>,
    },
    /// Topological link to another document's content
    Link {
        to_hash: String,
        to_hash_index: Option<u32>,
        link_type: String,
        type_index: Option<u32>,
    },
}

impl Overlay {
    /// Construct a font-family overlay with an unresolved index.
    pub fn font_family(family: impl Into<String>) -> Self {
        Overlay::FontFamily {
            family: family.into(),
            value_index: None,
        }
    }

    /// Construct a font-size overlay with an unresolved index.
    pub fn font_size(size: u32) -> Self {
        Overlay::FontSize {
            size,
            value_index: None,
        }
    }

    /// Construct a link overlay with unresolved indices.
    pub fn link(to_hash: impl Into<String>, link_type: impl Into<String>) -> Self {
        Overlay::Link {
            to_hash: to_hash.into(),
            to_hash_index: None,
            link_type: link_type.into(),
            type_index: None,
        }
    }

    /// The wire tag for this overlay.
    pub fn kind(&self) -> OverlayKind {
        match self {
            Overlay::Bold => OverlayKind::Bold,
            Overlay::Italic => OverlayKind::Italic,
            Overlay::Underline => OverlayKind::Underline,
            Overlay::Strikethrough => OverlayKind::Strikethrough,
            Overlay::FontFamily { .. } => OverlayKind::FontFamily,
            Overlay::FontSize { .. } => OverlayKind::FontSize,
            Overlay::Link { .. } => OverlayKind::Link,
        }
    }

    /// Identity tuple: kind plus literal values, index slots excluded.
    fn identity(&self) -> (u8, Option<&str>, Option<&str>, Option<u32>) {
        match self {
            Overlay::Bold
            | Overlay::Italic
            | Overlay::Underline
            | Overlay::Strikethrough => (self.kind().as_u8(), None, None, None),
            Overlay::FontFamily { family, .. } => {
                (self.kind().as_u8(), Some(family), None, None)
            }
            Overlay::FontSize { size, .. } => (self.kind().as_u8(), None, None, Some(*size)),
            Overlay::Link {
                to_hash, link_type, ..
            } => (self.kind().as_u8(), Some(to_hash), Some(link_type), None),
        }
    }
}

impl PartialEq for Overlay {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Overlay {}

impl Hash for Overlay {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for Overlay {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Overlay {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

/// A set of overlays attached to one span.
///
/// Set semantics keyed on kind + literal value: inserting a duplicate is a
/// no-op, insertion order is irrelevant, and iteration follows the canonical
/// sort order so encoding is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OverlaySet {
    overlays: Vec<Overlay>,
}

impl OverlaySet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an overlay, returning false if an equal one is present.
    pub fn insert(&mut self, overlay: Overlay) -> bool {
        match self.overlays.binary_search(&overlay) {
            Ok(_) => false,
            Err(position) => {
                self.overlays.insert(position, overlay);
                true
            }
        }
    }

    /// True if an equal overlay (kind + literal value) is present.
    pub fn contains(&self, overlay: &Overlay) -> bool {
        self.overlays.binary_search(overlay).is_ok()
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Iterate in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, Overlay> {
        self.overlays.iter()
    }
}

impl FromIterator<Overlay> for OverlaySet {
    fn from_iter<I: IntoIterator<Item = Overlay>>(iter: I) -> Self {
        let mut set = OverlaySet::new();
        for overlay in iter {
            set.insert(overlay);
        }
        set
    }
}

impl<'a> IntoIterator for &'a OverlaySet {
    type Item = &'a Overlay;
    type IntoIter = std::slice::Iter<'a, Overlay>;

    fn into_iter(self) -> Self::IntoIter {
        self.overlays.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            OverlayKind::Bold,
            OverlayKind::Italic,
            OverlayKind::Underline,
            OverlayKind::Strikethrough,
            OverlayKind::FontFamily,
            OverlayKind::FontSize,
            OverlayKind::Link,
        ] {
            assert_eq!(OverlayKind::from_u8(kind.as_u8()), Some(kind));
        }
        assert_eq!(OverlayKind::from_u8(0), None);
        assert_eq!(OverlayKind::from_u8(8), None);
    }

    #[test]
    fn test_equality_ignores_index_slots() {
        let unresolved = Overlay::font_family("Courier");
        let resolved = Overlay::FontFamily {
            family: "Courier".to_string(),
            value_index: Some(3),
        };
        assert_eq!(unresolved, resolved);

        let link = Overlay::link("deadbeef", "jump");
        let resolved_link = Overlay::Link {
            to_hash: "deadbeef".to_string(),
            to_hash_index: Some(0),
            link_type: "jump".to_string(),
            type_index: Some(1),
        };
        assert_eq!(link, resolved_link);
    }

    #[test]
    fn test_equality_distinguishes_literal_values() {
        assert_ne!(Overlay::font_family("Courier"), Overlay::font_family("Times"));
        assert_ne!(Overlay::font_size(10), Overlay::font_size(12));
        assert_ne!(Overlay::link("a", "jump"), Overlay::link("a", "quote"));
        assert_ne!(Overlay::Bold, Overlay::Italic);
    }

    #[test]
    fn test_set_deduplicates_on_kind_and_value() {
        let mut set = OverlaySet::new();
        assert!(set.insert(Overlay::Bold));
        assert!(!set.insert(Overlay::Bold));
        assert!(set.insert(Overlay::font_family("Courier")));
        // Same literal with a resolved index is still a duplicate
        assert!(!set.insert(Overlay::FontFamily {
            family: "Courier".to_string(),
            value_index: Some(7),
        }));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_set_order_is_insertion_independent() {
        let forward: OverlaySet = [
            Overlay::Bold,
            Overlay::Italic,
            Overlay::font_size(12),
            Overlay::font_family("Courier"),
        ]
        .into_iter()
        .collect();
        let reverse: OverlaySet = [
            Overlay::font_family("Courier"),
            Overlay::font_size(12),
            Overlay::Italic,
            Overlay::Bold,
        ]
        .into_iter()
        .collect();
        assert_eq!(forward, reverse);
        let forward_kinds: Vec<_> = forward.iter().map(Overlay::kind).collect();
        let reverse_kinds: Vec<_> = reverse.iter().map(Overlay::kind).collect();
        assert_eq!(forward_kinds, reverse_kinds);
    }
}
