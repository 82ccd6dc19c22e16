//! Interning table for overlay string literals
//!
//! The compiled document format stores each distinct overlay literal (font
//! family, link target hash, link type) once and references it by index
//! thereafter. The table is built in a dedicated collection pass over the
//! frozen op list, in first-appearance order, so index assignment is
//! deterministic for a given log.

use std::collections::HashMap;

use super::errors::CodecResult;
use super::op::Op;
use super::wire::{put_str, put_u32, Reader};

/// Literal-to-index interning table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternTable {
    values: Vec<String>,
    index: HashMap<String, u32>,
}

impl InternTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every overlay literal from `ops`, in first-appearance order.
    pub fn collect(ops: &[Op]) -> Self {
        let mut table = Self::new();
        for op in ops {
            op.collect_literals(&mut table);
        }
        table
    }

    /// Intern a literal, returning its index (existing or newly assigned).
    pub(crate) fn intern(&mut self, value: &str) -> u32 {
        if let Some(&index) = self.index.get(value) {
            return index;
        }
        let index = self.values.len() as u32;
        self.values.push(value.to_string());
        self.index.insert(value.to_string(), index);
        index
    }

    /// Index of a previously interned literal.
    pub fn lookup(&self, value: &str) -> Option<u32> {
        self.index.get(value).copied()
    }

    /// Literal at `index`, if in range.
    pub fn resolve(&self, index: u32) -> Option<&str> {
        self.values.get(index as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize as a count followed by length-prefixed strings.
    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        put_u32(buf, self.values.len() as u32);
        for value in &self.values {
            put_str(buf, value);
        }
    }

    /// Inverse of [`encode`](Self::encode).
    pub(crate) fn decode(r: &mut Reader<'_>) -> CodecResult<Self> {
        let count = r.u32("intern table count")?;
        let mut table = Self::new();
        for _ in 0..count {
            let value = r.string("intern table entry")?;
            table.intern(&value);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{Overlay, OverlaySet};
    use crate::span::VariantSpan;

    #[test]
    fn test_intern_assigns_first_appearance_indices() {
        let mut table = InternTable::new();
        assert_eq!(table.intern("Courier"), 0);
        assert_eq!(table.intern("jump"), 1);
        assert_eq!(table.intern("Courier"), 0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("jump"), Some(1));
        assert_eq!(table.resolve(0), Some("Courier"));
        assert_eq!(table.resolve(2), None);
    }

    #[test]
    fn test_collect_walks_overlay_literals_in_log_order() {
        let span = VariantSpan::new(1, 10).unwrap();
        let first: OverlaySet = [Overlay::font_family("Courier"), Overlay::Bold]
            .into_iter()
            .collect();
        let second: OverlaySet = [
            Overlay::link("cafebabe", "jump"),
            Overlay::font_family("Courier"),
        ]
        .into_iter()
        .collect();
        let ops = vec![
            Op::put_overlay(span, first),
            Op::put_overlay(span, second),
        ];

        let table = InternTable::collect(&ops);
        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup("Courier"), Some(0));
        // Canonical overlay order puts the font family before the link
        assert_eq!(table.lookup("cafebabe"), Some(1));
        assert_eq!(table.lookup("jump"), Some(2));
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let mut table = InternTable::new();
        table.intern("Courier");
        table.intern("jump");
        table.intern("");

        let mut buf = Vec::new();
        table.encode(&mut buf);
        let mut r = Reader::new(&buf);
        let back = InternTable::decode(&mut r).unwrap();
        r.finish("table").unwrap();
        assert_eq!(back, table);
    }
}
