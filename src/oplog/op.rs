//! The edit vocabulary and its wire codec
//!
//! An op is one immutable edit record. The log is an ordered, append-only
//! sequence of ops; replaying it deterministically reproduces the document.
//!
//! Wire format: one opcode byte, then a fixed/length-prefixed operand
//! payload (little-endian integers, u32-length-prefixed strings). The
//! standalone codec always carries overlay literals inline, so
//! `decode(encode(op)) == op` holds independent of any surrounding framing.
//! Inside a compiled document the same operand layout is used with overlay
//! literals replaced by intern-table indices.

use serde::Serialize;

use crate::overlay::{Overlay, OverlayKind, OverlaySet};
use crate::span::VariantSpan;

use super::errors::{CodecError, CodecResult};
use super::intern::InternTable;
use super::opcode::OpCode;
use super::wire::{put_str, put_u16, put_u32, put_u64, Reader};

/// How overlay string values travel on the wire.
#[derive(Clone, Copy)]
enum ValueMode<'a> {
    /// Literals inline (standalone codec)
    Inline,
    /// Intern-table indices (compiled document)
    Interned(&'a InternTable),
}

/// One edit operation.
///
/// Ops have no identity beyond structural equality: two ops with identical
/// fields are the same op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Op {
    /// Copy a span of the variant stream to a destination offset
    CopyVariant {
        dest_offset: u64,
        source: VariantSpan,
    },
    /// Remove a span from the variant stream
    DeleteVariant { span: VariantSpan },
    /// Append text to the invariant stream at `offset`
    PutInvariantText { offset: u64, text: String },
    /// Append a media reference to the invariant stream at `offset`
    PutInvariantMedia { offset: u64, media_hash: String },
    /// Attach overlays to a span of the variant stream
    PutOverlay {
        span: VariantSpan,
        overlays: OverlaySet,
    },
}

impl Op {
    pub fn copy_variant(dest_offset: u64, source: VariantSpan) -> Self {
        Op::CopyVariant {
            dest_offset,
            source,
        }
    }

    pub fn delete_variant(span: VariantSpan) -> Self {
        Op::DeleteVariant { span }
    }

    pub fn put_invariant_text(offset: u64, text: impl Into<String>) -> Self {
        Op::PutInvariantText {
            offset,
            text: text.into(),
        }
    }

    pub fn put_invariant_media(offset: u64, media_hash: impl Into<String>) -> Self {
        Op::PutInvariantMedia {
            offset,
            media_hash: media_hash.into(),
        }
    }

    pub fn put_overlay(span: VariantSpan, overlays: OverlaySet) -> Self {
        Op::PutOverlay { span, overlays }
    }

    /// The stable opcode for this op.
    pub fn opcode(&self) -> OpCode {
        match self {
            Op::CopyVariant { .. } => OpCode::CopyVariant,
            Op::DeleteVariant { .. } => OpCode::DeleteVariant,
            Op::PutInvariantText { .. } => OpCode::PutInvariantText,
            Op::PutInvariantMedia { .. } => OpCode::PutInvariantMedia,
            Op::PutOverlay { .. } => OpCode::PutOverlay,
        }
    }

    /// Encode as opcode byte + operand payload, literals inline.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![self.opcode().as_u8()];
        // Inline encoding cannot fail: no table lookups are involved.
        self.encode_operands(&mut buf, ValueMode::Inline)
            .expect("inline op encoding is infallible");
        buf
    }

    /// Decode the output of [`encode`](Self::encode), consuming it exactly.
    pub fn decode(bytes: &[u8]) -> CodecResult<Self> {
        let mut r = Reader::new(bytes);
        let op = Self::decode_from(&mut r, ValueMode::Inline)?;
        r.finish("op record")?;
        Ok(op)
    }

    /// Encode with overlay literals replaced by intern-table indices.
    pub(crate) fn encode_interned(&self, table: &InternTable) -> CodecResult<Vec<u8>> {
        let mut buf = vec![self.opcode().as_u8()];
        self.encode_operands(&mut buf, ValueMode::Interned(table))?;
        Ok(buf)
    }

    /// Decode an interned record, resolving literals and index slots.
    pub(crate) fn decode_interned(bytes: &[u8], table: &InternTable) -> CodecResult<Self> {
        let mut r = Reader::new(bytes);
        let op = Self::decode_from(&mut r, ValueMode::Interned(table))?;
        r.finish("op record")?;
        Ok(op)
    }

    /// Feed every overlay literal of this op to the intern table.
    pub(crate) fn collect_literals(&self, table: &mut InternTable) {
        if let Op::PutOverlay { overlays, .. } = self {
            for overlay in overlays {
                match overlay {
                    Overlay::FontFamily { family, .. } => {
                        table.intern(family);
                    }
                    Overlay::Link {
                        to_hash, link_type, ..
                    } => {
                        table.intern(to_hash);
                        table.intern(link_type);
                    }
                    _ => {}
                }
            }
        }
    }

    fn encode_operands(&self, buf: &mut Vec<u8>, mode: ValueMode<'_>) -> CodecResult<()> {
        match self {
            Op::CopyVariant {
                dest_offset,
                source,
            } => {
                put_u64(buf, *dest_offset);
                put_u64(buf, source.start());
                put_u64(buf, source.width());
            }
            Op::DeleteVariant { span } => {
                put_u64(buf, span.start());
                put_u64(buf, span.width());
            }
            Op::PutInvariantText { offset, text } => {
                put_u64(buf, *offset);
                put_str(buf, text);
            }
            Op::PutInvariantMedia { offset, media_hash } => {
                put_u64(buf, *offset);
                put_str(buf, media_hash);
            }
            Op::PutOverlay { span, overlays } => {
                put_u64(buf, span.start());
                put_u64(buf, span.width());
                put_u16(buf, overlays.len() as u16);
                for overlay in overlays {
                    encode_overlay(overlay, buf, mode)?;
                }
            }
        }
        Ok(())
    }

    fn decode_from(r: &mut Reader<'_>, mode: ValueMode<'_>) -> CodecResult<Self> {
        let opcode_byte = r.u8("opcode")?;
        let opcode =
            OpCode::from_u8(opcode_byte).ok_or(CodecError::UnknownOpcode(opcode_byte))?;
        match opcode {
            OpCode::Reserved => Err(CodecError::ReservedOpcode(opcode_byte)),
            OpCode::CopyVariant => {
                let dest_offset = r.u64("copy dest offset")?;
                let start = r.u64("copy source start")?;
                let width = r.u64("copy source width")?;
                Ok(Op::CopyVariant {
                    dest_offset,
                    source: VariantSpan::new(start, width)?,
                })
            }
            OpCode::DeleteVariant => {
                let start = r.u64("delete start")?;
                let width = r.u64("delete width")?;
                Ok(Op::DeleteVariant {
                    span: VariantSpan::new(start, width)?,
                })
            }
            OpCode::PutInvariantText => {
                let offset = r.u64("text offset")?;
                let text = r.string("text")?;
                Ok(Op::PutInvariantText { offset, text })
            }
            OpCode::PutInvariantMedia => {
                let offset = r.u64("media offset")?;
                let media_hash = r.string("media hash")?;
                Ok(Op::PutInvariantMedia { offset, media_hash })
            }
            OpCode::PutOverlay => {
                let start = r.u64("overlay span start")?;
                let width = r.u64("overlay span width")?;
                let span = VariantSpan::new(start, width)?;
                let count = r.u16("overlay count")?;
                let mut overlays = OverlaySet::new();
                for _ in 0..count {
                    overlays.insert(decode_overlay(r, mode)?);
                }
                Ok(Op::PutOverlay { span, overlays })
            }
        }
    }
}

/// Write one overlay entry: kind byte, then the value fields.
fn encode_overlay(overlay: &Overlay, buf: &mut Vec<u8>, mode: ValueMode<'_>) -> CodecResult<()> {
    buf.push(overlay.kind().as_u8());
    match overlay {
        Overlay::Bold | Overlay::Italic | Overlay::Underline | Overlay::Strikethrough => {}
        Overlay::FontFamily { family, .. } => put_value(buf, family, mode)?,
        Overlay::FontSize { size, .. } => put_u32(buf, *size),
        Overlay::Link {
            to_hash, link_type, ..
        } => {
            put_value(buf, to_hash, mode)?;
            put_value(buf, link_type, mode)?;
        }
    }
    Ok(())
}

/// Read one overlay entry, the inverse of [`encode_overlay`].
///
/// Interned decoding fills in the index slots alongside the literals.
fn decode_overlay(r: &mut Reader<'_>, mode: ValueMode<'_>) -> CodecResult<Overlay> {
    let kind_byte = r.u8("overlay kind")?;
    let kind = OverlayKind::from_u8(kind_byte).ok_or(CodecError::UnknownOverlayKind(kind_byte))?;
    Ok(match kind {
        OverlayKind::Bold => Overlay::Bold,
        OverlayKind::Italic => Overlay::Italic,
        OverlayKind::Underline => Overlay::Underline,
        OverlayKind::Strikethrough => Overlay::Strikethrough,
        OverlayKind::FontFamily => {
            let (family, value_index) = read_value(r, "font family", mode)?;
            Overlay::FontFamily {
                family,
                value_index,
            }
        }
        OverlayKind::FontSize => Overlay::FontSize {
            size: r.u32("font size")?,
            value_index: None,
        },
        OverlayKind::Link => {
            let (to_hash, to_hash_index) = read_value(r, "link target", mode)?;
            let (link_type, type_index) = read_value(r, "link type", mode)?;
            Overlay::Link {
                to_hash,
                to_hash_index,
                link_type,
                type_index,
            }
        }
    })
}

fn put_value(buf: &mut Vec<u8>, value: &str, mode: ValueMode<'_>) -> CodecResult<()> {
    match mode {
        ValueMode::Inline => {
            put_str(buf, value);
            Ok(())
        }
        ValueMode::Interned(table) => {
            let index = table
                .lookup(value)
                .ok_or_else(|| CodecError::MissingInternEntry(value.to_string()))?;
            put_u32(buf, index);
            Ok(())
        }
    }
}

fn read_value(
    r: &mut Reader<'_>,
    field: &'static str,
    mode: ValueMode<'_>,
) -> CodecResult<(String, Option<u32>)> {
    match mode {
        ValueMode::Inline => Ok((r.string(field)?, None)),
        ValueMode::Interned(table) => {
            let index = r.u32(field)?;
            let value = table
                .resolve(index)
                .ok_or(CodecError::InternIndexOutOfRange {
                    index,
                    table_len: table.len() as u32,
                })?;
            Ok((value.to_string(), Some(index)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: u64, width: u64) -> VariantSpan {
        VariantSpan::new(start, width).unwrap()
    }

    fn sample_overlays() -> OverlaySet {
        [
            Overlay::Bold,
            Overlay::font_family("Courier"),
            Overlay::font_size(12),
            Overlay::link("cafebabe", "jump"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_insert_text_round_trip() {
        let op = Op::put_invariant_text(5, "Hello Xanadu");
        let decoded = Op::decode(&op.encode()).unwrap();
        assert_eq!(decoded, op);
        match decoded {
            Op::PutInvariantText { offset, text } => {
                assert_eq!(offset, 5);
                assert_eq!(text, "Hello Xanadu");
            }
            other => panic!("wrong op decoded: {:?}", other),
        }
    }

    #[test]
    fn test_every_variant_round_trips() {
        let ops = vec![
            Op::copy_variant(100, span(1, 50)),
            Op::delete_variant(span(7, 3)),
            Op::put_invariant_text(1, "Xanadu"),
            Op::put_invariant_media(42, "b1946ac92492d2347c6235b4d2611184"),
            Op::put_overlay(span(1, 10), sample_overlays()),
        ];
        for op in ops {
            assert_eq!(Op::decode(&op.encode()).unwrap(), op);
        }
    }

    #[test]
    fn test_empty_text_round_trips() {
        let op = Op::put_invariant_text(1, "");
        assert_eq!(Op::decode(&op.encode()).unwrap(), op);
    }

    #[test]
    fn test_opcode_byte_leads_the_record() {
        let op = Op::put_invariant_text(1, "x");
        assert_eq!(op.encode()[0], OpCode::PutInvariantText.as_u8());
    }

    #[test]
    fn test_unknown_opcode_rejected() {
        assert_eq!(Op::decode(&[0x7F]).unwrap_err(), CodecError::UnknownOpcode(0x7F));
    }

    #[test]
    fn test_reserved_opcode_rejected() {
        assert_eq!(Op::decode(&[0x00]).unwrap_err(), CodecError::ReservedOpcode(0x00));
    }

    #[test]
    fn test_truncated_record_rejected() {
        let encoded = Op::put_invariant_text(5, "Hello Xanadu").encode();
        let truncated = &encoded[..encoded.len() - 1];
        assert!(Op::decode(truncated).is_err());
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut encoded = Op::delete_variant(span(1, 4)).encode();
        encoded.push(0x00);
        assert_eq!(
            Op::decode(&encoded).unwrap_err(),
            CodecError::TrailingBytes { context: "op record" }
        );
    }

    #[test]
    fn test_zero_width_span_operand_rejected() {
        // DeleteVariant with width 0 on the wire
        let mut buf = vec![OpCode::DeleteVariant.as_u8()];
        put_u64(&mut buf, 1);
        put_u64(&mut buf, 0);
        assert!(matches!(
            Op::decode(&buf).unwrap_err(),
            CodecError::Span(_)
        ));
    }

    #[test]
    fn test_interned_round_trip_fills_index_slots() {
        let op = Op::put_overlay(span(1, 10), sample_overlays());
        let mut table = InternTable::new();
        op.collect_literals(&mut table);

        let encoded = op.encode_interned(&table).unwrap();
        let decoded = Op::decode_interned(&encoded, &table).unwrap();
        // Equality ignores index slots, so the decoded op is the same op
        assert_eq!(decoded, op);

        // But the slots themselves are now resolved
        let Op::PutOverlay { overlays, .. } = &decoded else {
            panic!("wrong op decoded");
        };
        for overlay in overlays {
            match overlay {
                Overlay::FontFamily { family, value_index } => {
                    assert_eq!(*value_index, table.lookup(family));
                }
                Overlay::Link {
                    to_hash,
                    to_hash_index,
                    link_type,
                    type_index,
                } => {
                    assert_eq!(*to_hash_index, table.lookup(to_hash));
                    assert_eq!(*type_index, table.lookup(link_type));
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_interned_encoding_is_smaller_for_repeated_literals() {
        let family = "A Rather Long Font Family Name";
        let op = Op::put_overlay(
            span(1, 10),
            [Overlay::font_family(family)].into_iter().collect(),
        );
        let mut table = InternTable::new();
        op.collect_literals(&mut table);
        assert!(op.encode_interned(&table).unwrap().len() < op.encode().len());
    }

    #[test]
    fn test_interned_index_out_of_range_rejected() {
        let op = Op::put_overlay(
            span(1, 10),
            [Overlay::font_family("Courier")].into_iter().collect(),
        );
        let mut table = InternTable::new();
        op.collect_literals(&mut table);
        let encoded = op.encode_interned(&table).unwrap();

        // Decode against an empty table: the index no longer resolves
        let empty = InternTable::new();
        assert!(matches!(
            Op::decode_interned(&encoded, &empty).unwrap_err(),
            CodecError::InternIndexOutOfRange { .. }
        ));
    }

    #[test]
    fn test_missing_intern_entry_rejected() {
        let op = Op::put_overlay(
            span(1, 10),
            [Overlay::font_family("Courier")].into_iter().collect(),
        );
        let empty = InternTable::new();
        assert_eq!(
            op.encode_interned(&empty).unwrap_err(),
            CodecError::MissingInternEntry("Courier".to_string())
        );
    }
}
