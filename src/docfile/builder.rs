//! Single-owner builder for DocumentFiles
//!
//! The builder accumulates ops in call order and tracks the front of the
//! invariant stream so appends land at the right offsets. It is owned by
//! exactly one edit session; `build()` freezes the accumulated log into an
//! immutable DocumentFile and nothing partially built ever escapes.

use crate::oplog::Op;
use crate::overlay::OverlaySet;
use crate::span::VariantSpan;

use super::file::DocumentFile;

/// Accumulates an ordered op log for one document.
#[derive(Debug)]
pub struct DocumentFileBuilder {
    document_hash: String,
    ops: Vec<Op>,
    previous_hash_block: Option<String>,
    /// Next free 1-based position in the invariant stream.
    invariant_front: u64,
    seal_required: bool,
}

impl DocumentFileBuilder {
    /// Start a log for the document identified by `document_hash`.
    pub fn new(document_hash: impl Into<String>) -> Self {
        Self {
            document_hash: document_hash.into(),
            ops: Vec::new(),
            previous_hash_block: None,
            invariant_front: 1,
            seal_required: false,
        }
    }

    /// Append text to the invariant stream.
    pub fn append_text(mut self, text: &str) -> Self {
        self.append_text_in_place(text);
        self
    }

    /// Append text that must only ever be compiled into a sealed payload.
    pub fn append_encrypted_text(mut self, text: &str) -> Self {
        self.seal_required = true;
        self.append_text_in_place(text);
        self
    }

    fn append_text_in_place(&mut self, text: &str) {
        self.ops
            .push(Op::put_invariant_text(self.invariant_front, text));
        self.invariant_front += text.len() as u64;
    }

    /// Copy a variant span to a destination offset in the rendered view.
    pub fn copy_variant(mut self, dest_offset: u64, source: VariantSpan) -> Self {
        self.ops.push(Op::copy_variant(dest_offset, source));
        self
    }

    /// Remove a variant span from the rendered view.
    pub fn delete_variant(mut self, span: VariantSpan) -> Self {
        self.ops.push(Op::delete_variant(span));
        self
    }

    /// Append a media reference, occupying one invariant position.
    pub fn put_invariant_media(mut self, media_hash: impl Into<String>) -> Self {
        self.ops
            .push(Op::put_invariant_media(self.invariant_front, media_hash));
        self.invariant_front += 1;
        self
    }

    /// Attach overlays to a variant span.
    pub fn put_overlay(mut self, span: VariantSpan, overlays: OverlaySet) -> Self {
        self.ops.push(Op::put_overlay(span, overlays));
        self
    }

    /// Chain this file to the previous compiled block. Last call wins.
    pub fn previous_hash_block(mut self, hash: impl Into<String>) -> Self {
        self.previous_hash_block = Some(hash.into());
        self
    }

    /// Freeze the accumulated log.
    pub fn build(self) -> DocumentFile {
        DocumentFile::from_parts(
            self.document_hash,
            self.ops,
            self.previous_hash_block,
            self.seal_required,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_appends_advance_the_invariant_front() {
        let file = DocumentFileBuilder::new("doc")
            .append_text("Xanadu")
            .append_text("Green")
            .build();
        assert_eq!(
            file.ops(),
            &[
                Op::put_invariant_text(1, "Xanadu"),
                Op::put_invariant_text(7, "Green"),
            ]
        );
        assert_eq!(file.invariant_stream(), "XanaduGreen");
    }

    #[test]
    fn test_media_occupies_one_position() {
        let file = DocumentFileBuilder::new("doc")
            .append_text("Xanadu")
            .put_invariant_media("cafebabe")
            .append_text("Green")
            .build();
        assert_eq!(
            file.ops()[1],
            Op::put_invariant_media(7, "cafebabe")
        );
        assert_eq!(file.ops()[2], Op::put_invariant_text(8, "Green"));
    }

    #[test]
    fn test_ops_keep_call_order() {
        let span = VariantSpan::new(1, 6).unwrap();
        let file = DocumentFileBuilder::new("doc")
            .append_text("Xanadu")
            .delete_variant(span)
            .copy_variant(1, span)
            .build();
        let opcodes: Vec<u8> = file.ops().iter().map(|op| op.opcode().as_u8()).collect();
        assert_eq!(opcodes, vec![0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_encrypted_append_marks_seal_required() {
        let file = DocumentFileBuilder::new("doc")
            .append_text("public")
            .append_encrypted_text("secret")
            .build();
        assert!(file.seal_required());
        assert_eq!(file.invariant_stream(), "publicsecret");
    }

    #[test]
    fn test_plain_appends_do_not_require_sealing() {
        let file = DocumentFileBuilder::new("doc").append_text("public").build();
        assert!(!file.seal_required());
    }

    #[test]
    fn test_previous_hash_block_last_call_wins() {
        let file = DocumentFileBuilder::new("doc")
            .previous_hash_block("first")
            .previous_hash_block("second")
            .build();
        assert_eq!(file.previous_hash_block(), Some("second"));
    }

    #[test]
    fn test_unchained_file_has_no_previous_block() {
        let file = DocumentFileBuilder::new("doc").build();
        assert_eq!(file.previous_hash_block(), None);
        assert!(file.ops().is_empty());
    }
}
