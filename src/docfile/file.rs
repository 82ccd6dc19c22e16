//! The DocumentFile aggregate
//!
//! A DocumentFile is the frozen result of building an edit session: the
//! target document's hash, the ordered op log, and the chain pointer to the
//! previous compiled block of the same document. Once built it is immutable
//! and freely shareable across threads.

use serde::Serialize;

use crate::oplog::Op;

/// Placeholder a media insertion contributes to the invariant stream.
const MEDIA_PLACEHOLDER: char = '\u{FFFC}';

/// An immutable, ordered edit log for one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFile {
    document_hash: String,
    ops: Vec<Op>,
    previous_hash_block: Option<String>,
    seal_required: bool,
}

impl DocumentFile {
    pub(crate) fn from_parts(
        document_hash: impl Into<String>,
        ops: Vec<Op>,
        previous_hash_block: Option<String>,
        seal_required: bool,
    ) -> Self {
        Self {
            document_hash: document_hash.into(),
            ops,
            previous_hash_block,
            seal_required,
        }
    }

    /// Content hash identifying the document this log edits.
    pub fn document_hash(&self) -> &str {
        &self.document_hash
    }

    /// The ordered op log.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Hash of the previous compiled block of this document, if chained.
    pub fn previous_hash_block(&self) -> Option<&str> {
        self.previous_hash_block.as_deref()
    }

    /// True if the file carries text the author marked for sealing.
    pub fn seal_required(&self) -> bool {
        self.seal_required
    }

    /// The accumulated invariant text: every text and media insertion in
    /// log order. Copies and deletes rearrange the variant stream and never
    /// touch the as-authored content, so they do not appear here.
    pub fn invariant_stream(&self) -> String {
        let mut stream = String::new();
        for op in &self.ops {
            match op {
                Op::PutInvariantText { text, .. } => stream.push_str(text),
                Op::PutInvariantMedia { .. } => stream.push(MEDIA_PLACEHOLDER),
                _ => {}
            }
        }
        stream
    }
}

/// Structural equality over the durable fields.
///
/// `seal_required` is a compile-time instruction, not document content: a
/// plain blob and a sealed blob of the same log decompile to equal files.
impl PartialEq for DocumentFile {
    fn eq(&self, other: &Self) -> bool {
        self.document_hash == other.document_hash
            && self.ops == other.ops
            && self.previous_hash_block == other.previous_hash_block
    }
}

impl Eq for DocumentFile {}
