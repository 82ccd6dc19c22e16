//! DocumentFile compiler
//!
//! Serializes a frozen op log into a signed, optionally sealed, chained
//! blob. Compilation is a linear pipeline: intern overlay literals, encode
//! the binary body, checksum it, seal it if a recipient was named, then
//! frame and sign the result with the author's key.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use tracing::debug;

use crate::crypto::{seal, AuthorKey, RecipientPublicKey};
use crate::oplog::wire::{put_str, put_u16, put_u32};
use crate::oplog::InternTable;

use super::checksum::compute_checksum;
use super::errors::{CompileError, CompileResult};
use super::file::DocumentFile;
use super::framing::{
    signed_bytes, FIELD_SEPARATOR, FORMAT_MARKER, PAYLOAD_PLAIN, PAYLOAD_SEALED, PAYLOAD_VERSION,
};
use super::percent::percent_encode;

/// Compile `file` into a signed blob.
///
/// The payload is sealed for `recipient` when one is supplied; a file whose
/// author appended encrypted text cannot be compiled without one.
pub fn compile(
    file: &DocumentFile,
    author: &AuthorKey,
    recipient: Option<&RecipientPublicKey>,
) -> CompileResult<Vec<u8>> {
    if file.seal_required() && recipient.is_none() {
        return Err(CompileError::MissingRecipientKey(
            "document contains encrypted text appends",
        ));
    }

    let body = encode_body(file)?;
    let mut payload = Vec::with_capacity(body.len() + 1);
    match recipient {
        None => {
            payload.push(PAYLOAD_PLAIN);
            payload.extend_from_slice(&body);
        }
        Some(recipient) => {
            payload.push(PAYLOAD_SEALED);
            payload.extend_from_slice(&seal(&body, recipient)?);
        }
    }

    let identity_field = percent_encode(&author.author_address().to_string());
    let payload_field = URL_SAFE_NO_PAD.encode(&payload);
    let signature = author.sign(&signed_bytes(&identity_field, &payload_field));
    let signature_field = URL_SAFE_NO_PAD.encode(signature.to_bytes());

    debug!(
        document = file.document_hash(),
        ops = file.ops().len(),
        sealed = recipient.is_some(),
        chained = file.previous_hash_block().is_some(),
        "compiled document file"
    );

    let mut blob = String::with_capacity(
        FORMAT_MARKER.len() + identity_field.len() + signature_field.len() + payload_field.len() + 3,
    );
    blob.push_str(FORMAT_MARKER);
    blob.push(FIELD_SEPARATOR);
    blob.push_str(&identity_field);
    blob.push(FIELD_SEPARATOR);
    blob.push_str(&signature_field);
    blob.push(FIELD_SEPARATOR);
    blob.push_str(&payload_field);
    Ok(blob.into_bytes())
}

/// Encode the binary payload body: version, chain pointer, intern table,
/// length-prefixed op records, trailing CRC32.
fn encode_body(file: &DocumentFile) -> CompileResult<Vec<u8>> {
    let table = InternTable::collect(file.ops());

    let mut body = Vec::new();
    put_u16(&mut body, PAYLOAD_VERSION);
    put_str(&mut body, file.previous_hash_block().unwrap_or(""));
    table.encode(&mut body);
    put_u32(&mut body, file.ops().len() as u32);
    for op in file.ops() {
        let record = op.encode_interned(&table)?;
        put_u32(&mut body, record.len() as u32);
        body.extend_from_slice(&record);
    }

    let checksum = compute_checksum(&body);
    body.extend_from_slice(&checksum.to_le_bytes());
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docfile::DocumentFileBuilder;

    fn author() -> AuthorKey {
        AuthorKey::from_bytes(&[11; 32])
    }

    #[test]
    fn test_blob_has_four_text_fields() {
        let file = DocumentFileBuilder::new("doc").append_text("Xanadu").build();
        let blob = compile(&file, &author(), None).unwrap();
        let text = String::from_utf8(blob).unwrap();
        let fields: Vec<&str> = text.split('\n').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], FORMAT_MARKER);
    }

    #[test]
    fn test_identity_field_url_decodes_to_author_address() {
        let file = DocumentFileBuilder::new("doc").append_text("Xanadu").build();
        let blob = compile(&file, &author(), None).unwrap();
        let text = String::from_utf8(blob).unwrap();
        let identity_field = text.split('\n').nth(1).unwrap();
        // The encoded field is visibly escaped, and decodes exactly
        assert!(identity_field.contains("%2E"));
        assert_eq!(
            super::super::percent::percent_decode(identity_field).unwrap(),
            author().author_address().to_string()
        );
    }

    #[test]
    fn test_compilation_is_deterministic_for_plain_payloads() {
        let file = DocumentFileBuilder::new("doc")
            .append_text("Xanadu")
            .previous_hash_block("X")
            .build();
        let a = compile(&file, &author(), None).unwrap();
        let b = compile(&file, &author(), None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seal_required_without_recipient_is_an_error() {
        let file = DocumentFileBuilder::new("doc")
            .append_encrypted_text("secret")
            .build();
        assert!(matches!(
            compile(&file, &author(), None),
            Err(CompileError::MissingRecipientKey(_))
        ));
    }
}
