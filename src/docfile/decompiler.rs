//! DocumentFile decompiler
//!
//! Exact inverse of the compiler, with verification first: the signature is
//! checked against the embedded author identity before a single payload
//! byte is parsed. Every failure (framing, marker, signature, sealing,
//! checksum, op stream) is fatal to the call.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use ed25519_dalek::Signature;
use tracing::debug;

use crate::address::Address;
use crate::crypto::{unseal, verify, verifying_key_from_address, RecipientSecretKey};
use crate::oplog::wire::Reader;
use crate::oplog::{InternTable, Op};

use super::checksum::verify_checksum;
use super::errors::{CompileError, CompileResult};
use super::file::DocumentFile;
use super::framing::{
    signed_bytes, FIELD_COUNT, FIELD_SEPARATOR, FORMAT_MARKER, PAYLOAD_PLAIN, PAYLOAD_SEALED,
    PAYLOAD_VERSION,
};
use super::percent::percent_decode;

/// Decompile a blob back into the DocumentFile it was compiled from.
///
/// `expected_document_hash` is the caller-supplied address of the document;
/// the blob itself is self-describing for everything else. A sealed payload
/// requires the matching recipient secret key.
pub fn decompile(
    expected_document_hash: &str,
    bytes: &[u8],
    recipient: Option<&RecipientSecretKey>,
) -> CompileResult<DocumentFile> {
    let text =
        std::str::from_utf8(bytes).map_err(|_| CompileError::MalformedBlob("blob is not UTF-8"))?;
    let fields: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(CompileError::MalformedBlob("wrong field count"));
    }
    let (marker, identity_field, signature_field, payload_field) =
        (fields[0], fields[1], fields[2], fields[3]);
    if marker != FORMAT_MARKER {
        return Err(CompileError::UnsupportedFormat(marker.to_string()));
    }

    // Verify before parsing: an unverified payload is never touched.
    let identity = percent_decode(identity_field).ok_or(CompileError::SignatureMismatch)?;
    let identity_address =
        Address::parse(&identity).map_err(|_| CompileError::SignatureMismatch)?;
    let verifying_key = verifying_key_from_address(&identity_address)?;
    let signature_bytes = URL_SAFE_NO_PAD
        .decode(signature_field)
        .map_err(|_| CompileError::SignatureMismatch)?;
    let signature = Signature::from_slice(&signature_bytes)
        .map_err(|_| CompileError::SignatureMismatch)?;
    verify(
        &verifying_key,
        &signed_bytes(identity_field, payload_field),
        &signature,
    )?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload_field)
        .map_err(|_| CompileError::MalformedBlob("payload is not base64"))?;
    let (&mode, rest) = payload
        .split_first()
        .ok_or(CompileError::MalformedBlob("empty payload"))?;
    let body = match mode {
        PAYLOAD_PLAIN => rest.to_vec(),
        PAYLOAD_SEALED => {
            let secret =
                recipient.ok_or(CompileError::MissingRecipientKey("payload is sealed"))?;
            unseal(rest, secret)?
        }
        _ => return Err(CompileError::MalformedBlob("unknown payload mode")),
    };

    let file = parse_body(expected_document_hash, &body, mode == PAYLOAD_SEALED)?;
    debug!(
        document = file.document_hash(),
        ops = file.ops().len(),
        sealed = mode == PAYLOAD_SEALED,
        "decompiled document file"
    );
    Ok(file)
}

/// Parse a verified payload body back into a DocumentFile.
fn parse_body(document_hash: &str, body: &[u8], sealed: bool) -> CompileResult<DocumentFile> {
    if body.len() < 4 {
        return Err(CompileError::Corruption("payload shorter than its checksum"));
    }
    let content_len = body.len() - 4;
    let stored_checksum = u32::from_le_bytes([
        body[content_len],
        body[content_len + 1],
        body[content_len + 2],
        body[content_len + 3],
    ]);
    let content = &body[..content_len];
    if !verify_checksum(content, stored_checksum) {
        return Err(CompileError::Corruption("payload checksum mismatch"));
    }

    let mut r = Reader::new(content);
    let version = r.u16("payload version")?;
    if version != PAYLOAD_VERSION {
        return Err(CompileError::UnsupportedFormat(format!(
            "payload version {}",
            version
        )));
    }
    let previous = r.string("previous hash block")?;
    let table = InternTable::decode(&mut r)?;
    let op_count = r.u32("op count")?;
    let mut ops = Vec::new();
    for _ in 0..op_count {
        let record_len = r.u32("op record length")? as usize;
        let record = r.bytes(record_len, "op record")?;
        ops.push(Op::decode_interned(record, &table)?);
    }
    r.finish("compiled payload")?;

    let previous_hash_block = if previous.is_empty() {
        None
    } else {
        Some(previous)
    };
    Ok(DocumentFile::from_parts(
        document_hash,
        ops,
        previous_hash_block,
        sealed,
    ))
}
