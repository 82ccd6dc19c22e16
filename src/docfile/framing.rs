//! Compiled blob framing
//!
//! A compiled document is a newline-delimited text blob of exactly four
//! fields, in fixed order:
//!
//! ```text
//! field 0  format marker      "docuverse-1"
//! field 1  author identity    percent-encoded author address string
//! field 2  signature          base64url (no pad) Ed25519 signature
//! field 3  payload            base64url (no pad) payload bytes
//! ```
//!
//! The signature covers fields 0, 1, and 3 exactly as they appear in the
//! blob, separators included, so any mutation or truncation anywhere in the
//! blob fails verification. The payload's first byte selects the plain or
//! sealed body layout; the two layouts are distinct and chosen by the
//! caller at compile time.

/// Format/version marker, field 0 of every compiled blob.
pub const FORMAT_MARKER: &str = "docuverse-1";

/// Separator joining the blob fields.
pub(crate) const FIELD_SEPARATOR: char = '\n';

/// A compiled blob has exactly this many fields.
pub(crate) const FIELD_COUNT: usize = 4;

/// Version of the binary payload body layout.
pub(crate) const PAYLOAD_VERSION: u16 = 1;

/// Payload mode byte: plain body follows.
pub(crate) const PAYLOAD_PLAIN: u8 = 0x00;

/// Payload mode byte: sealed body follows.
pub(crate) const PAYLOAD_SEALED: u8 = 0x01;

/// The exact bytes the author signs: marker, identity field, payload field.
pub(crate) fn signed_bytes(identity_field: &str, payload_field: &str) -> Vec<u8> {
    let mut message =
        Vec::with_capacity(FORMAT_MARKER.len() + identity_field.len() + payload_field.len() + 2);
    message.extend_from_slice(FORMAT_MARKER.as_bytes());
    message.push(FIELD_SEPARATOR as u8);
    message.extend_from_slice(identity_field.as_bytes());
    message.push(FIELD_SEPARATOR as u8);
    message.extend_from_slice(payload_field.as_bytes());
    message
}
