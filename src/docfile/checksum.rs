//! CRC32 integrity checksum for compiled payloads
//!
//! The signature authenticates a compiled blob end to end; the payload
//! additionally carries a CRC32 over its body so that corruption inside an
//! otherwise well-framed payload is reported as corruption, not as a codec
//! failure deep in the op stream.

use crc32fast::Hasher;

/// Compute a CRC32 (IEEE) checksum over `data`. Deterministic.
pub(crate) fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// True if `data` checksums to `expected`.
pub(crate) fn verify_checksum(data: &[u8], expected: u32) -> bool {
    compute_checksum(data) == expected
}
