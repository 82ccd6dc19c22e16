//! Cryptographic error types

use thiserror::Error;

/// Result type for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Cryptographic errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The author identity does not encode a valid verifying key
    #[error("Author identity does not encode a valid verifying key")]
    InvalidIdentity,

    /// Signature bytes are malformed or do not verify
    #[error("Signature verification failed")]
    BadSignature,

    /// A sealed payload is too short, malformed, or fails authentication
    #[error("Sealed payload could not be decrypted")]
    Unseal,

    /// Sealing failed inside the AEAD layer
    #[error("Payload sealing failed")]
    Seal,
}
