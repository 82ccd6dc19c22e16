//! Compile / decompile error types
//!
//! Decompilation is all-or-nothing: malformed framing, unsupported format
//! markers, signature failures, and payload corruption are each fatal to the
//! call. Nothing is retried and no partially reconstructed document is ever
//! returned.

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::oplog::CodecError;

/// Result type for compile and decompile operations
pub type CompileResult<T> = Result<T, CompileError>;

/// Compile / decompile errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Blob framing is not what the format requires
    #[error("Compiled blob is malformed: {0}")]
    MalformedBlob(&'static str),

    /// Format marker or payload version is not supported
    #[error("Unsupported compiled format: {0}")]
    UnsupportedFormat(String),

    /// The blob does not verify against its embedded author identity
    #[error("Signature verification failed")]
    SignatureMismatch,

    /// A recipient key was required but not supplied
    #[error("Recipient key required: {0}")]
    MissingRecipientKey(&'static str),

    /// The sealed payload did not decrypt with the supplied key
    #[error("Sealed payload could not be decrypted")]
    Unseal,

    /// Sealing failed inside the cryptographic layer
    #[error("Payload sealing failed")]
    Seal,

    /// The authenticated payload failed its integrity checksum
    #[error("Payload corruption: {0}")]
    Corruption(&'static str),

    /// The op stream inside the payload did not decode
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<CryptoError> for CompileError {
    fn from(error: CryptoError) -> Self {
        match error {
            CryptoError::InvalidIdentity | CryptoError::BadSignature => {
                CompileError::SignatureMismatch
            }
            CryptoError::Unseal => CompileError::Unseal,
            CryptoError::Seal => CompileError::Seal,
        }
    }
}
