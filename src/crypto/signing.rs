//! Author signing keys and identity addresses
//!
//! Every compiled document is signed by its author's Ed25519 key. The
//! author's identity in the docuverse is itself a tumbler address derived
//! from the public key: network segment `1` followed by the 32 verifying-key
//! bytes, one segment each. The key is therefore recoverable from the
//! identity, which is what lets a decompiler verify a blob against nothing
//! but the blob itself.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use crate::address::Address;

use super::errors::{CryptoError, CryptoResult};

/// Network segment prefixed to every author identity address.
const IDENTITY_NETWORK: u64 = 1;

/// An author's Ed25519 signing key.
pub struct AuthorKey {
    signing: SigningKey,
}

impl AuthorKey {
    /// Generate a fresh key from the operating system RNG.
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::generate(&mut OsRng),
        }
    }

    /// Reconstruct a key from its 32 secret bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(bytes),
        }
    }

    /// The corresponding verifying (public) key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing.verifying_key()
    }

    /// The author's public-key-derived identity address.
    pub fn author_address(&self) -> Address {
        author_address(&self.verifying_key())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing.sign(message)
    }
}

impl std::fmt::Debug for AuthorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print secret material; the public half identifies the key.
        write!(
            f,
            "AuthorKey({})",
            hex::encode(self.verifying_key().as_bytes())
        )
    }
}

/// Derive the identity address for a verifying key: `1.b0.b1.….b31`.
pub fn author_address(key: &VerifyingKey) -> Address {
    let mut segments = Vec::with_capacity(33);
    segments.push(IDENTITY_NETWORK);
    segments.extend(key.as_bytes().iter().map(|&b| u64::from(b)));
    Address::new(segments).expect("identity address always has segments")
}

/// Recover the verifying key from an identity address.
///
/// Fails if the address does not have the `1.` prefix followed by exactly
/// 32 byte-valued segments, or if the bytes are not a valid Ed25519 point.
pub fn verifying_key_from_address(addr: &Address) -> CryptoResult<VerifyingKey> {
    let segments = addr.segments();
    if segments.len() != 33 || segments[0] != IDENTITY_NETWORK || addr.has_span() {
        return Err(CryptoError::InvalidIdentity);
    }
    let mut bytes = [0u8; 32];
    for (slot, &segment) in bytes.iter_mut().zip(&segments[1..]) {
        *slot = u8::try_from(segment).map_err(|_| CryptoError::InvalidIdentity)?;
    }
    VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidIdentity)
}

/// Verify `signature` over `message` against `key`.
pub fn verify(key: &VerifyingKey, message: &[u8], signature: &Signature) -> CryptoResult<()> {
    key.verify(message, signature)
        .map_err(|_| CryptoError::BadSignature)
}
