//! Sealed payloads for a single recipient
//!
//! A compiled document's payload can be sealed so that only the holder of
//! the recipient's secret key can read it. Sealing uses X25519 key
//! agreement with a fresh ephemeral key per seal, HKDF-SHA256 with a domain
//! separator for key derivation, and ChaCha20-Poly1305 for authenticated
//! encryption.
//!
//! Sealed layout: `[ephemeral public key (32)][nonce (12)][ciphertext+tag]`.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use curve25519_dalek::montgomery::MontgomeryPoint;
use curve25519_dalek::scalar::Scalar;
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use super::errors::{CryptoError, CryptoResult};

/// Domain separator for sealed-payload key derivation.
const SEAL_KDF_DOMAIN: &[u8] = b"DOCUVERSE_SEAL_v1";

/// Size of the serialized ephemeral public key.
const EPHEMERAL_KEY_SIZE: usize = 32;

/// Size of the ChaCha20-Poly1305 nonce.
const NONCE_SIZE: usize = 12;

/// Size of the ChaCha20-Poly1305 authentication tag.
const AUTH_TAG_SIZE: usize = 16;

/// Fixed overhead a sealed payload adds over its plaintext.
pub const SEALED_OVERHEAD: usize = EPHEMERAL_KEY_SIZE + NONCE_SIZE + AUTH_TAG_SIZE;

/// A recipient's X25519 public key.
#[derive(Clone, PartialEq, Eq)]
pub struct RecipientPublicKey([u8; 32]);

impl RecipientPublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for RecipientPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecipientPublicKey({})", hex::encode(self.0))
    }
}

/// A recipient's X25519 secret key.
pub struct RecipientSecretKey([u8; 32]);

impl RecipientSecretKey {
    /// Generate a fresh key from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The corresponding public key.
    pub fn public_key(&self) -> RecipientPublicKey {
        let scalar = Scalar::from_bytes_mod_order(self.0);
        RecipientPublicKey(MontgomeryPoint::mul_base(&scalar).to_bytes())
    }
}

impl std::fmt::Debug for RecipientSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print secret material.
        write!(f, "RecipientSecretKey({:?})", self.public_key())
    }
}

/// Seal `plaintext` so only `recipient` can open it.
pub fn seal(plaintext: &[u8], recipient: &RecipientPublicKey) -> CryptoResult<Vec<u8>> {
    let mut ephemeral_bytes = [0u8; 32];
    OsRng.fill_bytes(&mut ephemeral_bytes);
    let ephemeral_scalar = Scalar::from_bytes_mod_order(ephemeral_bytes);
    let ephemeral_public = MontgomeryPoint::mul_base(&ephemeral_scalar).to_bytes();

    let recipient_point = MontgomeryPoint(recipient.0);
    let shared_secret = ephemeral_scalar * recipient_point;
    let key = derive_key(shared_secret.as_bytes(), &ephemeral_public, &recipient.0)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| CryptoError::Seal)?;

    let mut sealed = Vec::with_capacity(SEALED_OVERHEAD + plaintext.len());
    sealed.extend_from_slice(&ephemeral_public);
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Open a sealed payload with the recipient's secret key.
///
/// Fails on short input, a forged or corrupted ciphertext, or a key that is
/// not the one the payload was sealed for.
pub fn unseal(sealed: &[u8], secret: &RecipientSecretKey) -> CryptoResult<Vec<u8>> {
    if sealed.len() < SEALED_OVERHEAD {
        return Err(CryptoError::Unseal);
    }
    let mut ephemeral_public = [0u8; EPHEMERAL_KEY_SIZE];
    ephemeral_public.copy_from_slice(&sealed[..EPHEMERAL_KEY_SIZE]);
    let nonce_end = EPHEMERAL_KEY_SIZE + NONCE_SIZE;
    let nonce = &sealed[EPHEMERAL_KEY_SIZE..nonce_end];
    let ciphertext = &sealed[nonce_end..];

    let our_scalar = Scalar::from_bytes_mod_order(secret.0);
    let ephemeral_point = MontgomeryPoint(ephemeral_public);
    let shared_secret = our_scalar * ephemeral_point;
    let our_public = secret.public_key();
    let key = derive_key(shared_secret.as_bytes(), &ephemeral_public, &our_public.0)?;

    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Unseal)
}

/// Derive the symmetric key from the shared secret and both public halves.
fn derive_key(
    shared_secret: &[u8; 32],
    ephemeral_public: &[u8; 32],
    recipient_public: &[u8; 32],
) -> CryptoResult<[u8; 32]> {
    let hkdf = Hkdf::<Sha256>::new(Some(SEAL_KDF_DOMAIN), shared_secret);
    let mut info = Vec::with_capacity(64);
    info.extend_from_slice(ephemeral_public);
    info.extend_from_slice(recipient_public);
    let mut key = [0u8; 32];
    hkdf.expand(&info, &mut key)
        .map_err(|_| CryptoError::Seal)?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_unseal_round_trip() {
        let secret = RecipientSecretKey::generate();
        let sealed = seal(b"XanaduGreen", &secret.public_key()).unwrap();
        assert_eq!(sealed.len(), b"XanaduGreen".len() + SEALED_OVERHEAD);
        assert_eq!(unseal(&sealed, &secret).unwrap(), b"XanaduGreen");
    }

    #[test]
    fn test_empty_plaintext_round_trips() {
        let secret = RecipientSecretKey::generate();
        let sealed = seal(b"", &secret.public_key()).unwrap();
        assert_eq!(unseal(&sealed, &secret).unwrap(), b"");
    }

    #[test]
    fn test_each_seal_is_unique() {
        // Fresh ephemeral key and nonce per seal
        let secret = RecipientSecretKey::generate();
        let a = seal(b"payload", &secret.public_key()).unwrap();
        let b = seal(b"payload", &secret.public_key()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails() {
        let secret = RecipientSecretKey::generate();
        let other = RecipientSecretKey::generate();
        let sealed = seal(b"payload", &secret.public_key()).unwrap();
        assert_eq!(unseal(&sealed, &other), Err(CryptoError::Unseal));
    }

    #[test]
    fn test_corrupted_ciphertext_fails() {
        let secret = RecipientSecretKey::generate();
        let mut sealed = seal(b"payload", &secret.public_key()).unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xFF;
        assert_eq!(unseal(&sealed, &secret), Err(CryptoError::Unseal));
    }

    #[test]
    fn test_short_input_fails() {
        let secret = RecipientSecretKey::generate();
        assert_eq!(
            unseal(&[0u8; SEALED_OVERHEAD - 1], &secret),
            Err(CryptoError::Unseal)
        );
    }
}
