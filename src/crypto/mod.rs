//! Authorship and confidentiality primitives
//!
//! Ed25519 signing keys whose public halves double as docuverse identity
//! addresses, and X25519 sealed payloads for compiling a document that only
//! one recipient can read. All key material is passed explicitly; nothing
//! here touches ambient state or a key store.

mod errors;
mod sealed;
mod signing;

pub use errors::{CryptoError, CryptoResult};
pub use sealed::{seal, unseal, RecipientPublicKey, RecipientSecretKey, SEALED_OVERHEAD};
pub use signing::{author_address, verify, verifying_key_from_address, AuthorKey};
