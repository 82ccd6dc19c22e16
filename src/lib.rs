//! docuverse - addressing, editing, and durable encoding for versioned
//! hypertext documents
//!
//! Every structural element is named by a hierarchical tumbler address, and
//! every edit to a document's canonical content is recorded as an
//! append-only, cryptographically signed operation log rather than an
//! in-place mutation.

pub mod address;
pub mod crypto;
pub mod docfile;
pub mod oplog;
pub mod overlay;
pub mod span;
