//! DocumentFile assembly, compilation, and decompilation
//!
//! The aggregate edit record for one document: an ordered op log, a chain
//! pointer to the previous compiled block, and the derived invariant text.
//! The compiler serializes a frozen log into a signed, optionally sealed
//! blob; the decompiler reverses that exactly, verifying the signature
//! before exposing anything.
//!
//! # Design Principles
//!
//! - Verification before parsing: an unverified payload is never decoded.
//! - Explicit failure over silent recovery: every malformed input is fatal.
//! - Determinism: the same file and keys compile to the same plain blob.

mod builder;
mod checksum;
mod compiler;
mod decompiler;
mod errors;
mod file;
mod framing;
mod percent;

pub use builder::DocumentFileBuilder;
pub use compiler::compile;
pub use decompiler::decompile;
pub use errors::{CompileError, CompileResult};
pub use file::DocumentFile;
pub use framing::FORMAT_MARKER;
