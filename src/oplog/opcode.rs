//! Stable opcodes for the edit vocabulary
//!
//! Each operation carries a one-byte opcode fixed for the life of the wire
//! format. Byte 0x00 is reserved and never appears in a valid op stream;
//! unassigned bytes decode to `None` and are fatal to log parsing.

use serde::Serialize;

/// Operation opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum OpCode {
    /// Reserved, never emitted
    Reserved = 0x00,
    /// Copy a variant span to a destination offset
    CopyVariant = 0x01,
    /// Delete a variant span from the rendered view
    DeleteVariant = 0x02,
    /// Insert text into the invariant stream
    PutInvariantText = 0x03,
    /// Insert a media reference into the invariant stream
    PutInvariantMedia = 0x04,
    /// Attach an overlay set to a variant span
    PutOverlay = 0x05,
}

impl OpCode {
    /// Convert from the wire byte, returning `None` for unassigned values.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(OpCode::Reserved),
            0x01 => Some(OpCode::CopyVariant),
            0x02 => Some(OpCode::DeleteVariant),
            0x03 => Some(OpCode::PutInvariantText),
            0x04 => Some(OpCode::PutInvariantMedia),
            0x05 => Some(OpCode::PutOverlay),
            _ => None,
        }
    }

    /// Convert to the wire byte.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
