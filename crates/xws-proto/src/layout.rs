// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record layout table for the legacy UDP protocol.
//!
//! Every record starts with a 4-byte ASCII tag and one reserved byte. The tag
//! and the total length fully determine where the remaining fields live:
//!
//! ```text
//! CMND  "CMND" 00 path...                                  (5 + len(path))
//! DREF  "DREF" 00 f32 value @5 | path @9..509 (NUL-padded)  (509)
//! RREF  "RREF" 00 i32 freq @5 | i32 index @9 | path @13..413 (413)
//! RREF  "RREF" 00 { i32 index, f32 value } * n @5..         (5 + 8n), response
//! ```
//!
//! Encoders and the decoder both read offsets from here, never from literals.

/// Length of the ASCII record tag.
pub const TAG_LEN: usize = 4;

/// Offset of the reserved byte following the tag (always zero on encode).
pub const RESERVED_OFFSET: usize = 4;

/// Tag plus reserved byte: the smallest well-formed record prefix.
pub const HEADER_LEN: usize = 5;

/// A fixed-width field inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub offset: usize,
    pub width: usize,
}

impl Field {
    pub const fn new(offset: usize, width: usize) -> Self {
        Self { offset, width }
    }

    /// One past the last byte of the field.
    pub const fn end(self) -> usize {
        self.offset + self.width
    }
}

/// Command invocation: tag, NUL, then the unpadded path.
pub mod cmnd {
    pub const TAG: &[u8; 4] = b"CMND";
    /// Path bytes start right after the NUL separator.
    pub const PATH_OFFSET: usize = super::HEADER_LEN;
}

/// Dataref write.
pub mod dref {
    use super::Field;

    pub const TAG: &[u8; 4] = b"DREF";
    pub const LEN: usize = 509;
    pub const VALUE: Field = Field::new(5, 4);
    pub const PATH: Field = Field::new(9, LEN - 9);
}

/// Dataref subscribe request.
pub mod rref {
    use super::Field;

    pub const TAG: &[u8; 4] = b"RREF";
    pub const LEN: usize = 413;
    pub const FREQUENCY: Field = Field::new(5, 4);
    pub const INDEX: Field = Field::new(9, 4);
    pub const PATH: Field = Field::new(13, LEN - 13);
}

/// Subscription response (simulator to relay). Same tag as the request.
pub mod rref_response {
    use super::Field;

    pub const TAG: &[u8; 4] = super::rref::TAG;
    /// First `{index, value}` group.
    pub const FIRST_GROUP: usize = super::HEADER_LEN;
    pub const GROUP_LEN: usize = 8;
    /// Offsets relative to the start of a group.
    pub const INDEX: Field = Field::new(0, 4);
    pub const VALUE: Field = Field::new(4, 4);
}

/// Kind of record, as identified by its leading tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordTag {
    Command,
    DatarefWrite,
    DatarefSubscribe,
}

impl RecordTag {
    pub const fn as_bytes(self) -> &'static [u8; 4] {
        match self {
            Self::Command => cmnd::TAG,
            Self::DatarefWrite => dref::TAG,
            Self::DatarefSubscribe => rref::TAG,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Command => "CMND",
            Self::DatarefWrite => "DREF",
            Self::DatarefSubscribe => "RREF",
        }
    }

    pub fn from_bytes(tag: &[u8]) -> Option<Self> {
        match tag {
            b"CMND" => Some(Self::Command),
            b"DREF" => Some(Self::DatarefWrite),
            b"RREF" => Some(Self::DatarefSubscribe),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecordTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identify a datagram by its first four bytes.
pub fn peek_tag(datagram: &[u8]) -> Option<RecordTag> {
    datagram.get(..TAG_LEN).and_then(RecordTag::from_bytes)
}
