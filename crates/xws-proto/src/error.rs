// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec errors.

use thiserror::Error;

/// Errors raised while building or parsing wire records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Path does not fit the record's fixed path field.
    #[error("encoding overflow: path is {len} bytes, field holds {max}")]
    PathOverflow { len: usize, max: usize },

    /// Path contains a character outside Latin-1.
    #[error("path character {ch:?} at position {position} is not representable in 8 bits")]
    Unrepresentable { ch: char, position: usize },

    /// Path contains a NUL before its end.
    #[error("path contains an embedded NUL at position {position}")]
    EmbeddedNul { position: usize },

    /// Datagram too short to carry a response header.
    #[error("malformed response: {len} bytes, need at least {min}")]
    Malformed { len: usize, min: usize },

    /// Datagram is not a subscription response.
    #[error("unexpected record tag {found:?}")]
    TagMismatch { found: [u8; 4] },
}

pub type CodecResult<T> = Result<T, CodecError>;
