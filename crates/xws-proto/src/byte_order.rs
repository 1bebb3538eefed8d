// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte order of every numeric field on the wire.
//!
//! The simulator does not advertise its byte order, so the relay assumes it
//! matches the host and lets the operator invert that choice once at startup.
//! The resolved value is handed to [`crate::Codec`] and never changes.

use std::fmt;

/// Byte order applied uniformly to all `i32` / `f32` record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the machine running the relay.
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            Self::Little
        } else {
            Self::Big
        }
    }

    /// Resolve the process-wide byte order.
    ///
    /// `flip` inverts the host order instead of matching it.
    pub const fn resolve(flip: bool) -> Self {
        let native = Self::native();
        if flip {
            native.inverse()
        } else {
            native
        }
    }

    /// The opposite byte order.
    pub const fn inverse(self) -> Self {
        match self {
            Self::Little => Self::Big,
            Self::Big => Self::Little,
        }
    }

    /// Short lowercase name ("little" / "big").
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Little => "little",
            Self::Big => "big",
        }
    }

    pub(crate) fn i32_bytes(self, value: i32) -> [u8; 4] {
        match self {
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }

    pub(crate) fn f32_bytes(self, value: f32) -> [u8; 4] {
        match self {
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }

    /// Write `value` at `offset`. Caller guarantees `offset + 4 <= buf.len()`.
    pub fn put_i32(self, buf: &mut [u8], offset: usize, value: i32) {
        buf[offset..offset + 4].copy_from_slice(&self.i32_bytes(value));
    }

    /// Write `value` at `offset`. Caller guarantees `offset + 4 <= buf.len()`.
    pub fn put_f32(self, buf: &mut [u8], offset: usize, value: f32) {
        buf[offset..offset + 4].copy_from_slice(&self.f32_bytes(value));
    }

    /// Read an `i32` at `offset`, `None` if the slice is too short.
    pub fn get_i32(self, buf: &[u8], offset: usize) -> Option<i32> {
        let raw = read4(buf, offset)?;
        Some(match self {
            Self::Little => i32::from_le_bytes(raw),
            Self::Big => i32::from_be_bytes(raw),
        })
    }

    /// Read an `f32` at `offset`, `None` if the slice is too short.
    pub fn get_f32(self, buf: &[u8], offset: usize) -> Option<f32> {
        let raw = read4(buf, offset)?;
        Some(match self {
            Self::Little => f32::from_le_bytes(raw),
            Self::Big => f32::from_be_bytes(raw),
        })
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn read4(buf: &[u8], offset: usize) -> Option<[u8; 4]> {
    let end = offset.checked_add(4)?;
    buf.get(offset..end)?.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_without_flip_matches_host() {
        assert_eq!(ByteOrder::resolve(false), ByteOrder::native());
    }

    #[test]
    fn resolve_with_flip_inverts_host() {
        assert_eq!(ByteOrder::resolve(true), ByteOrder::native().inverse());
        assert_ne!(ByteOrder::resolve(true), ByteOrder::resolve(false));
    }

    #[test]
    fn put_and_get_respect_order() {
        let mut buf = [0u8; 8];
        ByteOrder::Big.put_i32(&mut buf, 0, 0x0102_0304);
        ByteOrder::Little.put_i32(&mut buf, 4, 0x0102_0304);
        assert_eq!(buf, [1, 2, 3, 4, 4, 3, 2, 1]);

        assert_eq!(ByteOrder::Big.get_i32(&buf, 0), Some(0x0102_0304));
        assert_eq!(ByteOrder::Little.get_i32(&buf, 4), Some(0x0102_0304));
    }

    #[test]
    fn float_layout() {
        let mut buf = [0u8; 4];
        ByteOrder::Big.put_f32(&mut buf, 0, 1.0);
        assert_eq!(buf, [0x3F, 0x80, 0x00, 0x00]);
        assert_eq!(ByteOrder::Big.get_f32(&buf, 0), Some(1.0));
        assert_eq!(ByteOrder::Little.get_f32(&buf, 0), Some(f32::from_le_bytes(buf)));
    }

    #[test]
    fn short_read_is_none() {
        let buf = [0u8; 6];
        assert_eq!(ByteOrder::Little.get_i32(&buf, 3), None);
        assert_eq!(ByteOrder::Little.get_f32(&buf, usize::MAX), None);
        assert!(ByteOrder::Little.get_i32(&buf, 2).is_some());
    }
}
