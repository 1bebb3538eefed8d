// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bit-exact encoding and decoding of the three record types.
//!
//! All fixed-size records are zero-filled before any field is written, so
//! the bytes after a short path are always NUL.

use crate::byte_order::ByteOrder;
use crate::error::{CodecError, CodecResult};
use crate::layout::{
    cmnd, dref, rref, rref_response, Field, HEADER_LEN, RESERVED_OFFSET, TAG_LEN,
};
use crate::record::{SubscriptionBatch, SubscriptionUpdate};

/// Record codec bound to one byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    order: ByteOrder,
}

impl Codec {
    pub const fn new(order: ByteOrder) -> Self {
        Self { order }
    }

    pub const fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// `"CMND\0"` followed by the path, no padding.
    pub fn encode_command(&self, path: &str) -> CodecResult<Vec<u8>> {
        let path = latin1_bytes(path)?;
        let mut buf = record(cmnd::TAG, cmnd::PATH_OFFSET);
        buf.extend_from_slice(&path);
        Ok(buf)
    }

    /// 509-byte `DREF` record.
    pub fn encode_dataref_write(&self, value: f32, path: &str) -> CodecResult<Vec<u8>> {
        let mut buf = record(dref::TAG, dref::LEN);
        self.order.put_f32(&mut buf, dref::VALUE.offset, value);
        write_path(&mut buf, dref::PATH, path)?;
        Ok(buf)
    }

    /// 413-byte `RREF` subscribe record.
    pub fn encode_dataref_subscribe(
        &self,
        frequency: i32,
        index: i32,
        path: &str,
    ) -> CodecResult<Vec<u8>> {
        let mut buf = record(rref::TAG, rref::LEN);
        self.order.put_i32(&mut buf, rref::FREQUENCY.offset, frequency);
        self.order.put_i32(&mut buf, rref::INDEX.offset, index);
        write_path(&mut buf, rref::PATH, path)?;
        Ok(buf)
    }

    /// Build a response datagram the way the simulator does.
    pub fn encode_subscription_batch(&self, updates: &[SubscriptionUpdate]) -> Vec<u8> {
        let len = rref_response::FIRST_GROUP + updates.len() * rref_response::GROUP_LEN;
        let mut buf = record(rref_response::TAG, len);
        for (i, update) in updates.iter().enumerate() {
            let group = rref_response::FIRST_GROUP + i * rref_response::GROUP_LEN;
            self.order
                .put_i32(&mut buf, group + rref_response::INDEX.offset, update.index);
            self.order
                .put_f32(&mut buf, group + rref_response::VALUE.offset, update.value);
        }
        buf
    }

    /// Parse a subscription response.
    ///
    /// Reads 8-byte `{index, value}` groups from offset 5; a trailing
    /// remainder shorter than a group is ignored.
    pub fn decode_subscription_batch(&self, buf: &[u8]) -> CodecResult<SubscriptionBatch> {
        if buf.len() < HEADER_LEN {
            return Err(CodecError::Malformed {
                len: buf.len(),
                min: HEADER_LEN,
            });
        }

        let mut found = [0u8; TAG_LEN];
        found.copy_from_slice(&buf[..TAG_LEN]);
        if &found != rref_response::TAG {
            return Err(CodecError::TagMismatch { found });
        }

        let batch = buf[rref_response::FIRST_GROUP..]
            .chunks_exact(rref_response::GROUP_LEN)
            .filter_map(|group| {
                Some(SubscriptionUpdate {
                    index: self.order.get_i32(group, rref_response::INDEX.offset)?,
                    value: self.order.get_f32(group, rref_response::VALUE.offset)?,
                })
            })
            .collect();

        Ok(batch)
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(ByteOrder::native())
    }
}

/// Zero-filled record of `len` bytes starting with `tag`.
///
/// The reserved byte stays zero; no field may overlap it.
fn record(tag: &[u8; 4], len: usize) -> Vec<u8> {
    debug_assert!(len >= HEADER_LEN);
    let mut buf = vec![0u8; len];
    buf[..TAG_LEN].copy_from_slice(tag);
    debug_assert_eq!(buf[RESERVED_OFFSET], 0);
    buf
}

fn write_path(buf: &mut [u8], field: Field, path: &str) -> CodecResult<()> {
    let bytes = latin1_bytes(path)?;
    if bytes.len() > field.width {
        return Err(CodecError::PathOverflow {
            len: bytes.len(),
            max: field.width,
        });
    }
    buf[field.offset..field.offset + bytes.len()].copy_from_slice(&bytes);
    Ok(())
}

/// One byte per char; rejects NUL and anything above U+00FF.
fn latin1_bytes(path: &str) -> CodecResult<Vec<u8>> {
    path.chars()
        .enumerate()
        .map(|(position, ch)| match u32::from(ch) {
            0 => Err(CodecError::EmbeddedNul { position }),
            code @ 1..=0xFF => Ok(code as u8),
            _ => Err(CodecError::Unrepresentable { ch, position }),
        })
        .collect()
}
