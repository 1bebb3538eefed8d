// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Request and response values carried by the wire records.
//!
//! These are built once, encoded or decoded once, then dropped.

use crate::codec::Codec;
use crate::error::CodecResult;
use crate::layout::RecordTag;

/// Invoke a named, argument-less simulator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub path: String,
}

/// Set a dataref to an absolute value.
#[derive(Debug, Clone, PartialEq)]
pub struct DatarefWriteRequest {
    pub path: String,
    pub value: f32,
}

/// Start (frequency > 0) or cancel (frequency <= 0) periodic updates of a dataref.
///
/// `index` is chosen by the client and echoed back in every update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatarefSubscribeRequest {
    pub frequency: i32,
    pub index: i32,
    pub path: String,
}

impl DatarefSubscribeRequest {
    pub fn is_cancel(&self) -> bool {
        self.frequency <= 0
    }
}

/// Any outbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Command(CommandRequest),
    DatarefWrite(DatarefWriteRequest),
    DatarefSubscribe(DatarefSubscribeRequest),
}

impl Request {
    pub fn tag(&self) -> RecordTag {
        match self {
            Self::Command(_) => RecordTag::Command,
            Self::DatarefWrite(_) => RecordTag::DatarefWrite,
            Self::DatarefSubscribe(_) => RecordTag::DatarefSubscribe,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Command(r) => &r.path,
            Self::DatarefWrite(r) => &r.path,
            Self::DatarefSubscribe(r) => &r.path,
        }
    }

    /// Encode with the given codec into a ready-to-send datagram.
    pub fn encode(&self, codec: &Codec) -> CodecResult<Vec<u8>> {
        match self {
            Self::Command(r) => codec.encode_command(&r.path),
            Self::DatarefWrite(r) => codec.encode_dataref_write(r.value, &r.path),
            Self::DatarefSubscribe(r) => {
                codec.encode_dataref_subscribe(r.frequency, r.index, &r.path)
            }
        }
    }
}

impl From<CommandRequest> for Request {
    fn from(r: CommandRequest) -> Self {
        Self::Command(r)
    }
}

impl From<DatarefWriteRequest> for Request {
    fn from(r: DatarefWriteRequest) -> Self {
        Self::DatarefWrite(r)
    }
}

impl From<DatarefSubscribeRequest> for Request {
    fn from(r: DatarefSubscribeRequest) -> Self {
        Self::DatarefSubscribe(r)
    }
}

/// One telemetry sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubscriptionUpdate {
    pub index: i32,
    pub value: f32,
}

/// Updates extracted from a single response datagram, in datagram order.
///
/// Indices are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionBatch {
    updates: Vec<SubscriptionUpdate>,
}

impl SubscriptionBatch {
    pub fn new(updates: Vec<SubscriptionUpdate>) -> Self {
        Self { updates }
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn as_slice(&self) -> &[SubscriptionUpdate] {
        &self.updates
    }

    /// `(index, value)` pairs, as forwarded to clients.
    pub fn to_pairs(&self) -> Vec<(i32, f32)> {
        self.updates.iter().map(|u| (u.index, u.value)).collect()
    }
}

impl FromIterator<SubscriptionUpdate> for SubscriptionBatch {
    fn from_iter<I: IntoIterator<Item = SubscriptionUpdate>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
