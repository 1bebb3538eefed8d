// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! WebSocket protocol messages for the simulator relay.
//!
//! JSON frames, discriminated by a `header` field that names the wire record
//! the frame maps to.

use serde::{Deserialize, Serialize};
use xws_proto::{CommandRequest, DatarefSubscribeRequest, DatarefWriteRequest, Request};

/// Client → Relay messages
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "header")]
pub enum ClientMessage {
    /// Run a simulator command
    #[serde(rename = "CMND")]
    Command { path: String },

    /// Write a dataref
    #[serde(rename = "DREF")]
    DatarefWrite { path: String, data: f32 },

    /// Subscribe to (or cancel, freq <= 0) a dataref
    #[serde(rename = "RREF")]
    DatarefSubscribe { path: String, freq: i32, index: i32 },

    /// Any other header; dropped without reply
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Wire request for this message, `None` for unknown headers.
    pub fn into_request(self) -> Option<Request> {
        match self {
            Self::Command { path } => Some(CommandRequest { path }.into()),
            Self::DatarefWrite { path, data } => {
                Some(DatarefWriteRequest { path, value: data }.into())
            }
            Self::DatarefSubscribe { path, freq, index } => Some(
                DatarefSubscribeRequest {
                    frequency: freq,
                    index,
                    path,
                }
                .into(),
            ),
            Self::Unknown => None,
        }
    }
}

/// Relay → Client messages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "header")]
pub enum ServerMessage {
    /// Telemetry batch as `[index, value]` pairs, in datagram order
    #[serde(rename = "RREF")]
    Telemetry { data: Vec<(i32, f32)> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_command() {
        let json = r#"{"header": "CMND", "path": "sim/operation/pause_toggle"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Command {
                path: "sim/operation/pause_toggle".into()
            }
        );
    }

    #[test]
    fn parse_dataref_write_accepts_integers() {
        let json = r#"{"header": "DREF", "path": "sim/cockpit/electrical/battery_on", "data": 1}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg.into_request() {
            Some(Request::DatarefWrite(r)) => {
                assert_eq!(r.path, "sim/cockpit/electrical/battery_on");
                assert_eq!(r.value, 1.0);
            }
            other => panic!("Expected DatarefWrite, got {other:?}"),
        }
    }

    #[test]
    fn parse_subscribe() {
        let json = r#"{"header":"RREF","freq":5,"index":42,"path":"sim/test/var"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg.into_request(),
            Some(Request::DatarefSubscribe(DatarefSubscribeRequest {
                frequency: 5,
                index: 42,
                path: "sim/test/var".into(),
            }))
        );
    }

    #[test]
    fn unknown_header_maps_to_nothing() {
        let json = r#"{"header": "DATA", "path": "x"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg, ClientMessage::Unknown);
        assert!(msg.into_request().is_none());
    }

    #[test]
    fn missing_fields_are_errors() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"path": "x"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"header": "DREF", "path": "x"}"#).is_err());
        assert!(
            serde_json::from_str::<ClientMessage>(r#"{"header": "RREF", "freq": 1.5, "index": 1, "path": "x"}"#)
                .is_err()
        );
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn serialize_telemetry() {
        let msg = ServerMessage::Telemetry {
            data: vec![(42, 3.5), (7, -1.0), (42, 0.25)],
        };
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"header":"RREF","data":[[42,3.5],[7,-1.0],[42,0.25]]}"#
        );
    }
}
