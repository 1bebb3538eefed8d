// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message classification between the two transports.
//!
//! Pure functions: a client frame becomes (at most) one wire request, and a
//! simulator datagram becomes (at most) one JSON telemetry frame. The I/O
//! side lives in [`crate::bridge`].

use crate::protocol::{ClientMessage, ServerMessage};
use thiserror::Error;
use xws_proto::{peek_tag, Codec, RecordTag, Request, SubscriptionBatch};

/// Why a client frame was not forwarded.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("malformed client message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("cannot encode {tag} for '{path}': {source}")]
    Encode {
        tag: RecordTag,
        path: String,
        #[source]
        source: xws_proto::CodecError,
    },
}

/// Parse a client frame. `Ok(None)` means an unrecognized header.
pub fn parse_client_frame(text: &str) -> Result<Option<Request>, DispatchError> {
    let msg: ClientMessage = serde_json::from_str(text)?;
    Ok(msg.into_request())
}

/// Encode a request into the datagram sent to the simulator.
pub fn encode_request(codec: &Codec, request: &Request) -> Result<Vec<u8>, DispatchError> {
    request.encode(codec).map_err(|source| DispatchError::Encode {
        tag: request.tag(),
        path: request.path().to_string(),
        source,
    })
}

/// JSON frame for a simulator datagram.
///
/// `None` unless the datagram is tagged `RREF`. A response too short to
/// decode counts as zero updates and still yields a frame.
pub fn telemetry_frame(codec: &Codec, datagram: &[u8]) -> Option<String> {
    if peek_tag(datagram) != Some(RecordTag::DatarefSubscribe) {
        return None;
    }

    let batch = codec.decode_subscription_batch(datagram).unwrap_or_else(|e| {
        tracing::debug!("Treating telemetry datagram as empty: {}", e);
        SubscriptionBatch::default()
    });
    tracing::trace!("Decoded {} telemetry update(s)", batch.len());

    let msg = ServerMessage::Telemetry {
        data: batch.to_pairs(),
    };
    match serde_json::to_string(&msg) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize telemetry: {}", e);
            None
        }
    }
}

/// Printable dump of a datagram for debug logs.
///
/// NUL shows as `0`, other non-printable bytes as `?`.
pub fn preview(datagram: &[u8]) -> String {
    datagram
        .iter()
        .map(|&b| match b {
            0 => '0',
            32..=126 => b as char,
            _ => '?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xws_proto::{ByteOrder, SubscriptionUpdate};

    const CODEC: Codec = Codec::new(ByteOrder::Little);

    #[test]
    fn subscribe_frame_encodes_rref() {
        let request =
            parse_client_frame(r#"{"header":"RREF","freq":5,"index":42,"path":"sim/test/var"}"#)
                .unwrap()
                .unwrap();
        let datagram = encode_request(&CODEC, &request).unwrap();
        assert_eq!(datagram.len(), 413);
        assert_eq!(&datagram[..4], b"RREF");
        assert_eq!(&datagram[5..9], &5i32.to_le_bytes());
        assert_eq!(&datagram[9..13], &42i32.to_le_bytes());
    }

    #[test]
    fn unknown_header_is_ignored() {
        assert!(parse_client_frame(r#"{"header":"NOPE"}"#).unwrap().is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_client_frame("{header:"),
            Err(DispatchError::Malformed(_))
        ));
    }

    #[test]
    fn overflow_is_reported_with_tag() {
        let text = format!(
            r#"{{"header":"DREF","data":1.0,"path":"{}"}}"#,
            "a".repeat(501)
        );
        let request = parse_client_frame(&text).unwrap().unwrap();
        let err = encode_request(&CODEC, &request).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Encode {
                tag: RecordTag::DatarefWrite,
                ..
            }
        ));
    }

    #[test]
    fn telemetry_frame_for_response() {
        let mut datagram = b"RREF\0".to_vec();
        datagram.extend_from_slice(&42i32.to_le_bytes());
        datagram.extend_from_slice(&3.5f32.to_le_bytes());
        assert_eq!(
            telemetry_frame(&CODEC, &datagram).as_deref(),
            Some(r#"{"header":"RREF","data":[[42,3.5]]}"#)
        );
    }

    #[test]
    fn telemetry_frame_preserves_order() {
        let datagram = CODEC.encode_subscription_batch(&[
            SubscriptionUpdate { index: 9, value: 1.5 },
            SubscriptionUpdate { index: 2, value: 2.5 },
        ]);
        assert_eq!(
            telemetry_frame(&CODEC, &datagram).as_deref(),
            Some(r#"{"header":"RREF","data":[[9,1.5],[2,2.5]]}"#)
        );
    }

    #[test]
    fn non_rref_datagrams_yield_nothing() {
        assert!(telemetry_frame(&CODEC, b"DREF\0\0\0\0\0\0\0\0\0").is_none());
        assert!(telemetry_frame(&CODEC, b"CMND\0sim/x").is_none());
        assert!(telemetry_frame(&CODEC, b"RRE").is_none());
        assert!(telemetry_frame(&CODEC, b"").is_none());
    }

    #[test]
    fn rref_without_complete_group_yields_empty_frame() {
        let empty = Some(r#"{"header":"RREF","data":[]}"#);
        assert_eq!(telemetry_frame(&CODEC, b"RREF\0").as_deref(), empty);
        assert_eq!(telemetry_frame(&CODEC, b"RREF\0\x01\x02").as_deref(), empty);
        assert_eq!(telemetry_frame(&CODEC, b"RREF").as_deref(), empty);
    }

    #[test]
    fn preview_masks_binary() {
        assert_eq!(preview(b"RREF\0\x05\xff"), "RREF0??");
    }
}
