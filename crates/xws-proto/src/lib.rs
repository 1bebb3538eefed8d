// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec for the X-Plane legacy UDP records used by the xws relay.
//!
//! Three fixed-layout records are supported:
//!
//! - `CMND`: run a simulator command
//! - `DREF`: write a dataref
//! - `RREF`: subscribe to a dataref, and the matching telemetry response
//!
//! # Example
//!
//! ```
//! use xws_proto::{ByteOrder, Codec};
//!
//! let codec = Codec::new(ByteOrder::resolve(false));
//! let datagram = codec
//!     .encode_dataref_subscribe(5, 42, "sim/flightmodel/position/indicated_airspeed")
//!     .unwrap();
//! assert_eq!(datagram.len(), 413);
//! assert_eq!(&datagram[..4], b"RREF");
//! ```

pub mod byte_order;
pub mod codec;
pub mod error;
pub mod layout;
pub mod record;

pub use byte_order::ByteOrder;
pub use codec::Codec;
pub use error::{CodecError, CodecResult};
pub use layout::{peek_tag, RecordTag};
pub use record::{
    CommandRequest, DatarefSubscribeRequest, DatarefWriteRequest, Request, SubscriptionBatch,
    SubscriptionUpdate,
};
