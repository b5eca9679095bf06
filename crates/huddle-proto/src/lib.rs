//! Huddle wire protocol
//!
//! The protocol is deliberately minimal: the server pushes JSON frames
//! discriminated by a `type` field (`history`, `message`, `user_joined`,
//! `user_left`) and the client sends a single untagged shape,
//! `{"message": <text>}`. There is no acknowledgement, heartbeat, or
//! negotiation phase; identity is bound by the connection endpoint.
//!
//! # Components
//!
//! - [`ChatEvent`]: typed view of every inbound frame
//! - [`decode`] / [`encode`]: the only conversions between wire text and types
//! - [`Timestamp`]: server-asserted instant, kept verbatim
//! - [`DecodeError`]: malformed or unknown frames
//!
//! # Invariants
//!
//! Decoding is total over `&str`: any input yields either an event or a
//! [`DecodeError`], never a panic. The caller decides what to do with a bad
//! frame.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
pub mod errors;
pub mod event;
pub mod timestamp;

pub use codec::{decode, encode};
pub use errors::DecodeError;
pub use event::{ChatEvent, Message, MessageId, OutboundMessage, PresenceKind};
pub use timestamp::Timestamp;
