//! Application layer for Huddle
//!
//! Pure session state machines and a generic runtime, so the same
//! orchestration code runs against a real WebSocket and against in-memory
//! drivers in tests.
//!
//! # Components
//!
//! - [`Session`]: observable view model (timeline, roster, connection state)
//! - [`SessionController`]: join/send/leave orchestration over one
//!   [`huddle_client::Connection`]
//! - [`Driver`]: trait for transport I/O
//! - [`Runtime`]: async loop driving the controller from [`Command`]s and
//!   driver events
//!
//! With the `transport` feature, [`WebSocketDriver`] implements [`Driver`]
//! on top of `huddle_client::transport`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod controller;
mod driver;
mod error;
mod runtime;
mod state;
mod store;

#[cfg(feature = "transport")]
mod websocket;

pub use action::SessionAction;
pub use controller::{SessionController, validate_username};
pub use driver::Driver;
pub use error::SessionError;
pub use runtime::{Command, EVENT_BURST, Runtime};
pub use state::{
    ConnectionState, Roster, Session, SystemNotice, Timeline, TimelineEntry,
    render_presence_text,
};
pub use store::Store;
#[cfg(feature = "transport")]
pub use websocket::WebSocketDriver;
