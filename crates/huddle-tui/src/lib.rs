//! Terminal UI for Huddle
//!
//! A thin shell over [`huddle_app::Runtime`]: it renders the observable
//! [`huddle_app::Session`] and turns keystrokes into
//! [`huddle_app::Command`]s. All session logic lives in `huddle-app`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod input;
pub mod terminal;
pub mod ui;
pub mod view;

pub use input::{InputAction, InputState, KeyInput};
pub use terminal::{TerminalError, TerminalUi};
pub use view::{View, ViewAction};
