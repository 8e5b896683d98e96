//! # Parlor
//!
//! An interactive terminal client for a topic-based publish/subscribe
//! bus, presented as a chatroom: enter a named room (a bus topic), see
//! what others publish to it, publish your own lines.
//!
//! The heart of the crate is one event loop ([`pump::run`]) that
//! serializes three independently arriving streams — typed commands,
//! delivered messages, and termination signals — into a single state
//! machine ([`Room`]) governing room membership and message flow. All
//! room state lives on that one task; the terminal reader and the bus
//! delivery path only ever talk to it through channels.
//!
//! # Key types
//!
//! - [`Room`] — membership state machine and command handlers
//! - [`pump::run`] — the event loop
//! - [`reader::read_commands`] — the terminal command source
//! - [`Config`] — process configuration

pub mod config;
pub mod prompt;
pub mod pump;
pub mod reader;
pub mod room;

pub use config::Config;
pub use room::{Room, RoomError, RoomStatus};
