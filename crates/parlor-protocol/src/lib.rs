//! Protocol layer for Parlor.
//!
//! This crate defines the two "languages" the client speaks:
//!
//! - **Commands** ([`Command`], [`parse`]) — the single-character
//!   grammar typed at the terminal, parsed into a closed enum so the
//!   dispatcher can match exhaustively.
//! - **Frames** ([`Frame`]) — the messages exchanged with the bus:
//!   subscribe, publish, and deliver.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how frames are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`], [`ParseError`]).
//!
//! The protocol layer knows nothing about connections, rooms, or the
//! event loop — it only parses and serializes.

mod command;
mod error;
mod frame;

pub use command::{parse, Command};
pub use error::{ParseError, ProtocolError};
#[cfg(feature = "json")]
pub use frame::JsonCodec;
pub use frame::{Codec, Frame};
