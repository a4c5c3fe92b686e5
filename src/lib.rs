//! # AVRCP Codec
//! This file is part of the AVRCP Codec project.
//!
//! It builds and parses the protocol data units of the Bluetooth AV/C Remote
//! Control Profile for the vendor-dependent, pass-through and browsing
//! channels.
//!
//! The main components include:
//! - Core: wire primitives, the PDU catalog, envelopes, the scratch arena and
//!   the browsing frame codec
//! - Protocol: typed commands and responses, builders, parsers and dispatch
//! - Utils: logging setup
//!
//! Builders accumulate: a list PDU can be filled by several calls on the same
//! envelope. Parsers copy variable-length text into a caller-owned scratch
//! arena and report how far they got when it runs out.
//!
//! ```rust
//! use avrcp_codec::protocol::dispatcher::Dispatcher;
//! use avrcp_codec::protocol::message::Command;
//! use avrcp_codec::core::catalog::CapabilityId;
//!
//! let dispatcher = Dispatcher::new();
//! let env = dispatcher
//!     .command(&Command::GetCapabilities { capability_id: CapabilityId::EVENTS_SUPPORTED })
//!     .unwrap();
//! assert_eq!(env.as_bytes(), &[0x10, 0x00, 0x00, 0x01, 0x03]);
//!
//! let parsed = dispatcher.parse_command(&env.to_incoming()).unwrap();
//! assert_eq!(parsed, Command::GetCapabilities { capability_id: CapabilityId::EVENTS_SUPPORTED });
//! ```
pub mod config;
pub mod error;

pub mod core {
    pub mod arena;
    pub mod catalog;
    pub mod codec;
    pub mod envelope;
    pub mod wire;
}

pub mod protocol; // typed messages, builders, parsers
pub mod utils;    // logging

pub use config::*;
pub use error::*;
pub use crate::core::arena::ScratchArena;
pub use crate::core::catalog::{OpcodeClass, PduId};
pub use crate::core::codec::BrowseFrameCodec;
pub use crate::core::envelope::{BufferSource, Envelope, IncomingMessage};
pub use protocol::dispatcher::Dispatcher;
pub use protocol::message::{Command, Parsed, Response};
