//! # Protocol Module
//!
//! This file is part of the AVRCP Codec project.
//!
//! It provides the typed message layer on top of the core wire components:
//! the command and response values, the per-PDU builders and parsers, and
//! the dispatcher that routes between them.
//!
//! ## Components
//! - `types` and `message`: list entry records, `Command`, `Response` and `Parsed`
//! - `command` and `response`: builders that append to an `Envelope`
//! - `parse_command` and `parse_response`: decoders for incoming messages
//! - `dispatcher`: the build and parse entry points
pub mod types;
pub mod message;
pub(crate) mod accumulate;
pub mod command;
pub mod response;
pub mod parse_command;
pub mod parse_response;
pub mod dispatcher;

#[cfg(test)]
mod tests;
