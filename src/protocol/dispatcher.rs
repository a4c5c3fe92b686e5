//! Entry points that route a value or an incoming message to its PDU routine.
//!
//! Routing is a `match` on the PDU id inside each builder and parser; the
//! dispatcher owns the buffer sizing and the buffer source, and decides
//! whether a build call opens a new envelope or continues an existing one.

use tracing::{debug, instrument};

use crate::config::{BufferConfig, CodecConfig};
use crate::core::arena::ScratchArena;
use crate::core::catalog::{OpcodeClass, PduId};
use crate::core::envelope::{BufferSource, Envelope, HeapBuffers, IncomingMessage};
use crate::error::{CodecError, Result};
use crate::protocol::command::encode_command;
use crate::protocol::message::{Command, Parsed, Response};
use crate::protocol::response::encode_response;
use crate::protocol::{parse_command, parse_response};

pub struct Dispatcher<S: BufferSource = HeapBuffers> {
    config: BufferConfig,
    source: S,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_source(BufferConfig::default(), HeapBuffers)
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self::with_source(config.buffers.clone(), HeapBuffers)
    }
}

impl<S: BufferSource> Dispatcher<S> {
    pub fn with_source(config: BufferConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn buffer_config(&self) -> &BufferConfig {
        &self.config
    }

    /// Arena size that holds any response of the class
    pub fn scratch_capacity(&self, class: OpcodeClass) -> usize {
        match class {
            // GetElementAttributes responses may be as large as a browse.
            OpcodeClass::Browse | OpcodeClass::Vendor => self.config.large_capacity,
            OpcodeClass::PassThrough => self.config.small_capacity,
        }
    }

    /// Encodes `cmd` into `envelope`.
    ///
    /// An empty slot gets a new envelope for the command's PDU. The envelope
    /// is kept in the slot when the call succeeds or stops on a full buffer,
    /// so more entries can be added by calling again.
    ///
    /// # Errors
    /// `BadParameter` for invalid fields or an envelope opened for another
    /// PDU, `InternalError` when entries did not fit, `BufferExhausted` when
    /// no buffer could be obtained.
    #[instrument(skip(self, cmd, envelope), level = "debug")]
    pub fn build_command(&self, cmd: &Command<'_>, envelope: &mut Option<Envelope>) -> Result<()> {
        let pdu = cmd.pdu_id()?;
        self.build(pdu, false, envelope, |env| encode_command(cmd, env))
    }

    /// Encodes `rsp` into `envelope`, with the same slot handling as
    /// [`Dispatcher::build_command`].
    #[instrument(skip(self, rsp, envelope), level = "debug")]
    pub fn build_response(&self, rsp: &Response<'_>, envelope: &mut Option<Envelope>) -> Result<()> {
        let pdu = rsp.pdu_id()?;
        self.build(pdu, true, envelope, |env| encode_response(rsp, env))
    }

    /// Builds a complete command in a fresh envelope
    pub fn command(&self, cmd: &Command<'_>) -> Result<Envelope> {
        let mut envelope = None;
        self.build_command(cmd, &mut envelope)?;
        envelope.ok_or(CodecError::BadParameter("no envelope"))
    }

    /// Builds a complete response in a fresh envelope
    pub fn response(&self, rsp: &Response<'_>) -> Result<Envelope> {
        let mut envelope = None;
        self.build_response(rsp, &mut envelope)?;
        envelope.ok_or(CodecError::BadParameter("no envelope"))
    }

    fn build<F>(
        &self,
        pdu: PduId,
        is_response: bool,
        envelope: &mut Option<Envelope>,
        encode: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Envelope) -> Result<()>,
    {
        if let Some(env) = envelope.as_mut() {
            debug!(pdu = ?pdu, len = env.len(), "Continuing envelope");
            return encode(env);
        }

        let mut env = Envelope::open_for_pdu(pdu, is_response, &self.config, &self.source)?;
        let result = encode(&mut env);
        match &result {
            Ok(()) | Err(CodecError::InternalError { .. }) => *envelope = Some(env),
            Err(e) => debug!(pdu = ?pdu, error = %e, "Discarding new envelope"),
        }
        result
    }

    #[instrument(skip(self, msg), fields(opcode = msg.opcode), level = "debug")]
    pub fn parse_command<'a>(&self, msg: &IncomingMessage<'a>) -> Result<Command<'a>> {
        parse_command::parse_command(msg)
    }

    #[instrument(skip(self, msg, arena), fields(opcode = msg.opcode), level = "debug")]
    pub fn parse_response<'a>(
        &self,
        msg: &IncomingMessage<'_>,
        arena: &mut ScratchArena<'a>,
    ) -> Result<Parsed<Response<'a>>> {
        parse_response::parse_response(msg, arena)
    }
}
