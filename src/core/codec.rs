//! # Codec
//!
//! This file is part of the AVRCP Codec project.
//!
//! It frames browsing-channel PDUs on a byte stream.
//!
//! The `BrowseFrameCodec` struct implements the [`Decoder`] and [`Encoder`]
//! traits from [`tokio_util::codec`], so a browsing channel can be driven with
//! `FramedRead` / `FramedWrite` from the [`tokio`] ecosystem.
//!
//! ## Responsibilities
//! - Split a byte stream into whole browse frames using the 3-byte header
//! - Refuse frames larger than the configured large capacity
//! - Write built browse envelopes to the stream

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{trace, warn};

use crate::config::{BufferConfig, BROWSE_HEADER_SIZE};
use crate::core::catalog::OpcodeClass;
use crate::core::envelope::Envelope;
use crate::core::wire::peek_u16;
use crate::error::{CodecError, Result};

#[derive(Clone, Copy, Debug)]
pub struct BrowseFrameCodec {
    max_frame_len: usize,
}

impl BrowseFrameCodec {
    pub fn new(config: &BufferConfig) -> Self {
        Self { max_frame_len: config.large_capacity }
    }

    pub fn max_frame_len(&self) -> usize {
        self.max_frame_len
    }
}

impl Default for BrowseFrameCodec {
    fn default() -> Self {
        Self::new(&BufferConfig::default())
    }
}

impl Decoder for BrowseFrameCodec {
    type Item = Bytes;
    type Error = CodecError;

    /// Decodes one frame, header included.
    ///
    /// Returns `None` until the whole frame has arrived.
    ///
    /// # Errors
    /// Returns `CodecError::BadParameter` if the declared length would exceed
    /// the maximum frame length.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        if src.len() < BROWSE_HEADER_SIZE {
            return Ok(None);
        }

        let param_len = usize::from(peek_u16(src, 1));
        let total_len = BROWSE_HEADER_SIZE + param_len;
        if total_len > self.max_frame_len {
            warn!(pdu = src[0], total_len, max = self.max_frame_len, "Oversized browse frame");
            return Err(CodecError::BadParameter("browse frame too large"));
        }

        if src.len() < total_len {
            src.reserve(total_len - src.len());
            return Ok(None); // Wait for full frame
        }

        trace!(pdu = src[0], total_len, "Decoded browse frame");
        Ok(Some(src.split_to(total_len).freeze()))
    }
}

impl Encoder<Envelope> for BrowseFrameCodec {
    type Error = CodecError;

    /// Writes a built browse envelope.
    ///
    /// # Errors
    /// Returns `CodecError::BadParameter` for envelopes of another opcode class.
    fn encode(&mut self, envelope: Envelope, dst: &mut BytesMut) -> Result<()> {
        if envelope.class() != OpcodeClass::Browse {
            return Err(CodecError::BadParameter("not a browse envelope"));
        }
        dst.extend_from_slice(envelope.as_bytes());
        Ok(())
    }
}
