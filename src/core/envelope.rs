//! # Envelope
//!
//! This file is part of the AVRCP Codec project.
//!
//! It defines the [`Envelope`] that builders write into and the per-class
//! header descriptor that both the envelope and the parser consult.
//!
//! Header layouts by opcode class:
//! - Vendor: `[pdu_id][packet_type=0][param_len_hi][param_len_lo]`
//! - Browse: `[pdu_id][param_len_hi][param_len_lo]`
//! - PassThrough: `[op_id_hi][op_id_lo]`, no length field
//!
//! ## Responsibilities
//! - Select the buffer capacity for a PDU and obtain the buffer
//! - Write the class-specific header once, when the envelope is opened
//! - Append payload bytes while keeping the parameter-length field equal to
//!   the number of payload bytes present
//! - Split incoming bytes into header fields and payload

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace, warn};

use crate::config::{
    BufferConfig, BROWSE_HEADER_SIZE, OPCODE_BROWSE, PASS_THROUGH_HEADER_SIZE,
    VENDOR_HEADER_SIZE,
};
use crate::core::catalog::{OpcodeClass, PduId, ResponseCode, StatusCode};
use crate::core::wire::{patch_u16, peek_u16, put_u16, put_u8};
use crate::error::{CodecError, Result};

/// Vendor packet type for an unfragmented PDU
pub const PACKET_TYPE_SINGLE: u8 = 0x00;

/// Where the header fields sit for one opcode class
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderLayout {
    /// Width of the PDU / operation id field
    pub id_len: usize,
    /// Vendor frames carry a packet type byte after the PDU id
    pub has_packet_type: bool,
    pub has_length: bool,
}

impl HeaderLayout {
    pub const VENDOR: HeaderLayout =
        HeaderLayout { id_len: 1, has_packet_type: true, has_length: true };
    pub const BROWSE: HeaderLayout =
        HeaderLayout { id_len: 1, has_packet_type: false, has_length: true };
    pub const PASS_THROUGH: HeaderLayout =
        HeaderLayout { id_len: 2, has_packet_type: false, has_length: false };

    pub const fn for_class(class: OpcodeClass) -> HeaderLayout {
        match class {
            OpcodeClass::Vendor => Self::VENDOR,
            OpcodeClass::Browse => Self::BROWSE,
            OpcodeClass::PassThrough => Self::PASS_THROUGH,
        }
    }

    /// Payload start offset
    pub const fn header_len(&self) -> usize {
        self.id_len + self.has_packet_type as usize + if self.has_length { 2 } else { 0 }
    }

    pub const fn length_offset(&self) -> Option<usize> {
        if self.has_length {
            Some(self.id_len + self.has_packet_type as usize)
        } else {
            None
        }
    }
}

// The descriptor and the configured header sizes describe the same bytes.
const _: () = assert!(HeaderLayout::VENDOR.header_len() == VENDOR_HEADER_SIZE);
const _: () = assert!(HeaderLayout::BROWSE.header_len() == BROWSE_HEADER_SIZE);
const _: () = assert!(HeaderLayout::PASS_THROUGH.header_len() == PASS_THROUGH_HEADER_SIZE);

/// Supplies output buffers. How memory is pooled is up to the implementor.
pub trait BufferSource {
    /// Returns an empty buffer able to hold `capacity` bytes, or None when no
    /// such buffer is available.
    fn acquire(&self, capacity: usize) -> Option<BytesMut>;
}

/// Allocates every buffer from the heap
#[derive(Clone, Copy, Debug, Default)]
pub struct HeapBuffers;

impl BufferSource for HeapBuffers {
    fn acquire(&self, capacity: usize) -> Option<BytesMut> {
        Some(BytesMut::with_capacity(capacity))
    }
}

/// Refuses any request above `max_capacity`
#[derive(Clone, Copy, Debug)]
pub struct BoundedBuffers {
    pub max_capacity: usize,
}

impl BufferSource for BoundedBuffers {
    fn acquire(&self, capacity: usize) -> Option<BytesMut> {
        if capacity > self.max_capacity {
            return None;
        }
        Some(BytesMut::with_capacity(capacity))
    }
}

/// An outgoing message under construction
#[derive(Debug, Clone)]
pub struct Envelope {
    pdu: PduId,
    class: OpcodeClass,
    layout: HeaderLayout,
    is_response: bool,
    rejected: bool,
    capacity: usize,
    buf: BytesMut,
}

/// Write position of a reopened envelope
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reopened {
    /// Offset one past the last byte written
    pub end: usize,
    /// Offset of the parameter-length field, if the class has one
    pub length_at: Option<usize>,
}

impl Envelope {
    /// Opens an envelope for `pdu`, writing its header.
    ///
    /// # Errors
    /// Returns `CodecError::BufferExhausted` if `source` cannot supply a buffer
    /// of the capacity required by the PDU's class, or if that capacity cannot
    /// hold the class header.
    pub fn open_for_pdu(
        pdu: PduId,
        is_response: bool,
        config: &BufferConfig,
        source: &dyn BufferSource,
    ) -> Result<Self> {
        let class = pdu.opcode_class();
        let layout = HeaderLayout::for_class(class);
        let capacity = if pdu.needs_large_buffer(is_response) {
            config.large_capacity
        } else {
            config.small_capacity
        };
        if capacity < layout.header_len() {
            warn!(pdu = ?pdu, capacity, "Capacity below header size");
            return Err(CodecError::BufferExhausted { capacity });
        }

        let mut buf = source
            .acquire(capacity)
            .ok_or(CodecError::BufferExhausted { capacity })?;
        buf.clear();

        match class {
            OpcodeClass::Vendor => {
                put_u8(&mut buf, pdu.into());
                put_u8(&mut buf, PACKET_TYPE_SINGLE);
                put_u16(&mut buf, 0);
            }
            OpcodeClass::Browse => {
                put_u8(&mut buf, pdu.into());
                put_u16(&mut buf, 0);
            }
            OpcodeClass::PassThrough => {
                put_u16(&mut buf, u16::from(u8::from(pdu)));
            }
        }

        debug!(pdu = ?pdu, class = ?class, capacity, "Opened envelope");
        Ok(Self { pdu, class, layout, is_response, rejected: false, capacity, buf })
    }

    /// Locates the end of the written data and the length field. The header
    /// is never rewritten.
    pub fn reopen(&self) -> Reopened {
        let reopened = Reopened { end: self.buf.len(), length_at: self.layout.length_offset() };
        trace!(pdu = ?self.pdu, end = reopened.end, "Reopened envelope");
        reopened
    }

    pub fn pdu(&self) -> PduId {
        self.pdu
    }

    pub fn class(&self) -> OpcodeClass {
        self.class
    }

    pub fn layout(&self) -> HeaderLayout {
        self.layout
    }

    pub fn is_response(&self) -> bool {
        self.is_response
    }

    /// True once a rejection payload was written
    pub fn is_rejection(&self) -> bool {
        self.rejected
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total bytes written, header included
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes still available before the capacity is reached
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.buf.len())
    }

    /// Payload bytes present after the header
    pub fn param_len(&self) -> usize {
        self.buf.len() - self.layout.header_len()
    }

    /// The parameter-length field as written in the header
    pub fn declared_param_len(&self) -> Option<u16> {
        self.layout.length_offset().map(|at| peek_u16(&self.buf, at))
    }

    /// Nothing was written after the header yet
    pub fn is_fresh(&self) -> bool {
        self.param_len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn payload(&self) -> &[u8] {
        &self.buf[self.layout.header_len()..]
    }

    pub(crate) fn payload_mut(&mut self) -> &mut [u8] {
        let start = self.layout.header_len();
        &mut self.buf[start..]
    }

    /// Appends `bytes` as a unit and updates the length field.
    ///
    /// # Errors
    /// Returns `CodecError::InternalError` with a zero count if the bytes do
    /// not fit; nothing is written in that case.
    pub(crate) fn append(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.fits(bytes.len()) {
            return Err(CodecError::InternalError { processed: 0 });
        }
        self.buf.extend_from_slice(bytes);
        self.sync_length();
        Ok(())
    }

    pub(crate) fn fits(&self, len: usize) -> bool {
        len <= self.remaining() && self.param_len() + len <= usize::from(u16::MAX)
    }

    fn sync_length(&mut self) {
        let Reopened { length_at, .. } = self.reopen();
        if let Some(at) = length_at {
            let param_len = self.param_len() as u16;
            patch_u16(&mut self.buf, at, param_len);
        }
    }

    /// Replaces the payload with a single status byte.
    pub(crate) fn write_rejection(&mut self, status: StatusCode) -> Result<()> {
        if !self.is_fresh() {
            return Err(CodecError::BadParameter("rejection on a non-empty envelope"));
        }
        self.append(&[status.0])?;
        self.rejected = true;
        debug!(pdu = ?self.pdu, status = ?status, "Built rejection");
        Ok(())
    }

    /// Views the envelope as it would arrive at the peer
    pub fn to_incoming(&self) -> IncomingMessage<'_> {
        let response_code = match (self.is_response, self.rejected) {
            (false, _) => None,
            (true, true) => Some(ResponseCode::REJECTED),
            (true, false) if self.pdu == PduId::RegisterNotification => {
                Some(ResponseCode::INTERIM)
            }
            (true, false) if self.class == OpcodeClass::PassThrough => {
                Some(ResponseCode::ACCEPTED)
            }
            (true, false) => Some(ResponseCode::STABLE),
        };
        IncomingMessage { opcode: self.class.opcode(), response_code, data: &self.buf }
    }

    /// Hands the written bytes to the transport
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

/// A received message as delivered by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomingMessage<'a> {
    /// AV/C opcode, or [`OPCODE_BROWSE`] for the browsing channel
    pub opcode: u8,
    /// AV/C response code for responses on the control channel
    pub response_code: Option<ResponseCode>,
    /// Header and payload
    pub data: &'a [u8],
}

impl<'a> IncomingMessage<'a> {
    pub fn command(opcode: u8, data: &'a [u8]) -> Self {
        Self { opcode, response_code: None, data }
    }

    pub fn response(opcode: u8, response_code: ResponseCode, data: &'a [u8]) -> Self {
        Self { opcode, response_code: Some(response_code), data }
    }

    /// Browsing frames carry their status in the payload, not in a response code
    pub fn browse(data: &'a [u8]) -> Self {
        Self { opcode: OPCODE_BROWSE, response_code: None, data }
    }
}

/// Header fields of an incoming message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    /// PDU id, or the 16 bit operation id of a pass-through frame
    pub id: u16,
    pub packet_type: u8,
    pub payload: &'a [u8],
}

/// Splits `data` according to the header layout of `class`.
///
/// # Errors
/// Returns `CodecError::BadCommand` if `data` is shorter than the header.
pub fn read_header(class: OpcodeClass, data: &[u8]) -> Result<Header<'_>> {
    let layout = HeaderLayout::for_class(class);
    let header_len = layout.header_len();
    if data.len() < header_len {
        return Err(CodecError::BadCommand(data.first().copied().unwrap_or(0)));
    }

    let id = if layout.id_len == 2 { peek_u16(data, 0) } else { u16::from(data[0]) };
    let packet_type = if layout.has_packet_type { data[layout.id_len] } else { PACKET_TYPE_SINGLE };
    let available = &data[header_len..];

    let payload = match layout.length_offset() {
        Some(at) => {
            let declared = usize::from(peek_u16(data, at));
            if declared > available.len() {
                warn!(declared, available = available.len(), "Parameter length exceeds message");
                available
            } else {
                &available[..declared]
            }
        }
        None => available,
    };

    Ok(Header { id, packet_type, payload })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(pdu: PduId, is_response: bool) -> Envelope {
        Envelope::open_for_pdu(pdu, is_response, &BufferConfig::default(), &HeapBuffers).unwrap()
    }

    #[test]
    fn test_vendor_header() {
        let env = open(PduId::GetCapabilities, false);
        assert_eq!(env.as_bytes(), &[0x10, 0x00, 0x00, 0x00]);
        assert_eq!(env.capacity(), BufferConfig::default().small_capacity);
        assert!(env.is_fresh());
        assert_eq!(env.reopen(), Reopened { end: 4, length_at: Some(2) });
    }

    #[test]
    fn test_browse_header_has_no_packet_type() {
        let env = open(PduId::GetFolderItems, false);
        assert_eq!(env.as_bytes(), &[0x71, 0x00, 0x00]);
        assert_eq!(env.capacity(), BufferConfig::default().large_capacity);
        assert_eq!(env.reopen().length_at, Some(1));
    }

    #[test]
    fn test_pass_through_header() {
        let env = open(PduId::PreviousGroup, false);
        assert_eq!(env.as_bytes(), &[0x00, 0x01]);
        assert_eq!(env.declared_param_len(), None);
    }

    #[test]
    fn test_large_buffer_for_element_attributes_response() {
        let large = BufferConfig::default().large_capacity;
        assert_eq!(open(PduId::GetElementAttributes, true).capacity(), large);
        assert_ne!(open(PduId::GetElementAttributes, false).capacity(), large);
    }

    #[test]
    fn test_append_keeps_length_in_sync() {
        let mut env = open(PduId::SetAbsoluteVolume, false);
        env.append(&[0x20]).unwrap();
        assert_eq!(env.declared_param_len(), Some(1));
        assert_eq!(env.param_len(), 1);
    }

    #[test]
    fn test_append_refuses_overflow() {
        let config = BufferConfig { small_capacity: 16, large_capacity: 16 };
        let mut env =
            Envelope::open_for_pdu(PduId::GetCapabilities, true, &config, &HeapBuffers).unwrap();
        assert!(env.append(&[0u8; 13]).is_err());
        assert_eq!(env.len(), 4);
        env.append(&[0u8; 12]).unwrap();
        assert_eq!(env.remaining(), 0);
    }

    #[test]
    fn test_exhausted_source() {
        let source = BoundedBuffers { max_capacity: 1024 };
        let config = BufferConfig::default();
        let result = Envelope::open_for_pdu(PduId::GetFolderItems, true, &config, &source);
        assert_eq!(result.unwrap_err(), CodecError::BufferExhausted { capacity: 4096 });
        assert!(Envelope::open_for_pdu(PduId::GetPlayStatus, true, &config, &source).is_ok());
    }

    #[test]
    fn test_capacity_below_header() {
        let config = BufferConfig { small_capacity: 2, large_capacity: 2 };
        let result = Envelope::open_for_pdu(PduId::GetCapabilities, false, &config, &HeapBuffers);
        assert_eq!(result.unwrap_err(), CodecError::BufferExhausted { capacity: 2 });
        let result = Envelope::open_for_pdu(PduId::ChangePath, false, &config, &HeapBuffers);
        assert_eq!(result.unwrap_err(), CodecError::BufferExhausted { capacity: 2 });

        // A pass-through header is exactly two bytes
        let env = Envelope::open_for_pdu(PduId::NextGroup, true, &config, &HeapBuffers).unwrap();
        assert_eq!(env.remaining(), 0);
    }

    #[test]
    fn test_incoming_response_codes() {
        let env = open(PduId::NextGroup, true);
        assert_eq!(env.to_incoming().response_code, Some(ResponseCode::ACCEPTED));
        let env = open(PduId::GetPlayStatus, true);
        assert_eq!(env.to_incoming().response_code, Some(ResponseCode::STABLE));
        let env = open(PduId::RegisterNotification, true);
        assert_eq!(env.to_incoming().response_code, Some(ResponseCode::INTERIM));
        assert_eq!(open(PduId::NextGroup, false).to_incoming().response_code, None);
    }

    #[test]
    fn test_read_header_rejects_short_input() {
        assert!(read_header(OpcodeClass::Vendor, &[0x10, 0x00, 0x00]).is_err());
        let header = read_header(OpcodeClass::Browse, &[0x72, 0x00, 0x01, 0x04, 0xFF]).unwrap();
        assert_eq!(header.id, 0x72);
        assert_eq!(header.payload, &[0x04]);
    }
}
