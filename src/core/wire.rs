//! # Wire
//!
//! Big-endian scalar and byte-array primitives shared by the builders and
//! parsers.
//!
//! Writers append to any [`BufMut`] and never fail; the envelope checks
//! capacity before a builder writes. Readers consume a byte slice and report
//! truncation instead of panicking, since their input comes from the peer.

use bytes::{Buf, BufMut};

use crate::error::{CodecError, Result};

/// Width of the AVRCP company id field
pub const COMPANY_ID_LEN: usize = 3;

/// Width of a browsing UID
pub const UID_LEN: usize = 8;

pub fn put_u8<B: BufMut>(dst: &mut B, value: u8) {
    dst.put_u8(value);
}

pub fn put_u16<B: BufMut>(dst: &mut B, value: u16) {
    dst.put_u16(value);
}

pub fn put_u32<B: BufMut>(dst: &mut B, value: u32) {
    dst.put_u32(value);
}

pub fn put_u64<B: BufMut>(dst: &mut B, value: u64) {
    dst.put_u64(value);
}

pub fn put_bytes<B: BufMut>(dst: &mut B, value: &[u8]) {
    dst.put_slice(value);
}

/// Writes the low 24 bits of `company_id`
pub fn put_company_id<B: BufMut>(dst: &mut B, company_id: u32) {
    dst.put_uint(u64::from(company_id & 0x00FF_FFFF), COMPANY_ID_LEN);
}

/// Overwrites a big-endian u16 already present in `buf`
pub fn patch_u16(buf: &mut [u8], at: usize, value: u16) {
    buf[at..at + 2].copy_from_slice(&value.to_be_bytes());
}

/// Reads a big-endian u16 at a fixed offset of `buf`
pub fn peek_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([buf[at], buf[at + 1]])
}

/// Cursor over peer-supplied bytes
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn need(&self, len: usize) -> Result<()> {
        if self.buf.remaining() < len {
            return Err(CodecError::BadParameter("message truncated"));
        }
        Ok(())
    }

    pub fn u8(&mut self) -> Result<u8> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn u16(&mut self) -> Result<u16> {
        self.need(2)?;
        Ok(self.buf.get_u16())
    }

    pub fn u32(&mut self) -> Result<u32> {
        self.need(4)?;
        Ok(self.buf.get_u32())
    }

    pub fn u64(&mut self) -> Result<u64> {
        self.need(UID_LEN)?;
        Ok(self.buf.get_u64())
    }

    pub fn company_id(&mut self) -> Result<u32> {
        self.need(COMPANY_ID_LEN)?;
        Ok(self.buf.get_uint(COMPANY_ID_LEN) as u32)
    }

    /// Borrows the next `len` bytes without copying
    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.need(len)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    /// Borrows up to `len` bytes; a short tail is returned as-is
    pub fn bytes_up_to(&mut self, len: usize) -> &'a [u8] {
        let len = len.min(self.buf.len());
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        head
    }

    pub fn fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }
}
