//! Incremental list encoding.
//!
//! A list PDU may be built by several calls on the same envelope. The first
//! call writes the fixed prefix with a zero count; every call appends whole
//! entries and bumps the count in place. Count and parameter length are
//! updated together after each entry, so the envelope is well-formed between
//! any two calls and after any error.

use tracing::{debug, warn};

use crate::core::envelope::Envelope;
use crate::core::wire::{patch_u16, peek_u16};
use crate::error::{CodecError, Result};

/// Location and width of a list count inside the payload
#[derive(Clone, Copy, Debug)]
pub(crate) enum CountField {
    U8(usize),
    U16(usize),
}

impl CountField {
    fn read(&self, payload: &[u8]) -> usize {
        match *self {
            CountField::U8(at) => usize::from(payload[at]),
            CountField::U16(at) => usize::from(peek_u16(payload, at)),
        }
    }

    fn write(&self, payload: &mut [u8], count: usize) {
        match *self {
            CountField::U8(at) => payload[at] = count as u8,
            CountField::U16(at) => patch_u16(payload, at, count as u16),
        }
    }

    fn max(&self) -> usize {
        match self {
            CountField::U8(_) => usize::from(u8::MAX),
            CountField::U16(_) => usize::from(u16::MAX),
        }
    }
}

/// Writes `prefix` if nothing follows the header yet. Returns true when the
/// prefix was written by this call.
pub(crate) fn start_list(env: &mut Envelope, prefix: &[u8]) -> Result<bool> {
    if !env.is_fresh() {
        if env.param_len() < prefix.len() {
            return Err(CodecError::BadParameter("envelope does not hold a list prefix"));
        }
        return Ok(false);
    }
    env.append(prefix)?;
    Ok(true)
}

/// Appends each entry that `encode` accepts.
///
/// `encode` writes one entry into the scratch vector, or returns an error to
/// have the entry skipped. Returns the number of entries appended.
///
/// # Errors
/// Returns `CodecError::InternalError` when an entry does not fit in the
/// envelope or the count field is saturated. `processed` is the index of
/// that entry, so the caller can resume from it with a fresh envelope.
pub(crate) fn append_entries<T, F>(
    env: &mut Envelope,
    count: CountField,
    entries: &[T],
    mut encode: F,
) -> Result<usize>
where
    F: FnMut(&T, &mut Vec<u8>) -> Result<()>,
{
    let mut scratch = Vec::new();
    let mut appended = 0;

    for (index, entry) in entries.iter().enumerate() {
        scratch.clear();
        if let Err(e) = encode(entry, &mut scratch) {
            warn!(pdu = ?env.pdu(), index, error = %e, "Skipping invalid list entry");
            continue;
        }

        let current = count.read(env.payload());
        if current >= count.max() || !env.fits(scratch.len()) {
            warn!(pdu = ?env.pdu(), index, remaining = env.remaining(), "List entry does not fit");
            return Err(CodecError::InternalError { processed: index });
        }

        env.append(&scratch)?;
        count.write(env.payload_mut(), current + 1);
        appended += 1;
    }

    debug!(pdu = ?env.pdu(), appended, total = count.read(env.payload()), "Appended list entries");
    Ok(appended)
}
