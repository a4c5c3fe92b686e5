//! Caller-owned scratch memory for parse results.
//!
//! Every decoded entry that carries text stores its fixed fields followed by
//! its text in the arena, in arrival order. Decoded values borrow the text
//! from the arena, so they live exactly as long as the caller's buffer.

use tracing::trace;

#[derive(Debug)]
pub struct ScratchArena<'a> {
    buf: &'a mut [u8],
    capacity: usize,
}

/// Outcome of storing one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stored<'a> {
    /// Fixed fields and the whole text were stored
    Complete(&'a [u8]),
    /// Fixed fields were stored; the text was cut to the space left
    Truncated(&'a [u8]),
    /// Not even the fixed fields fit; nothing was consumed
    NoRoom,
}

impl<'a> Stored<'a> {
    pub fn text(&self) -> Option<&'a [u8]> {
        match *self {
            Stored::Complete(text) | Stored::Truncated(text) => Some(text),
            Stored::NoRoom => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Stored::Complete(_))
    }
}

impl<'a> ScratchArena<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        let capacity = buf.len();
        Self { buf, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    pub fn used(&self) -> usize {
        self.capacity - self.buf.len()
    }

    fn take(&mut self, len: usize) -> &'a mut [u8] {
        let buf = std::mem::take(&mut self.buf);
        let (head, tail) = buf.split_at_mut(len);
        self.buf = tail;
        head
    }

    /// Stores an entry's fixed fields and then as much of `text` as fits.
    pub fn store(&mut self, fixed: &[u8], text: &[u8]) -> Stored<'a> {
        if self.remaining() < fixed.len() {
            trace!(need = fixed.len(), remaining = self.remaining(), "No room for record");
            return Stored::NoRoom;
        }
        self.take(fixed.len()).copy_from_slice(fixed);

        let len = text.len().min(self.remaining());
        let slot = self.take(len);
        slot.copy_from_slice(&text[..len]);
        let slot: &'a [u8] = slot;

        if len < text.len() {
            trace!(kept = len, dropped = text.len() - len, "Truncated text");
            Stored::Truncated(slot)
        } else {
            Stored::Complete(slot)
        }
    }
}
