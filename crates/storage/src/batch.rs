//! Batch staging buffer

/// Reusable byte buffer that coalesces formatted lines into one write call
///
/// Owned exclusively by the storage writer task. Used length never exceeds
/// capacity; `clear` resets the length without releasing the allocation.
pub struct BatchBuffer {
    buf: Vec<u8>,
    capacity: usize,
}

impl BatchBuffer {
    /// Fallibly allocate a buffer of `capacity` bytes
    ///
    /// Returns `None` when the allocation cannot be satisfied; the writer
    /// then degrades to unbatched direct writes.
    pub fn allocate(capacity: usize) -> Option<Self> {
        let mut buf = Vec::new();
        if buf.try_reserve_exact(capacity).is_err() {
            return None;
        }
        Some(Self { buf, capacity })
    }

    /// Fixed capacity in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes currently staged
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check whether anything is staged
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes still available
    pub fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }

    /// Append if the bytes fit; false leaves the buffer untouched
    pub fn try_push(&mut self, bytes: &[u8]) -> bool {
        if bytes.len() > self.remaining() {
            return false;
        }
        self.buf.extend_from_slice(bytes);
        true
    }

    /// The staged bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Reset to empty, keeping the allocation
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
