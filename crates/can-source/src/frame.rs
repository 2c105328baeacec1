//! Structured CAN frame

use serde::{Deserialize, Serialize};

/// Maximum payload length of a classic CAN frame
pub const MAX_PAYLOAD: usize = 8;

/// Mask for a 29-bit extended identifier
const ID_MASK: u32 = 0x1FFF_FFFF;

/// One CAN bus observation as delivered by the controller
///
/// Purely transient: created per poll by the frame source, stamped by the
/// capture task, consumed and discarded by the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanFrame {
    /// Frame identifier (11-bit standard or 29-bit extended)
    pub id: u32,
    /// Payload length (0-8)
    pub len: u8,
    /// Payload bytes; only the first `len` are meaningful
    pub data: [u8; MAX_PAYLOAD],
    /// Capture timestamp in seconds (session clock, not wall clock)
    pub timestamp: f64,
}

impl CanFrame {
    /// Create a frame from an identifier and payload slice
    ///
    /// The identifier is masked to 29 bits and the payload is capped at
    /// 8 bytes, matching what the controller can deliver.
    pub fn new(id: u32, payload: &[u8]) -> Self {
        let len = payload.len().min(MAX_PAYLOAD);
        let mut data = [0u8; MAX_PAYLOAD];
        data[..len].copy_from_slice(&payload[..len]);
        Self {
            id: id & ID_MASK,
            len: len as u8,
            data,
            timestamp: 0.0,
        }
    }

    /// Get the meaningful payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Check whether the frame carries no payload
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
