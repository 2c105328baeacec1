//! CAN Source Error Types

use thiserror::Error;

/// Errors surfaced by a CAN frame source
#[derive(Debug, Error)]
pub enum CanError {
    /// Controller driver failure (install/start)
    #[error("CAN driver error: {0}")]
    Driver(String),

    /// Transient bus fault while receiving
    #[error("CAN bus fault: {0}")]
    Bus(String),

    /// Controller is not running
    #[error("CAN controller not running")]
    NotRunning,
}

impl From<std::io::Error> for CanError {
    fn from(err: std::io::Error) -> Self {
        CanError::Driver(err.to_string())
    }
}
