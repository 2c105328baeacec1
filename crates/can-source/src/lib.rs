//! CAN Frame Source
//!
//! This crate provides the structured CAN frame type and the async boundary
//! trait for the hardware bus controller. Bus bring-up (TWAI/SPI setup,
//! bitrate, filters) belongs to the platform layer; consumers of this crate
//! receive an already-initialized source.

mod error;
mod frame;
mod sim;
mod source;

pub use error::CanError;
pub use frame::CanFrame;
pub use sim::{ReplaySource, SimulatedBus};
pub use source::FrameSource;
