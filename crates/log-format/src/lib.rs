//! Log Line Formatting
//!
//! Renders structured CAN frames into the plain-text log line format:
//! `(<timestamp>) can <id>#<payload hex>` with a trailing newline. Lines
//! are fixed-capacity so every queue slot and batch copy is bounded.

mod line;
mod render;

pub use line::{LogLine, LINE_CAPACITY};
pub use render::render_frame;
