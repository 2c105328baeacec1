//! CAN Bus Logger Pipeline
//!
//! Moves frames from a bus controller to durable bytes on removable
//! storage: capture task → frame queue → formatting task → line queue →
//! storage writer task, with a supervisor loop for durability syncs.
//! Overload sheds data at the queue boundaries instead of propagating
//! delay upstream into the capture path.

mod clock;
mod config;
mod session;
mod tasks;
mod throttle;

pub use clock::SessionClock;
pub use config::LoggerConfig;
pub use session::Session;
pub use tasks::{capture_task, format_task, writer_task};
pub use throttle::WarnThrottle;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
