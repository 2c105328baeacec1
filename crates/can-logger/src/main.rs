//! CAN Bus Logger - Main Entry Point

use can_logger::{init_logging, LoggerConfig, Session};
use can_source::SimulatedBus;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== CAN Bus Logger v{} ===", env!("CARGO_PKG_VERSION"));

    let mut config = LoggerConfig::default();
    if let Some(dir) = std::env::args().nth(1) {
        config.mount_dir = dir.into();
    }

    // The hardware controller is platform glue; any driver plugs in via
    // the FrameSource trait. Simulated traffic keeps the binary runnable
    // on a bare host.
    let session = Session::start(config, SimulatedBus::new())?;
    session.supervise().await;

    Ok(())
}
