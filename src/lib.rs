//! Video Monitor - multi-camera recording for simulated sensors.
//!
//! A sensor delivers batches of camera images at a fixed rate. The monitor
//! lets an operator choose which cameras feed which output slot and drives
//! the start/stop/reset recording lifecycle, without ever stalling the
//! image-delivery path.

pub mod camera;
pub mod commands;
pub mod config;
pub mod plugin;
pub mod recorder;
pub mod router;
pub mod sensor;
pub mod simulation;
pub mod utils;

pub use plugin::{MonitorPlugin, MultiViewMonitorPlugin, VideoMonitorPlugin};
pub use recorder::{Recorder, RecordingController};
pub use utils::error::{MonitorError, MonitorResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "video_monitor_lib=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run the simulation host with command-line arguments (program name excluded)
pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let args = simulation::SimulationArgs::parse(&args)?;

    tracing::info!("Starting Video Monitor v{}", env!("CARGO_PKG_VERSION"));

    simulation::run(args).await
}
