//! Monitor plugins
//!
//! A plugin ties a sensor, a configuration and a recorder into a running
//! monitor. Loading validates everything up front and is the only place a
//! monitor can fail; after that every request is answered with an outcome.

pub mod dual_view;
pub mod multi_view;

pub use dual_view::VideoMonitorPlugin;
pub use multi_view::MultiViewMonitorPlugin;

use crate::camera::Frame;
use crate::config::MonitorConfig;
use crate::recorder::{ControllerOptions, RecorderSettings, StopOutcome};
use crate::router::RouteOutcome;
use crate::sensor::{MonitorSensor, WorldClock};
use crate::utils::error::MonitorResult;
use std::sync::Arc;

/// Host-facing lifecycle shared by both monitor variants
pub trait MonitorPlugin: Send + Sync {
    /// Called by the producer once per batch of camera images
    fn on_new_images(&self, images: &[Frame]) -> RouteOutcome;

    /// Stop the active recording
    fn stop_recording(&self, discard: bool, filename: Option<&str>) -> StopOutcome;

    /// Host-initiated reset: discard any active recording
    fn reset(&self);

    fn is_recording(&self) -> bool;
}

/// Recorder settings for a plugin, from its sensor and configuration
fn recorder_settings(
    sensor: &MonitorSensor,
    config: &MonitorConfig,
) -> MonitorResult<RecorderSettings> {
    Ok(RecorderSettings {
        frame_rate: sensor.update_rate() as u32,
        name: config.name.clone(),
        options: config.recorder_section()?.clone(),
    })
}

fn controller_options(config: &MonitorConfig, clock: Arc<dyn WorldClock>) -> ControllerOptions {
    ControllerOptions {
        save_path: config.save_path.clone(),
        restart_policy: config.restart_policy,
        log_prefix: config.log_prefix(),
        clock,
    }
}
