//! Recorder interface
//!
//! The recorder encodes and persists frame tuples. It is supplied by the
//! host; the monitor only drives its lifecycle and feeds it frames.

use crate::camera::Frame;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings handed to the recorder factory at load time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderSettings {
    /// Frames per second, taken from the sensor update rate
    pub frame_rate: u32,

    /// Name of the owning plugin
    pub name: String,

    /// Recorder-specific configuration section
    pub options: serde_json::Value,
}

/// A sink for ordered frame tuples
pub trait Recorder: Send {
    /// Begin a new recording
    fn start(&mut self, output_dir: &Path, timestamp: &str, sim_time: Duration);

    /// Finish the current recording.
    ///
    /// Returns the artifact path, or `None` when the recording was
    /// discarded or could not be written.
    fn stop(&mut self, discard: bool, filename: Option<&str>) -> Option<PathBuf>;

    /// Append one tuple; slot order is channel order
    fn add_frame(&mut self, frames: &[Frame]);
}
