//! Manifest recorder
//!
//! A recorder that writes, per recording, a JSON manifest of every routed
//! tuple: which camera image landed in which slot and when it was captured.
//! Useful for checking routing without a video encoder.

use super::sink::{Recorder, RecorderSettings};
use crate::camera::Frame;
use crate::utils::error::MonitorResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options read from the recorder configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestOptions {
    /// Pretty-print the manifest
    pub pretty: bool,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// One slot of a routed tuple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotEntry {
    pub camera: String,
    pub timestamp_ms: f64,
    pub width: u32,
    pub height: u32,
}

/// The persisted manifest of one recording
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: String,
    pub frame_rate: u32,
    pub timestamp: String,
    pub sim_start_ms: f64,
    /// One entry per routed tuple; `None` marks a null image
    pub frames: Vec<Vec<Option<SlotEntry>>>,
}

struct ActiveManifest {
    output_dir: PathBuf,
    manifest: Manifest,
}

/// Recorder persisting JSON manifests
pub struct ManifestRecorder {
    settings: RecorderSettings,
    options: ManifestOptions,
    active: Option<ActiveManifest>,
}

impl ManifestRecorder {
    /// Create a recorder from load-time settings
    pub fn new(settings: RecorderSettings) -> MonitorResult<Self> {
        let options = if settings.options.is_null() {
            ManifestOptions::default()
        } else {
            serde_json::from_value(settings.options.clone())?
        };

        Ok(Self {
            settings,
            options,
            active: None,
        })
    }

    fn write(&self, active: &ActiveManifest, filename: Option<&str>) -> MonitorResult<PathBuf> {
        let mut name = match filename.and_then(override_file_name) {
            Some(name) => name,
            None => format!("{}_{}", self.settings.name, active.manifest.timestamp),
        };
        if !name.ends_with(".json") {
            name.push_str(".json");
        }
        let path = active.output_dir.join(name);

        fs::create_dir_all(&active.output_dir)?;
        let content = if self.options.pretty {
            serde_json::to_string_pretty(&active.manifest)?
        } else {
            serde_json::to_string(&active.manifest)?
        };
        fs::write(&path, content)?;

        Ok(path)
    }
}

/// Final component of a requested file name; directories are never honored
fn override_file_name(requested: &str) -> Option<String> {
    Path::new(requested)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

impl Recorder for ManifestRecorder {
    fn start(&mut self, output_dir: &Path, timestamp: &str, sim_time: Duration) {
        self.active = Some(ActiveManifest {
            output_dir: output_dir.to_path_buf(),
            manifest: Manifest {
                name: self.settings.name.clone(),
                frame_rate: self.settings.frame_rate,
                timestamp: timestamp.to_string(),
                sim_start_ms: sim_time.as_secs_f64() * 1000.0,
                frames: Vec::new(),
            },
        });
    }

    fn stop(&mut self, discard: bool, filename: Option<&str>) -> Option<PathBuf> {
        let active = self.active.take()?;
        if discard {
            return None;
        }

        match self.write(&active, filename) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!("Failed to write manifest: {}", e);
                None
            }
        }
    }

    fn add_frame(&mut self, frames: &[Frame]) {
        let Some(active) = self.active.as_mut() else {
            return;
        };

        let entry = frames
            .iter()
            .map(|frame| {
                (!frame.is_null()).then(|| SlotEntry {
                    camera: frame.camera.clone(),
                    timestamp_ms: frame.timestamp.as_secs_f64() * 1000.0,
                    width: frame.width,
                    height: frame.height,
                })
            })
            .collect();
        active.manifest.frames.push(entry);
    }
}
