//! Monitor configuration
//!
//! The configuration file is JSON with camelCase keys. Required fields are
//! optional in the schema so that a missing one can be reported by name
//! when the plugin loads.

use crate::recorder::RestartPolicy;
use crate::utils::error::{MonitorError, MonitorResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Schema
// =============================================================================

/// Where a camera is attached in the simulated world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraRefConfig {
    pub model: String,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Plugin instance name, used for log prefixes and topic names
    #[serde(default = "default_name")]
    pub name: String,

    /// Directory recordings are written into
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,

    #[serde(default)]
    pub start_recording_service: Option<String>,

    #[serde(default)]
    pub stop_recording_service: Option<String>,

    /// Multi-view only
    #[serde(default)]
    pub camera_select_topic: Option<String>,

    /// Recorder configuration section, passed through to the recorder
    #[serde(default)]
    pub recorder: Option<serde_json::Value>,

    #[serde(default)]
    pub camera_refs: HashMap<String, CameraRefConfig>,

    #[serde(default)]
    pub restart_policy: RestartPolicy,
}

fn default_name() -> String {
    "video_monitor".to_string()
}

fn default_save_path() -> PathBuf {
    PathBuf::from("recordings")
}

// =============================================================================
// Validation
// =============================================================================

/// Transport endpoints every monitor variant needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceNames {
    pub start_recording: String,
    pub stop_recording: String,
}

impl MonitorConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(content: &str) -> MonitorResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Prefix for log lines from this plugin
    pub fn log_prefix(&self) -> String {
        format!("[{}] ", self.name)
    }

    /// The recorder section, which must be present
    pub fn recorder_section(&self) -> MonitorResult<&serde_json::Value> {
        self.recorder
            .as_ref()
            .ok_or_else(|| MonitorError::missing("recorder"))
    }

    /// Start and stop service names, which must be present
    pub fn service_names(&self) -> MonitorResult<ServiceNames> {
        Ok(ServiceNames {
            start_recording: required(&self.start_recording_service, "startRecordingService")?,
            stop_recording: required(&self.stop_recording_service, "stopRecordingService")?,
        })
    }

    /// Camera select topic names: the built-in `~/<name>/camera_select`
    /// followed by the configured one, which must be present
    pub fn camera_select_topics(&self) -> MonitorResult<Vec<String>> {
        let configured = required(&self.camera_select_topic, "cameraSelectTopic")?;
        Ok(vec![format!("~/{}/camera_select", self.name), configured])
    }
}

fn required(value: &Option<String>, field: &str) -> MonitorResult<String> {
    value
        .as_ref()
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| MonitorError::missing(field))
}

/// Read a configuration file
pub fn load_config(path: &Path) -> MonitorResult<MonitorConfig> {
    let content = fs::read_to_string(path)?;
    let config = MonitorConfig::from_json(&content)?;

    tracing::debug!("Loaded configuration '{}' from {:?}", config.name, path);

    Ok(config)
}
