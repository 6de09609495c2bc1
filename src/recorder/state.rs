//! Recording state management
//!
//! Defines the recording state machine and session tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Current state of the recording system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// No recording in progress
    #[default]
    Idle,
    /// Currently recording
    Recording,
}

impl From<bool> for RecordingState {
    fn from(recording: bool) -> Self {
        if recording {
            Self::Recording
        } else {
            Self::Idle
        }
    }
}

/// What to do with a start request while a recording is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartPolicy {
    /// Discard the active recording and start over
    #[default]
    Discard,
    /// Keep the active recording and refuse the request
    Reject,
}

/// Information about one recording attempt, from start to stop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSession {
    /// Unique session id
    pub id: Uuid,

    /// Directory the recorder writes into
    pub output_dir: PathBuf,

    /// Wall-clock label passed to the recorder
    pub timestamp: String,

    /// Simulated time when the session started
    pub sim_start: Duration,

    /// Wall-clock time when the session started
    pub started_at: DateTime<Utc>,

    /// Tuples forwarded to the recorder so far
    pub frames_routed: u64,
}

impl RecordingSession {
    /// Create a new session starting now
    pub fn new(output_dir: PathBuf, timestamp: String, sim_start: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            output_dir,
            timestamp,
            sim_start,
            started_at: Utc::now(),
            frames_routed: 0,
        }
    }
}

/// Result of a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartOutcome {
    /// A recording started from idle
    Started,
    /// An active recording was discarded and a new one started
    Restarted,
    /// An active recording was kept and the request refused
    Rejected,
}

/// Result of a stop request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopOutcome {
    /// Whether the request achieved what it asked for
    pub success: bool,

    /// Artifact written by the recorder, if any
    pub path: Option<PathBuf>,
}

impl StopOutcome {
    /// Outcome for a stop request while idle
    pub fn not_recording() -> Self {
        Self {
            success: false,
            path: None,
        }
    }

    /// Outcome for a stop that reached the recorder.
    ///
    /// A discard always succeeds; a keep succeeds only if an artifact exists.
    pub fn stopped(discard: bool, path: Option<PathBuf>) -> Self {
        Self {
            success: discard || path.is_some(),
            path,
        }
    }

    /// Artifact path as a string, empty when there is none
    pub fn path_string(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}
