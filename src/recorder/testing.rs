//! Recorder double for tests

use super::sink::Recorder;
use crate::camera::Frame;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// A call received by the recorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderCall {
    Start {
        output_dir: PathBuf,
        timestamp: String,
        sim_time: Duration,
    },
    Stop {
        discard: bool,
        filename: Option<String>,
    },
    /// Camera names per slot; empty for null images
    Frame(Vec<String>),
}

#[derive(Default)]
struct Shared {
    calls: Vec<RecorderCall>,
    stop_path: Option<PathBuf>,
}

/// Handle for inspecting a `CapturingRecorder` after it has been boxed
#[derive(Clone, Default)]
pub struct CaptureLog(Arc<Mutex<Shared>>);

impl CaptureLog {
    pub fn calls(&self) -> Vec<RecorderCall> {
        self.0.lock().calls.clone()
    }

    pub fn frames(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecorderCall::Frame(cameras) => Some(cameras),
                _ => None,
            })
            .collect()
    }

    /// Path returned by a stop that keeps the recording
    pub fn set_stop_path(&self, path: Option<PathBuf>) {
        self.0.lock().stop_path = path;
    }
}

/// Records every call it receives
pub struct CapturingRecorder {
    log: CaptureLog,
}

impl CapturingRecorder {
    pub fn new() -> (Self, CaptureLog) {
        let log = CaptureLog::default();
        (Self { log: log.clone() }, log)
    }
}

impl Recorder for CapturingRecorder {
    fn start(&mut self, output_dir: &Path, timestamp: &str, sim_time: Duration) {
        self.log.0.lock().calls.push(RecorderCall::Start {
            output_dir: output_dir.to_path_buf(),
            timestamp: timestamp.to_string(),
            sim_time,
        });
    }

    fn stop(&mut self, discard: bool, filename: Option<&str>) -> Option<PathBuf> {
        let mut shared = self.log.0.lock();
        shared.calls.push(RecorderCall::Stop {
            discard,
            filename: filename.map(str::to_string),
        });
        if discard {
            None
        } else {
            shared.stop_path.clone()
        }
    }

    fn add_frame(&mut self, frames: &[Frame]) {
        let cameras = frames.iter().map(|f| f.camera.clone()).collect();
        self.log.0.lock().calls.push(RecorderCall::Frame(cameras));
    }
}
