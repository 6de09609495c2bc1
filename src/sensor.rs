//! Monitor sensor and timing source
//!
//! The sensor owns the "is recording" flag. The producer reads it to decide
//! whether rendering a batch is worth it; the router reads it as a lock-free
//! pre-check; the controller is the only writer and writes it while holding
//! the recording lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// The multi-camera sensor as seen by the monitor
#[derive(Debug)]
pub struct MonitorSensor {
    camera_names: Vec<String>,
    update_rate: f64,
    recording: AtomicBool,
}

impl MonitorSensor {
    /// Create a sensor with its camera names (in batch order) and update rate in Hz
    pub fn new(camera_names: Vec<String>, update_rate: f64) -> Self {
        Self {
            camera_names,
            update_rate,
            recording: AtomicBool::new(false),
        }
    }

    pub fn camera_names(&self) -> &[String] {
        &self.camera_names
    }

    /// Update rate in Hz
    pub fn update_rate(&self) -> f64 {
        self.update_rate
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::Acquire)
    }

    pub(crate) fn set_recording(&self, recording: bool) {
        self.recording.store(recording, Ordering::Release);
    }
}

/// Source of simulated time
pub trait WorldClock: Send + Sync {
    /// Current simulated real time
    fn real_time(&self) -> Duration;
}

/// Clock measuring time since it was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldClock for SystemClock {
    fn real_time(&self) -> Duration {
        self.origin.elapsed()
    }
}
