//! Recording system module
//!
//! - `sink`: the Recorder interface supplied by the host
//! - `state`: recording state, sessions and request outcomes
//! - `controller`: the recording state machine and non-blocking frame path
//! - `manifest`: a Recorder that writes JSON manifests

pub mod controller;
pub mod manifest;
pub mod sink;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{ControllerOptions, RecordingController, RecordingEvent};
pub use manifest::ManifestRecorder;
pub use sink::{Recorder, RecorderSettings};
pub use state::{RecordingSession, RecordingState, RestartPolicy, StartOutcome, StopOutcome};
