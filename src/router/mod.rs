//! Frame routing
//!
//! A layout turns one producer batch (indexed by camera registry index) into
//! the ordered tuple the recorder writes. Slot order is the recorder's
//! channel order, so a layout must be deterministic for a given state.
//!
//! The two layouts deliberately disagree on unset positions: the multi-view
//! layout always emits four slots and null-fills the unset ones, while the
//! dual-view layout drops its secondary slot entirely when the window is
//! disabled.

pub mod dual_view;
pub mod multi_view;

pub use dual_view::{DualViewLayout, ViewFlags, ROBOT_CAMERA, WORLD_CAMERA};
pub use multi_view::MultiViewLayout;

use crate::camera::Frame;
use std::fmt::Debug;

/// Slot assembly policy for one monitor variant
pub trait FrameLayout: Send + 'static {
    /// Per-recording options supplied with a start request
    type Options: Debug + Send;

    /// Apply start-time options. Returns whether the camera selection was
    /// replaced.
    fn configure(&mut self, options: Self::Options, log_prefix: &str) -> bool;

    /// Assemble the output tuple for one batch
    fn assemble(&self, batch: &[Frame]) -> Vec<Frame>;
}

/// Result of offering a batch to the router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The tuple was handed to the recorder
    Forwarded {
        /// Number of slots in the tuple
        slots: usize,
    },
    /// No recording is active
    DroppedIdle,
    /// A control operation holds the recording lock
    DroppedBusy,
}

impl RouteOutcome {
    pub fn is_forwarded(&self) -> bool {
        matches!(self, RouteOutcome::Forwarded { .. })
    }
}
