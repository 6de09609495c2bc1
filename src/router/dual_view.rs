//! Dual-view layout: a world camera and a robot camera

use super::FrameLayout;
use crate::camera::{null_frame, Frame};
use serde::{Deserialize, Serialize};

/// Name of the camera observing the whole scene
pub const WORLD_CAMERA: &str = "world_camera";

/// Name of the camera following the robot
pub const ROBOT_CAMERA: &str = "robot_camera";

/// Required cameras, in batch order
pub const CAMERA_NAMES: [&str; 2] = [WORLD_CAMERA, ROBOT_CAMERA];

const WORLD_INDEX: usize = 0;
const ROBOT_INDEX: usize = 1;

/// View flags chosen per recording
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFlags {
    /// Record the world camera as the main view
    pub world_as_main_view: bool,

    /// Record the main view only
    pub disable_window: bool,
}

/// Two-slot layout with role swapping
#[derive(Debug, Clone, Copy, Default)]
pub struct DualViewLayout {
    flags: ViewFlags,
}

impl DualViewLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> ViewFlags {
        self.flags
    }
}

impl FrameLayout for DualViewLayout {
    type Options = ViewFlags;

    fn configure(&mut self, options: Self::Options, log_prefix: &str) -> bool {
        tracing::debug!(
            "{}View flags: world_as_main_view={}, disable_window={}",
            log_prefix,
            options.world_as_main_view,
            options.disable_window
        );
        self.flags = options;
        false
    }

    fn assemble(&self, batch: &[Frame]) -> Vec<Frame> {
        let (main, window) = if self.flags.world_as_main_view {
            (WORLD_INDEX, ROBOT_INDEX)
        } else {
            (ROBOT_INDEX, WORLD_INDEX)
        };
        let frame = |index: usize| batch.get(index).cloned().unwrap_or_else(null_frame);

        // A disabled window is omitted, not null-filled
        if self.flags.disable_window {
            vec![frame(main)]
        } else {
            vec![frame(main), frame(window)]
        }
    }
}
