//! Frame types delivered by the producer
//!
//! A frame is a shared handle to one camera image. The producer owns the
//! batch for the duration of a callback; routing clones the handles (cheap
//! `Arc` bumps) for the recorder and never keeps the batch itself.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// A single camera image
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageData {
    /// Name of the camera that produced the image (empty for the null image)
    pub camera: String,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Simulated capture time
    pub timestamp: Duration,

    /// Raw pixel data
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Create a new image
    pub fn new(
        camera: impl Into<String>,
        width: u32,
        height: u32,
        timestamp: Duration,
        pixels: Vec<u8>,
    ) -> Self {
        Self {
            camera: camera.into(),
            width,
            height,
            timestamp,
            pixels,
        }
    }

    /// Whether this is the null placeholder image
    pub fn is_null(&self) -> bool {
        self.camera.is_empty() && self.width == 0 && self.height == 0 && self.pixels.is_empty()
    }
}

/// Shared handle to an image
pub type Frame = Arc<ImageData>;

/// The placeholder substituted for unset output slots.
///
/// All null frames share one allocation, so `Arc::ptr_eq` against this
/// handle also identifies them.
pub fn null_frame() -> Frame {
    static NULL: OnceLock<Frame> = OnceLock::new();
    NULL.get_or_init(|| Arc::new(ImageData::default())).clone()
}
