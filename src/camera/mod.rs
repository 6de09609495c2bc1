//! Cameras attached to the monitor sensor
//!
//! - `frame`: image handles and the null placeholder
//! - `registry`: name to batch-index mapping
//! - `selector`: slot bindings for the multi-view layout

pub mod frame;
pub mod registry;
pub mod selector;

pub use frame::{null_frame, Frame, ImageData};
pub use registry::CameraRegistry;
pub use selector::{CameraSelector, SelectionReport, MAX_SLOTS};
