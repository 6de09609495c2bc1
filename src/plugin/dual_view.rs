//! Dual-view monitor: a world camera and a robot camera
//!
//! The sensor must carry exactly `world_camera` and `robot_camera`, in that
//! order. Each recording picks which one is the main view and whether the
//! second view is recorded at all.

use super::{controller_options, recorder_settings, MonitorPlugin};
use crate::camera::{CameraRegistry, Frame};
use crate::config::{MonitorConfig, ServiceNames};
use crate::recorder::{
    Recorder, RecorderSettings, RecordingController, StartOutcome, StopOutcome,
};
use crate::router::dual_view::CAMERA_NAMES;
use crate::router::{DualViewLayout, RouteOutcome, ViewFlags, ROBOT_CAMERA};
use crate::sensor::{MonitorSensor, WorldClock};
use crate::utils::error::MonitorResult;
use std::sync::Arc;

pub struct VideoMonitorPlugin {
    controller: RecordingController<DualViewLayout>,
    services: ServiceNames,
}

impl VideoMonitorPlugin {
    /// Load the plugin.
    ///
    /// Fails if the sensor cameras are not exactly the world and robot
    /// cameras, or if the recorder section or a service name is missing.
    pub fn load<R, F>(
        sensor: Arc<MonitorSensor>,
        config: &MonitorConfig,
        clock: Arc<dyn WorldClock>,
        make_recorder: F,
    ) -> MonitorResult<Self>
    where
        R: Recorder + 'static,
        F: FnOnce(RecorderSettings) -> MonitorResult<R>,
    {
        let prefix = config.log_prefix();
        CameraRegistry::build_exact(sensor.camera_names(), &CAMERA_NAMES)?;

        if !config.camera_refs.contains_key(ROBOT_CAMERA) {
            tracing::warn!(
                "{}{} camera reference configuration is not provided",
                prefix,
                ROBOT_CAMERA
            );
        }

        let settings = recorder_settings(&sensor, config)?;
        let services = config.service_names()?;
        let recorder = make_recorder(settings)?;

        tracing::info!("{}Loaded", prefix);

        Ok(Self {
            controller: RecordingController::new(
                sensor,
                DualViewLayout::new(),
                Box::new(recorder),
                controller_options(config, clock),
            ),
            services,
        })
    }

    /// Start a recording with the given view flags
    pub fn start_recording(&self, flags: ViewFlags) -> StartOutcome {
        self.controller.start(flags)
    }

    /// Flags of the current (or last) recording
    pub fn view_flags(&self) -> ViewFlags {
        self.controller.with_layout(|layout| layout.flags())
    }

    pub fn controller(&self) -> &RecordingController<DualViewLayout> {
        &self.controller
    }

    pub fn services(&self) -> &ServiceNames {
        &self.services
    }
}

impl MonitorPlugin for VideoMonitorPlugin {
    fn on_new_images(&self, images: &[Frame]) -> RouteOutcome {
        self.controller.on_frame_batch(images)
    }

    fn stop_recording(&self, discard: bool, filename: Option<&str>) -> StopOutcome {
        self.controller.stop(discard, filename)
    }

    fn reset(&self) {
        self.controller.reset();
    }

    fn is_recording(&self) -> bool {
        self.controller.sensor().is_recording()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ImageData;
    use crate::recorder::testing::{CaptureLog, CapturingRecorder};
    use crate::router::WORLD_CAMERA;
    use crate::sensor::SystemClock;
    use crate::utils::error::MonitorError;
    use std::path::PathBuf;
    use std::time::Duration;

    const CONFIG: &str = r#"{
        "name": "gvm",
        "startRecordingService": "/gvm/start",
        "stopRecordingService": "/gvm/stop",
        "recorder": {}
    }"#;

    fn load(names: &[&str]) -> MonitorResult<(VideoMonitorPlugin, CaptureLog)> {
        let sensor = Arc::new(MonitorSensor::new(
            names.iter().map(|n| n.to_string()).collect(),
            30.0,
        ));
        let config = MonitorConfig::from_json(CONFIG)?;
        let (recorder, log) = CapturingRecorder::new();
        let plugin =
            VideoMonitorPlugin::load(sensor, &config, Arc::new(SystemClock::new()), |_| {
                Ok(recorder)
            })?;
        Ok((plugin, log))
    }

    fn images() -> Vec<Frame> {
        CAMERA_NAMES
            .iter()
            .map(|n| Arc::new(ImageData::new(*n, 8, 8, Duration::ZERO, vec![0; 192])))
            .collect()
    }

    #[test]
    fn test_load_requires_exact_cameras() {
        let err = load(&[ROBOT_CAMERA, WORLD_CAMERA]).err().unwrap();
        assert!(matches!(err, MonitorError::CameraMismatch { .. }));
        assert!(load(&[WORLD_CAMERA, ROBOT_CAMERA, "extra"]).is_err());
    }

    #[test]
    fn test_route_with_window() {
        let (plugin, log) = load(&CAMERA_NAMES).unwrap();
        plugin.start_recording(ViewFlags {
            world_as_main_view: true,
            disable_window: false,
        });
        plugin.on_new_images(&images());
        assert_eq!(log.frames()[0], vec![WORLD_CAMERA, ROBOT_CAMERA]);
    }

    #[test]
    fn test_route_without_window() {
        let (plugin, log) = load(&CAMERA_NAMES).unwrap();
        plugin.start_recording(ViewFlags {
            world_as_main_view: false,
            disable_window: true,
        });
        plugin.on_new_images(&images());
        assert_eq!(log.frames()[0], vec![ROBOT_CAMERA]);
        assert!(plugin.view_flags().disable_window);
    }

    #[test]
    fn test_discard_stop_succeeds() {
        let (plugin, log) = load(&CAMERA_NAMES).unwrap();
        log.set_stop_path(Some(PathBuf::from("kept.json")));

        plugin.start_recording(ViewFlags::default());
        assert!(plugin.stop_recording(true, None).success);

        plugin.start_recording(ViewFlags::default());
        let kept = plugin.stop_recording(false, None);
        assert!(kept.success);
        assert_eq!(kept.path_string(), "kept.json");
    }
}
