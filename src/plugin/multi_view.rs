//! Multi-view monitor: up to four selectable cameras per recording

use super::{controller_options, recorder_settings, MonitorPlugin};
use crate::camera::{CameraRegistry, Frame, SelectionReport, MAX_SLOTS};
use crate::config::{MonitorConfig, ServiceNames};
use crate::recorder::{
    Recorder, RecorderSettings, RecordingController, StartOutcome, StopOutcome,
};
use crate::router::{MultiViewLayout, RouteOutcome};
use crate::sensor::{MonitorSensor, WorldClock};
use crate::utils::error::MonitorResult;
use std::sync::Arc;

pub struct MultiViewMonitorPlugin {
    controller: RecordingController<MultiViewLayout>,
    services: ServiceNames,
    camera_select_topics: Vec<String>,
}

impl MultiViewMonitorPlugin {
    /// Load the plugin.
    ///
    /// Fails if the recorder section, a service or topic name is missing,
    /// or if the sensor has no cameras.
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
        let settings = recorder_settings(&sensor, config)?;
        let registry = CameraRegistry::build(sensor.camera_names())?;
        let services = config.service_names()?;
        let camera_select_topics = config.camera_select_topics()?;
        let recorder = make_recorder(settings)?;

        tracing::info!(
            "{}Loaded with {} cameras: {:?}",
            config.log_prefix(),
            registry.len(),
            registry.names()
        );

        Ok(Self {
            controller: RecordingController::new(
                sensor,
                MultiViewLayout::new(registry),
                Box::new(recorder),
                controller_options(config, clock),
            ),
            services,
            camera_select_topics,
        })
    }

    /// Start a recording; `cameras` replaces the selection when given
    pub fn start_recording(&self, cameras: Option<Vec<String>>) -> StartOutcome {
        self.controller.start(cameras)
    }

    /// Replace the camera selection, at any time
    pub fn select_cameras<S: AsRef<str>>(&self, names: &[S]) -> SelectionReport {
        self.controller.select_cameras(names)
    }

    /// Names currently bound to each slot
    pub fn selected_cameras(&self) -> [Option<String>; MAX_SLOTS] {
        self.controller.with_layout(|layout| layout.selected_names())
    }

    pub fn controller(&self) -> &RecordingController<MultiViewLayout> {
        &self.controller
    }

    pub fn services(&self) -> &ServiceNames {
        &self.services
    }

    /// Topics that carry camera selection requests
    pub fn camera_select_topics(&self) -> &[String] {
        &self.camera_select_topics
    }
}

impl MonitorPlugin for MultiViewMonitorPlugin {
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
