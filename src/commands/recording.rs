//! Recording control handlers
//!
//! Request and response types for the control transport, and the handlers
//! that apply them. Handlers take the recording lock, so they run on the
//! blocking pool rather than on an async worker.

use crate::camera::SelectionReport;
use crate::plugin::{MonitorPlugin, MultiViewMonitorPlugin, VideoMonitorPlugin};
use crate::recorder::{RecordingSession, RecordingState, StartOutcome};
use crate::router::ViewFlags;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Start a recording.
///
/// The multi-view monitor reads `cameras`; the dual-view monitor reads the
/// two view flags, which default to `false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartRecordingRequest {
    pub cameras: Option<Vec<String>>,
    pub world_as_main_view: Option<bool>,
    pub disable_window: Option<bool>,
}

impl StartRecordingRequest {
    fn view_flags(&self) -> ViewFlags {
        ViewFlags {
            world_as_main_view: self.world_as_main_view.unwrap_or(false),
            disable_window: self.disable_window.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRecordingResponse {
    pub outcome: StartOutcome,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StopRecordingRequest {
    pub discard: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRecordingResponse {
    pub success: bool,
    /// Artifact path; empty when nothing was kept
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSelectRequest {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSelectResponse {
    /// Camera bound to each slot after the update
    pub slots: Vec<Option<String>>,
    /// Names past the fourth, which were ignored
    pub ignored: usize,
    /// Names that are not cameras of this sensor
    pub unknown: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingStatus {
    pub state: RecordingState,
    pub session: Option<RecordingSession>,
}

/// Run a lock-taking operation on the blocking pool
async fn blocking<T, F>(f: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| format!("Control task failed: {}", e))
}

/// Start a multi-view recording
pub async fn start_multi_view_recording(
    plugin: Arc<MultiViewMonitorPlugin>,
    request: StartRecordingRequest,
) -> Result<StartRecordingResponse, String> {
    blocking(move || StartRecordingResponse {
        outcome: plugin.start_recording(request.cameras),
    })
    .await
}

/// Start a dual-view recording
pub async fn start_dual_view_recording(
    plugin: Arc<VideoMonitorPlugin>,
    request: StartRecordingRequest,
) -> Result<StartRecordingResponse, String> {
    let flags = request.view_flags();
    blocking(move || StartRecordingResponse {
        outcome: plugin.start_recording(flags),
    })
    .await
}

/// Stop recording on either monitor variant
pub async fn stop_recording(
    plugin: Arc<dyn MonitorPlugin>,
    request: StopRecordingRequest,
) -> Result<StopRecordingResponse, String> {
    blocking(move || {
        let outcome = plugin.stop_recording(request.discard, request.filename.as_deref());
        StopRecordingResponse {
            success: outcome.success,
            path: outcome.path_string(),
        }
    })
    .await
}

/// Replace the multi-view camera selection
pub async fn select_cameras(
    plugin: Arc<MultiViewMonitorPlugin>,
    request: CameraSelectRequest,
) -> Result<CameraSelectResponse, String> {
    blocking(move || {
        let SelectionReport {
            ignored,
            unknown,
            slots,
        } = plugin.select_cameras(request.names.as_slice());
        CameraSelectResponse {
            slots: slots.to_vec(),
            ignored,
            unknown,
        }
    })
    .await
}

/// Host reset
pub async fn reset(plugin: Arc<dyn MonitorPlugin>) -> Result<(), String> {
    blocking(move || plugin.reset()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::recorder::testing::{CaptureLog, CapturingRecorder};
    use crate::sensor::{MonitorSensor, SystemClock};

    fn multi_view() -> (Arc<MultiViewMonitorPlugin>, CaptureLog) {
        let config = MonitorConfig::from_json(
            r#"{
                "startRecordingService": "/start",
                "stopRecordingService": "/stop",
                "cameraSelectTopic": "/select",
                "recorder": {}
            }"#,
        )
        .unwrap();
        let sensor = Arc::new(MonitorSensor::new(
            vec!["camA".into(), "camB".into()],
            30.0,
        ));
        let (recorder, log) = CapturingRecorder::new();
        let plugin = MultiViewMonitorPlugin::load(
            sensor,
            &config,
            Arc::new(SystemClock::new()),
            |_| Ok(recorder),
        )
        .unwrap();
        (Arc::new(plugin), log)
    }

    #[test]
    fn test_request_defaults() {
        let start: StartRecordingRequest = serde_json::from_str("{}").unwrap();
        assert!(start.cameras.is_none());
        assert_eq!(start.view_flags(), ViewFlags::default());

        let stop: StopRecordingRequest = serde_json::from_str("{}").unwrap();
        assert!(!stop.discard);
        assert!(stop.filename.is_none());
    }

    #[tokio::test]
    async fn test_stop_when_idle() {
        let (plugin, _) = multi_view();
        let response = stop_recording(plugin, StopRecordingRequest::default())
            .await
            .unwrap();
        assert_eq!(
            response,
            StopRecordingResponse {
                success: false,
                path: String::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_start_select_stop() {
        let (plugin, log) = multi_view();

        let started = start_multi_view_recording(
            plugin.clone(),
            StartRecordingRequest {
                cameras: Some(vec!["camB".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(started.outcome, StartOutcome::Started);

        let selected = select_cameras(
            plugin.clone(),
            CameraSelectRequest {
                names: vec!["camA".into(), "ghost".into()],
            },
        )
        .await
        .unwrap();
        assert_eq!(selected.slots, vec![Some("camA".to_string()), None, None, None]);
        assert_eq!(selected.unknown, vec!["ghost".to_string()]);

        let stopped = stop_recording(
            plugin.clone(),
            StopRecordingRequest {
                discard: true,
                filename: None,
            },
        )
        .await
        .unwrap();
        assert!(stopped.success);
        assert!(stopped.path.is_empty());
        assert_eq!(log.calls().len(), 2);
    }
}
