//! Control command handlers
//!
//! This module contains the handlers a control transport calls into, plus
//! a tagged request type and dispatcher for transports that deliver JSON.

pub mod recording;

use crate::plugin::{MonitorPlugin, MultiViewMonitorPlugin, VideoMonitorPlugin};
use recording::{
    CameraSelectRequest, RecordingStatus, StartRecordingRequest, StopRecordingRequest,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A control request as delivered by a JSON transport
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControlRequest {
    StartRecording(StartRecordingRequest),
    StopRecording(StopRecordingRequest),
    SelectCameras(CameraSelectRequest),
    Reset,
    Status,
}

/// A loaded monitor of either variant
#[derive(Clone)]
pub enum Monitor {
    MultiView(Arc<MultiViewMonitorPlugin>),
    DualView(Arc<VideoMonitorPlugin>),
}

impl Monitor {
    /// The host-facing lifecycle of the monitor
    pub fn plugin(&self) -> Arc<dyn MonitorPlugin> {
        match self {
            Monitor::MultiView(plugin) => plugin.clone(),
            Monitor::DualView(plugin) => plugin.clone(),
        }
    }

    fn status(&self) -> RecordingStatus {
        match self {
            Monitor::MultiView(plugin) => RecordingStatus {
                state: plugin.controller().state(),
                session: plugin.controller().current_session(),
            },
            Monitor::DualView(plugin) => RecordingStatus {
                state: plugin.controller().state(),
                session: plugin.controller().current_session(),
            },
        }
    }

    /// Apply a request and serialize its response
    pub async fn dispatch(&self, request: ControlRequest) -> Result<serde_json::Value, String> {
        match (self, request) {
            (Monitor::MultiView(plugin), ControlRequest::StartRecording(request)) => {
                if request.world_as_main_view.is_some() || request.disable_window.is_some() {
                    tracing::debug!("View flags are ignored by the multi-view monitor");
                }
                to_json(recording::start_multi_view_recording(plugin.clone(), request).await)
            }
            (Monitor::DualView(plugin), ControlRequest::StartRecording(request)) => {
                if request.cameras.is_some() {
                    tracing::debug!("Camera selection is ignored by the dual-view monitor");
                }
                to_json(recording::start_dual_view_recording(plugin.clone(), request).await)
            }
            (_, ControlRequest::StopRecording(request)) => {
                to_json(recording::stop_recording(self.plugin(), request).await)
            }
            (Monitor::MultiView(plugin), ControlRequest::SelectCameras(request)) => {
                to_json(recording::select_cameras(plugin.clone(), request).await)
            }
            (Monitor::DualView(_), ControlRequest::SelectCameras(_)) => {
                Err("Camera selection is not supported by the dual-view monitor".to_string())
            }
            (_, ControlRequest::Reset) => to_json(recording::reset(self.plugin()).await),
            (_, ControlRequest::Status) => to_json(Ok(self.status())),
        }
    }
}

fn to_json<T: Serialize>(value: Result<T, String>) -> Result<serde_json::Value, String> {
    value.and_then(|v| serde_json::to_value(v).map_err(|e| e.to_string()))
}
