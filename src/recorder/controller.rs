//! Recording controller
//!
//! Serializes start, stop, reset and selection updates against each other and
//! against frame routing. Control operations take the recording lock and
//! wait for it; the frame path only ever tries the lock and drops the batch
//! when it is held, so the producer thread is never stalled by a control
//! request.
//!
//! The "is recording" flag lives on the sensor. It is only written with the
//! lock held, and the frame path re-reads it under the lock before
//! forwarding, so no tuple reaches the recorder once a stop has begun.

use super::sink::Recorder;
use super::state::{RecordingSession, RecordingState, RestartPolicy, StartOutcome, StopOutcome};
use crate::camera::{Frame, SelectionReport};
use crate::router::{FrameLayout, MultiViewLayout, RouteOutcome};
use crate::sensor::{MonitorSensor, SystemClock, WorldClock};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum RecordingEvent {
    /// Recording started
    Started { session: Uuid },
    /// Recording stopped and kept
    Stopped { session: Uuid, path: Option<PathBuf> },
    /// Recording stopped and discarded
    Discarded { session: Uuid },
    /// Camera selection replaced
    SelectionChanged,
}

/// Controller settings that are fixed at load time
#[derive(Clone)]
pub struct ControllerOptions {
    /// Directory recordings are written into
    pub save_path: PathBuf,

    /// Behavior of a start request while recording
    pub restart_policy: RestartPolicy,

    /// Prefix for every log line, e.g. `[monitor] `
    pub log_prefix: String,

    /// Source of simulated time
    pub clock: Arc<dyn WorldClock>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("recordings"),
            restart_policy: RestartPolicy::default(),
            log_prefix: String::new(),
            clock: Arc::new(SystemClock::new()),
        }
    }
}

/// State guarded by the recording lock
struct Inner<L> {
    layout: L,
    recorder: Box<dyn Recorder>,
    session: Option<RecordingSession>,
}

/// Drives the idle/recording state machine for one monitor
pub struct RecordingController<L: FrameLayout> {
    sensor: Arc<MonitorSensor>,
    options: ControllerOptions,
    inner: Mutex<Inner<L>>,
    event_tx: broadcast::Sender<RecordingEvent>,
}

impl<L: FrameLayout> RecordingController<L> {
    /// Create an idle controller
    pub fn new(
        sensor: Arc<MonitorSensor>,
        layout: L,
        recorder: Box<dyn Recorder>,
        options: ControllerOptions,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            sensor,
            options,
            inner: Mutex::new(Inner {
                layout,
                recorder,
                session: None,
            }),
            event_tx,
        }
    }

    /// Get the current recording state
    pub fn state(&self) -> RecordingState {
        self.sensor.is_recording().into()
    }

    /// The session in progress, if any
    pub fn current_session(&self) -> Option<RecordingSession> {
        self.inner.lock().session.clone()
    }

    /// Subscribe to recording events
    pub fn subscribe(&self) -> broadcast::Receiver<RecordingEvent> {
        self.event_tx.subscribe()
    }

    pub fn sensor(&self) -> &Arc<MonitorSensor> {
        &self.sensor
    }

    /// Read the layout under the recording lock
    pub fn with_layout<T>(&self, f: impl FnOnce(&L) -> T) -> T {
        f(&self.inner.lock().layout)
    }

    /// Start a recording, discarding (or keeping, per policy) any active one
    pub fn start(&self, layout_options: L::Options) -> StartOutcome {
        let prefix = &self.options.log_prefix;
        let timestamp = timestamp_label();
        let sim_time = self.options.clock.real_time();

        let mut inner = self.inner.lock();

        let mut outcome = StartOutcome::Started;
        if self.sensor.is_recording() {
            if self.options.restart_policy == RestartPolicy::Reject {
                tracing::warn!("{}There is already an active recording; ignoring request", prefix);
                return StartOutcome::Rejected;
            }
            tracing::warn!("{}There is already an active recording; resetting", prefix);
            self.stop_locked(&mut inner, true, None);
            outcome = StartOutcome::Restarted;
        }

        let selection_changed = inner.layout.configure(layout_options, prefix);
        inner
            .recorder
            .start(&self.options.save_path, &timestamp, sim_time);

        let session = RecordingSession::new(self.options.save_path.clone(), timestamp, sim_time);
        let id = session.id;
        inner.session = Some(session);
        self.sensor.set_recording(true);

        if selection_changed {
            let _ = self.event_tx.send(RecordingEvent::SelectionChanged);
        }
        let _ = self.event_tx.send(RecordingEvent::Started { session: id });
        tracing::info!("{}Recording started ({})", prefix, id);
        outcome
    }

    /// Stop the active recording
    pub fn stop(&self, discard: bool, filename: Option<&str>) -> StopOutcome {
        let mut inner = self.inner.lock();

        if !self.sensor.is_recording() {
            tracing::warn!(
                "{}No active recording; ignoring request",
                self.options.log_prefix
            );
            return StopOutcome::not_recording();
        }

        let path = self.stop_locked(&mut inner, discard, filename);
        StopOutcome::stopped(discard, path)
    }

    /// Discard any active recording. Returns whether one was discarded.
    pub fn reset(&self) -> bool {
        let mut inner = self.inner.lock();
        if !self.sensor.is_recording() {
            return false;
        }
        self.stop_locked(&mut inner, true, None);
        true
    }

    /// Offer a producer batch for recording without ever blocking.
    ///
    /// The batch is dropped when no recording is active or when a control
    /// operation holds the lock.
    pub fn on_frame_batch(&self, batch: &[Frame]) -> RouteOutcome {
        // Stale read is fine here; it is re-checked under the lock
        if !self.sensor.is_recording() {
            return RouteOutcome::DroppedIdle;
        }

        let Some(mut inner) = self.inner.try_lock() else {
            return RouteOutcome::DroppedBusy;
        };
        if !self.sensor.is_recording() {
            return RouteOutcome::DroppedIdle;
        }

        let frames = inner.layout.assemble(batch);
        inner.recorder.add_frame(&frames);
        if let Some(session) = inner.session.as_mut() {
            session.frames_routed += 1;
        }

        RouteOutcome::Forwarded {
            slots: frames.len(),
        }
    }

    /// Clear the flag, then finish the recorder session. Lock must be held.
    fn stop_locked(
        &self,
        inner: &mut Inner<L>,
        discard: bool,
        filename: Option<&str>,
    ) -> Option<PathBuf> {
        self.sensor.set_recording(false);
        let path = inner.recorder.stop(discard, filename);

        let session = inner.session.take();
        let id = session.as_ref().map(|s| s.id).unwrap_or_else(Uuid::nil);
        let frames = session.as_ref().map(|s| s.frames_routed).unwrap_or(0);
        let prefix = &self.options.log_prefix;

        if discard {
            let _ = self.event_tx.send(RecordingEvent::Discarded { session: id });
            tracing::info!("{}Recording discarded after {} frames", prefix, frames);
        } else {
            let _ = self.event_tx.send(RecordingEvent::Stopped {
                session: id,
                path: path.clone(),
            });
            match &path {
                Some(p) => {
                    tracing::info!("{}Recording saved to {:?} ({} frames)", prefix, p, frames)
                }
                None => tracing::error!("{}Recording stopped but no file was produced", prefix),
            }
        }

        path
    }
}

impl RecordingController<MultiViewLayout> {
    /// Replace the camera selection
    pub fn select_cameras<S: AsRef<str>>(&self, names: &[S]) -> SelectionReport {
        let report = self
            .inner
            .lock()
            .layout
            .select(names, &self.options.log_prefix);
        let _ = self.event_tx.send(RecordingEvent::SelectionChanged);
        report
    }
}

impl<L: FrameLayout> Drop for RecordingController<L> {
    fn drop(&mut self) {
        if self.sensor.is_recording() {
            tracing::warn!(
                "{}Shutting down with an active recording; discarding",
                self.options.log_prefix
            );
            self.sensor.set_recording(false);
            self.inner.get_mut().recorder.stop(true, None);
        }
    }
}

/// Wall-clock label for a new recording
fn timestamp_label() -> String {
    chrono::Local::now().format("%Y_%m_%d_%H_%M_%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraRegistry, ImageData};
    use crate::recorder::testing::{CaptureLog, CapturingRecorder, RecorderCall};
    use crate::router::{DualViewLayout, ViewFlags};
    use std::thread;
    use std::time::Duration;

    const CAMERAS: [&str; 3] = ["camA", "camB", "camC"];

    fn batch(names: &[&str]) -> Vec<Frame> {
        names
            .iter()
            .map(|n| Arc::new(ImageData::new(*n, 1, 1, Duration::ZERO, vec![0; 3])))
            .collect()
    }

    fn multi_view(policy: RestartPolicy) -> (RecordingController<MultiViewLayout>, CaptureLog) {
        let sensor = Arc::new(MonitorSensor::new(
            CAMERAS.iter().map(|c| c.to_string()).collect(),
            30.0,
        ));
        let registry = CameraRegistry::build(sensor.camera_names()).unwrap();
        let (recorder, log) = CapturingRecorder::new();
        let controller = RecordingController::new(
            sensor,
            MultiViewLayout::new(registry),
            Box::new(recorder),
            ControllerOptions {
                restart_policy: policy,
                log_prefix: "[test] ".to_string(),
                ..ControllerOptions::default()
            },
        );
        (controller, log)
    }

    #[test]
    fn test_frames_dropped_while_idle() {
        let (controller, log) = multi_view(RestartPolicy::Discard);
        let outcome = controller.on_frame_batch(&batch(&CAMERAS));
        assert_eq!(outcome, RouteOutcome::DroppedIdle);
        assert!(log.frames().is_empty());
    }

    #[test]
    fn test_start_selects_and_routes() {
        let (controller, log) = multi_view(RestartPolicy::Discard);
        let outcome = controller.start(Some(vec!["camA".into(), "camB".into()]));
        assert_eq!(outcome, StartOutcome::Started);
        assert_eq!(controller.state(), RecordingState::Recording);

        let routed = controller.on_frame_batch(&batch(&CAMERAS));
        assert_eq!(routed, RouteOutcome::Forwarded { slots: 4 });
        assert_eq!(
            log.frames(),
            vec![vec!["camA".to_string(), "camB".to_string(), String::new(), String::new()]]
        );
        assert_eq!(controller.current_session().unwrap().frames_routed, 1);
    }

    #[test]
    fn test_start_passes_save_path_and_timestamp() {
        let (controller, log) = multi_view(RestartPolicy::Discard);
        controller.start(None);

        match &log.calls()[0] {
            RecorderCall::Start {
                output_dir,
                timestamp,
                ..
            } => {
                assert_eq!(output_dir, &PathBuf::from("recordings"));
                // %Y_%m_%d_%H_%M_%S
                assert_eq!(timestamp.len(), 19);
                assert_eq!(timestamp.matches('_').count(), 5);
                assert_eq!(&controller.current_session().unwrap().timestamp, timestamp);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_frames_dropped_while_lock_held() {
        let (controller, log) = multi_view(RestartPolicy::Discard);
        controller.start(Some(vec!["camA".into()]));

        let guard = controller.inner.lock();
        assert_eq!(
            controller.on_frame_batch(&batch(&CAMERAS)),
            RouteOutcome::DroppedBusy
        );
        drop(guard);

        assert!(controller.on_frame_batch(&batch(&CAMERAS)).is_forwarded());
        assert_eq!(log.frames().len(), 1);
    }

    #[test]
    fn test_selection_applies_to_next_frame() {
        let (controller, log) = multi_view(RestartPolicy::Discard);
        controller.start(None);
        controller.on_frame_batch(&batch(&CAMERAS));

        let report = controller.select_cameras(&["camC", "camA", "camB", "camA", "camB"]);
        assert!(report.truncated());
        controller.on_frame_batch(&batch(&CAMERAS));

        let frames = log.frames();
        assert!(frames[0].iter().all(String::is_empty));
        assert_eq!(frames[1], vec!["camC", "camA", "camB", "camA"]);
    }

    #[test]
    fn test_stop_while_idle_is_reported_failure() {
        let (controller, log) = multi_view(RestartPolicy::Discard);
        let first = controller.stop(false, None);
        let second = controller.stop(false, None);
        assert_eq!(first, StopOutcome::not_recording());
        assert_eq!(first, second);
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_discard_always_succeeds() {
        let (controller, log) = multi_view(RestartPolicy::Discard);
        controller.start(None);
        let outcome = controller.stop(true, None);
        assert!(outcome.success);
        assert_eq!(outcome.path, None);
        assert_eq!(controller.state(), RecordingState::Idle);
        assert!(log
            .calls()
            .contains(&RecorderCall::Stop { discard: true, filename: None }));
    }

    #[test]
    fn test_keep_without_path_fails() {
        let (controller, log) = multi_view(RestartPolicy::Discard);
        log.set_stop_path(None);
        controller.start(None);
        let outcome = controller.stop(false, Some("named"));
        assert!(!outcome.success);
        assert_eq!(outcome.path_string(), "");
    }

    #[test]
    fn test_keep_returns_path() {
        let (controller, log) = multi_view(RestartPolicy::Discard);
        log.set_stop_path(Some(PathBuf::from("recordings/named.json")));
        controller.start(None);
        let outcome = controller.stop(false, Some("named"));
        assert!(outcome.success);
        assert_eq!(outcome.path_string(), "recordings/named.json");
        assert!(log.calls().contains(&RecorderCall::Stop {
            discard: false,
            filename: Some("named".to_string())
        }));
    }

    #[test]
    fn test_restart_discards_previous_session() {
        let (controller, log) = multi_view(RestartPolicy::Discard);
        controller.start(Some(vec!["camA".into()]));
        let first = controller.current_session().unwrap().id;
        controller.on_frame_batch(&batch(&CAMERAS));

        let outcome = controller.start(Some(vec!["camB".into()]));
        assert_eq!(outcome, StartOutcome::Restarted);
        assert_ne!(controller.current_session().unwrap().id, first);
        assert_eq!(controller.current_session().unwrap().frames_routed, 0);
        controller.on_frame_batch(&batch(&CAMERAS));

        let calls = log.calls();
        assert!(matches!(calls[0], RecorderCall::Start { .. }));
        assert!(matches!(calls[1], RecorderCall::Frame(_)));
        assert_eq!(calls[2], RecorderCall::Stop { discard: true, filename: None });
        assert!(matches!(calls[3], RecorderCall::Start { .. }));
        assert_eq!(
            calls[4],
            RecorderCall::Frame(vec!["camB".into(), String::new(), String::new(), String::new()])
        );
    }

    #[test]
    fn test_reject_policy_keeps_session() {
        let (controller, log) = multi_view(RestartPolicy::Reject);
        controller.start(Some(vec!["camA".into()]));
        let first = controller.current_session().unwrap().id;

        let outcome = controller.start(Some(vec!["camB".into()]));
        assert_eq!(outcome, StartOutcome::Rejected);
        assert_eq!(controller.current_session().unwrap().id, first);

        // Selection from the rejected request is not applied
        controller.on_frame_batch(&batch(&CAMERAS));
        assert_eq!(log.frames()[0][0], "camA");
    }

    #[test]
    fn test_reset_is_idempotent() {
        let (controller, log) = multi_view(RestartPolicy::Discard);
        assert!(!controller.reset());

        controller.start(None);
        assert!(controller.reset());
        assert!(!controller.reset());
        assert_eq!(controller.state(), RecordingState::Idle);

        let stops = log
            .calls()
            .into_iter()
            .filter(|c| matches!(c, RecorderCall::Stop { .. }))
            .count();
        assert_eq!(stops, 1);
    }

    #[test]
    fn test_drop_discards_active_recording() {
        let (controller, log) = multi_view(RestartPolicy::Discard);
        controller.start(None);
        drop(controller);
        assert_eq!(
            log.calls().last(),
            Some(&RecorderCall::Stop { discard: true, filename: None })
        );
    }

    #[test]
    fn test_events_are_broadcast() {
        let (controller, _log) = multi_view(RestartPolicy::Discard);
        let mut events = controller.subscribe();

        controller.start(None);
        let id = controller.current_session().unwrap().id;
        controller.select_cameras(&["camA"]);
        controller.stop(true, None);

        assert_eq!(events.try_recv().unwrap(), RecordingEvent::Started { session: id });
        assert_eq!(events.try_recv().unwrap(), RecordingEvent::SelectionChanged);
        assert_eq!(events.try_recv().unwrap(), RecordingEvent::Discarded { session: id });
    }

    #[test]
    fn test_start_with_cameras_reports_selection_change() {
        let (controller, _log) = multi_view(RestartPolicy::Discard);
        let mut events = controller.subscribe();

        controller.start(Some(vec!["camB".into()]));
        let id = controller.current_session().unwrap().id;

        assert_eq!(events.try_recv().unwrap(), RecordingEvent::SelectionChanged);
        assert_eq!(events.try_recv().unwrap(), RecordingEvent::Started { session: id });
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_dual_view_flags_applied_on_start() {
        let sensor = Arc::new(MonitorSensor::new(
            vec!["world_camera".into(), "robot_camera".into()],
            30.0,
        ));
        let (recorder, log) = CapturingRecorder::new();
        let controller = RecordingController::new(
            sensor,
            DualViewLayout::new(),
            Box::new(recorder),
            ControllerOptions::default(),
        );

        controller.start(ViewFlags {
            world_as_main_view: true,
            disable_window: true,
        });
        let outcome = controller.on_frame_batch(&batch(&["world_camera", "robot_camera"]));
        assert_eq!(outcome, RouteOutcome::Forwarded { slots: 1 });
        assert_eq!(log.frames(), vec![vec!["world_camera".to_string()]]);
    }

    #[test]
    fn test_no_frame_forwarded_while_idle_under_contention() {
        let (controller, log) = multi_view(RestartPolicy::Discard);
        let controller = Arc::new(controller);
        controller.select_cameras(&CAMERAS);

        let producer = {
            let controller = Arc::clone(&controller);
            thread::spawn(move || {
                let batch = batch(&CAMERAS);
                for _ in 0..20_000 {
                    controller.on_frame_batch(&batch);
                }
            })
        };

        for i in 0..200 {
            controller.start(None);
            thread::yield_now();
            controller.stop(i % 2 == 0, None);
        }
        producer.join().unwrap();

        // Replay the recorder's view: frames only between a start and a stop
        let mut recording = false;
        for call in log.calls() {
            match call {
                RecorderCall::Start { .. } => {
                    assert!(!recording);
                    recording = true;
                }
                RecorderCall::Stop { .. } => {
                    assert!(recording);
                    recording = false;
                }
                RecorderCall::Frame(_) => assert!(recording, "frame forwarded while idle"),
            }
        }
        assert!(!recording);
    }
}
