//! Standalone simulation host
//!
//! Stands in for the simulator: a producer thread renders synthetic camera
//! batches at the sensor update rate while control requests arrive as JSON
//! lines on stdin. Responses are printed as JSON lines on stdout.

use crate::camera::{Frame, ImageData};
use crate::commands::{ControlRequest, Monitor};
use crate::config::load_config;
use crate::plugin::{MonitorPlugin, MultiViewMonitorPlugin, VideoMonitorPlugin};
use crate::recorder::ManifestRecorder;
use crate::router::dual_view::CAMERA_NAMES;
use crate::sensor::{MonitorSensor, SystemClock, WorldClock};
use crate::utils::error::{ErrorResponse, MonitorError};
use anyhow::{bail, Context};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const USAGE: &str = "usage: video-monitor <config.json> <multi|dual> [camera,camera,...] [rate_hz]";
const DEFAULT_RATE_HZ: f64 = 30.0;
const IMAGE_SIZE: u32 = 8;

/// Command line of the simulation host
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationArgs {
    pub config: PathBuf,
    pub dual_view: bool,
    pub cameras: Vec<String>,
    pub update_rate: f64,
}

impl SimulationArgs {
    pub fn parse(args: &[String]) -> anyhow::Result<Self> {
        let (Some(config), Some(variant)) = (args.first(), args.get(1)) else {
            bail!(USAGE);
        };

        let dual_view = match variant.as_str() {
            "multi" => false,
            "dual" => true,
            other => bail!("unknown monitor variant '{}'\n{}", other, USAGE),
        };

        let cameras = match args.get(2) {
            Some(list) => list
                .split(',')
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
            None if dual_view => CAMERA_NAMES.iter().map(|n| n.to_string()).collect(),
            None => bail!("the multi-view monitor needs a camera list\n{}", USAGE),
        };

        let update_rate = match args.get(3) {
            Some(rate) => rate
                .parse::<f64>()
                .with_context(|| format!("invalid update rate '{}'", rate))?,
            None => DEFAULT_RATE_HZ,
        };
        if !update_rate.is_finite() || update_rate <= 0.0 {
            bail!("update rate must be a positive number, got '{}'", update_rate);
        }

        Ok(Self {
            config: PathBuf::from(config),
            dual_view,
            cameras,
            update_rate,
        })
    }
}

/// Load a monitor and serve control requests until stdin closes
pub async fn run(args: SimulationArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)
        .with_context(|| format!("failed to read configuration {:?}", args.config))?;
    let sensor = Arc::new(MonitorSensor::new(args.cameras.clone(), args.update_rate));
    let clock: Arc<dyn WorldClock> = Arc::new(SystemClock::new());

    let monitor = if args.dual_view {
        Monitor::DualView(Arc::new(VideoMonitorPlugin::load(
            sensor.clone(),
            &config,
            clock.clone(),
            ManifestRecorder::new,
        )?))
    } else {
        Monitor::MultiView(Arc::new(MultiViewMonitorPlugin::load(
            sensor.clone(),
            &config,
            clock.clone(),
            ManifestRecorder::new,
        )?))
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    let producer = spawn_producer(monitor.plugin(), sensor, clock, shutdown.clone());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ControlRequest>(line) {
            Ok(request) => match monitor.dispatch(request).await {
                Ok(value) => value,
                Err(message) => serde_json::to_value(ErrorResponse {
                    code: "REQUEST_FAILED".to_string(),
                    message,
                })?,
            },
            Err(e) => serde_json::to_value(ErrorResponse::from(MonitorError::from(e)))?,
        };
        println!("{}", response);
    }

    tracing::info!("Control input closed; shutting down");
    shutdown.store(true, Ordering::Release);
    if producer.join().is_err() {
        bail!("producer thread panicked");
    }
    monitor.plugin().reset();

    Ok(())
}

/// Deliver one synthetic batch per update period until shutdown
fn spawn_producer(
    plugin: Arc<dyn MonitorPlugin>,
    sensor: Arc<MonitorSensor>,
    clock: Arc<dyn WorldClock>,
    shutdown: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    let period = Duration::from_secs_f64(1.0 / sensor.update_rate());

    thread::spawn(move || {
        while !shutdown.load(Ordering::Acquire) {
            // Skip rendering entirely while nothing is recording
            if sensor.is_recording() {
                let batch = render_batch(sensor.camera_names(), clock.real_time());
                plugin.on_new_images(&batch);
            }
            thread::sleep(period);
        }
    })
}

/// Synthetic images, one per camera, in batch order
fn render_batch(cameras: &[String], timestamp: Duration) -> Vec<Frame> {
    let pixels = (IMAGE_SIZE * IMAGE_SIZE * 3) as usize;
    cameras
        .iter()
        .enumerate()
        .map(|(i, camera)| {
            Arc::new(ImageData::new(
                camera.as_str(),
                IMAGE_SIZE,
                IMAGE_SIZE,
                timestamp,
                vec![i as u8; pixels],
            ))
        })
        .collect()
}
