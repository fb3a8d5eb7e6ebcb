use kine_base::{init_file_logger, init_stdout_logger, log_fatal, Vec2};
use kine_com::{PoseSender, PoseSenderConfig, DEFAULT_TARGET};
use kine_pose::{
    DecoderConfig, Device, OnnxEngine, PipelineConfig, PosePipeline, WorkerConfig,
};
use kine_video::{FrameSource, V4l2Camera, V4l2Config};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

const WIDTH: usize = 640;
const HEIGHT: usize = 480;
const MODEL_INPUT: usize = 320;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match env::var("KINE_LOG_DIR") {
        Ok(dir) => init_file_logger(dir)?,
        Err(_) => init_stdout_logger(),
    }

    let model_path: PathBuf = env::var("KINE_MODEL_PATH")
        .unwrap_or_else(|_| "models/yolov8n-pose.onnx".to_string())
        .into();
    let target: SocketAddr = match env::var("KINE_OSC_ADDR") {
        Ok(addr) => addr.parse()?,
        Err(_) => DEFAULT_TARGET,
    };

    let mut camera = match V4l2Camera::open(&V4l2Config::default().with_size(WIDTH, HEIGHT)) {
        Ok(camera) => camera,
        Err(e) => log_fatal!("cannot open camera: {e}"),
    };
    let frame_size = camera.size();

    let input_size = Vec2::new(MODEL_INPUT, MODEL_INPUT);
    let device = Device::preferred();
    log::info!("model {} on {}", model_path.display(), device);
    let engine = OnnxEngine::load_or_unavailable(&model_path, device, input_size);

    let config = PipelineConfig::default().with_worker(
        WorkerConfig::default()
            .with_decoder(DecoderConfig::default().with_model_input(MODEL_INPUT, MODEL_INPUT)),
    );
    let pipeline = PosePipeline::start(engine, config)?;
    let store = pipeline.store();

    let sender = PoseSender::bind(PoseSenderConfig::default().with_target(target)).await?;
    sender.send_start(frame_size).await?;

    // capture runs on its own thread; each captured frame triggers one /poses message
    let stop = Arc::new(AtomicBool::new(false));
    let (tick_tx, mut tick_rx) = mpsc::channel::<()>(1);
    let capture = tokio::task::spawn_blocking({
        let stop = Arc::clone(&stop);
        move || {
            while !stop.load(Ordering::Acquire) {
                match camera.capture() {
                    Ok(frame) => {
                        let _ = pipeline.submit(frame);
                    }
                    Err(e) => {
                        log::warn!("capture failed: {e}");
                        std::thread::sleep(Duration::from_millis(10));
                        continue;
                    }
                }
                if let Err(TrySendError::Closed(_)) = tick_tx.try_send(()) {
                    break;
                }
            }
            pipeline
        }
    });

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                log::info!("interrupted, shutting down");
                break;
            }
            tick = tick_rx.recv() => {
                if tick.is_none() {
                    break;
                }
                if let Err(e) = sender.send_pose(&store.snapshot()).await {
                    log::warn!("pose send failed: {e}");
                }
            }
        }
    }

    stop.store(true, Ordering::Release);
    drop(tick_rx);
    let pipeline = capture.await?;
    let stats = pipeline.shutdown();
    log::info!(
        "done: {} poses published, {} with a subject",
        stats.published,
        stats.detected
    );
    Ok(())
}
