use crate::{decode, DecoderConfig, FrameMailbox, InferenceEngine, KeypointStore, PoseError};
use kine_video::Frame;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

/// Settings of the inference thread.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerConfig {
    idle_interval: Duration,
    decoder: DecoderConfig,
    thread_name: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            idle_interval: Duration::from_millis(1),
            decoder: DecoderConfig::default(),
            thread_name: "pose-inference".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Sleep between polls of an empty mailbox.
    pub fn with_idle_interval(mut self, idle_interval: Duration) -> Self {
        self.idle_interval = idle_interval;
        self
    }

    pub fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    pub fn idle_interval(&self) -> Duration {
        self.idle_interval
    }

    pub fn decoder(&self) -> &DecoderConfig {
        &self.decoder
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }
}

/// What one decode cycle did.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A pose (possibly empty) was published.
    Published { detected: bool },
    /// Nothing was published; the store still shows the previous pose.
    Skipped(PoseError),
}

/// Process one frame: infer, decode, publish.
///
/// Invalid frames, an engine that is not ready, and failed inference calls
/// skip the cycle and leave `store` untouched. A tensor the engine reports as
/// malformed decodes to the empty pose, which is published like any other
/// result.
pub fn run_cycle<E: InferenceEngine + ?Sized>(
    frame: Frame,
    engine: &mut E,
    decoder: &DecoderConfig,
    store: &KeypointStore,
) -> CycleOutcome {
    if !frame.is_valid() {
        return CycleOutcome::Skipped(PoseError::InvalidFrame {
            width: frame.width(),
            height: frame.height(),
            len: frame.pixels().len(),
        });
    }
    if !engine.is_ready() {
        let reason = engine
            .unavailable_reason()
            .unwrap_or_else(|| "not initialized".to_string());
        return CycleOutcome::Skipped(PoseError::EngineUnavailable(reason));
    }

    let pose = match engine.infer(&frame) {
        Ok(detections) => decode(&detections, frame.size(), decoder),
        Err(PoseError::MalformedTensor(msg)) => {
            log::debug!("engine output rejected: {msg}");
            crate::PoseEstimate::empty()
        }
        Err(error) => return CycleOutcome::Skipped(error),
    };

    store.publish(pose);
    CycleOutcome::Published {
        detected: !pose.is_empty(),
    }
}

/// Counters reported by a worker when it exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkerStats {
    pub cycles: u64,
    pub published: u64,
    pub detected: u64,
    pub skipped: u64,
}

impl WorkerStats {
    fn record(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::Published { detected } => {
                self.published += 1;
                if *detected {
                    self.detected += 1;
                }
            }
            CycleOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Dedicated thread draining a [`FrameMailbox`] into a [`KeypointStore`].
///
/// The worker is the store's only writer. Dropping it (or calling
/// [`InferenceWorker::stop`]) raises the stop flag and joins the thread, so no
/// publication can race with teardown of the shared state. Shutdown waits for
/// at most one idle interval plus an inference call already in progress.
pub struct InferenceWorker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<WorkerStats>>,
}

impl InferenceWorker {
    pub fn spawn<E: InferenceEngine + 'static>(
        engine: E,
        mailbox: Arc<FrameMailbox>,
        store: Arc<KeypointStore>,
        config: WorkerConfig,
    ) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn({
                let stop = Arc::clone(&stop);
                move || run_loop(engine, &mailbox, &store, &stop, &config)
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Ask the thread to exit after its current iteration, without waiting.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the thread and wait for it to exit.
    pub fn stop(mut self) -> WorkerStats {
        self.join()
    }

    fn join(&mut self) -> WorkerStats {
        self.request_stop();
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(stats)) => stats,
            Some(Err(_)) => {
                log::error!("inference worker panicked");
                WorkerStats::default()
            }
            None => WorkerStats::default(),
        }
    }
}

impl Drop for InferenceWorker {
    fn drop(&mut self) {
        self.join();
    }
}

fn run_loop<E: InferenceEngine>(
    mut engine: E,
    mailbox: &FrameMailbox,
    store: &KeypointStore,
    stop: &AtomicBool,
    config: &WorkerConfig,
) -> WorkerStats {
    log::info!("inference worker started");
    if !engine.is_ready() {
        log::error!(
            "inference engine unavailable ({}); frames will be discarded",
            engine
                .unavailable_reason()
                .unwrap_or_else(|| "not initialized".to_string())
        );
    }

    let mut stats = WorkerStats::default();
    while !stop.load(Ordering::Acquire) {
        let Some(frame) = mailbox.try_take() else {
            thread::sleep(config.idle_interval);
            continue;
        };

        let outcome = run_cycle(frame, &mut engine, &config.decoder, store);
        match &outcome {
            CycleOutcome::Skipped(PoseError::EngineUnavailable(_)) => {}
            CycleOutcome::Skipped(error @ PoseError::InvalidFrame { .. }) => {
                log::debug!("skipping cycle: {error}")
            }
            CycleOutcome::Skipped(error) => log::warn!("skipping cycle: {error}"),
            CycleOutcome::Published { .. } => {}
        }
        stats.record(&outcome);
    }

    log::info!(
        "inference worker stopped: {} cycles, {} published, {} with a subject, {} skipped",
        stats.cycles,
        stats.published,
        stats.detected,
        stats.skipped
    );
    stats
}
