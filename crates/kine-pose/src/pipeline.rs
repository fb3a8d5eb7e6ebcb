use crate::{
    worker::WorkerStats, FrameMailbox, InferenceEngine, InferenceWorker, KeypointStore,
    MailboxPolicy, PoseEstimate, PutOutcome, WorkerConfig,
};
use kine_video::Frame;
use std::sync::Arc;

/// Settings for a [`PosePipeline`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineConfig {
    mailbox_policy: MailboxPolicy,
    worker: WorkerConfig,
}

impl PipelineConfig {
    pub fn with_mailbox_policy(mut self, policy: MailboxPolicy) -> Self {
        self.mailbox_policy = policy;
        self
    }

    pub fn with_worker(mut self, worker: WorkerConfig) -> Self {
        self.worker = worker;
        self
    }

    pub fn mailbox_policy(&self) -> MailboxPolicy {
        self.mailbox_policy
    }

    pub fn worker(&self) -> &WorkerConfig {
        &self.worker
    }
}

/// Mailbox, worker and store wired together.
///
/// The capture side calls [`submit`](Self::submit) for every frame and
/// [`snapshot`](Self::snapshot) whenever it wants the latest pose; neither
/// call waits on inference.
pub struct PosePipeline {
    mailbox: Arc<FrameMailbox>,
    store: Arc<KeypointStore>,
    worker: InferenceWorker,
}

impl PosePipeline {
    /// Create the shared state and start the inference thread.
    pub fn start<E: InferenceEngine + 'static>(
        engine: E,
        config: PipelineConfig,
    ) -> std::io::Result<Self> {
        let mailbox = Arc::new(FrameMailbox::with_policy(config.mailbox_policy));
        let store = Arc::new(KeypointStore::new());
        let worker = InferenceWorker::spawn(
            engine,
            Arc::clone(&mailbox),
            Arc::clone(&store),
            config.worker,
        )?;

        Ok(Self {
            mailbox,
            store,
            worker,
        })
    }

    /// Hand a frame to the worker; never blocks.
    pub fn submit(&self, frame: Frame) -> PutOutcome<Frame> {
        self.mailbox.try_put(frame)
    }

    pub fn snapshot(&self) -> PoseEstimate {
        self.store.snapshot()
    }

    /// Shared handle for consumers living on other threads.
    pub fn store(&self) -> Arc<KeypointStore> {
        Arc::clone(&self.store)
    }

    pub fn mailbox(&self) -> &FrameMailbox {
        &self.mailbox
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_running()
    }

    /// Stop and join the worker.
    pub fn shutdown(self) -> WorkerStats {
        let stats = self.worker.stop();
        log::info!(
            "pipeline shut down: {} frames accepted, {} dropped",
            self.mailbox.accepted_count(),
            self.mailbox.dropped_count()
        );
        stats
    }
}
