use crate::PoseEstimate;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Published {
    generation: u64,
    pose: PoseEstimate,
}

/// Latest-value cache between the inference worker and pose consumers.
///
/// One writer publishes whole poses, any number of readers copy them out.
/// Readers hold the lock only for the copy of a fixed-size pose, and never
/// see keypoints from two different cycles.
#[derive(Debug, Default)]
pub struct KeypointStore {
    inner: RwLock<Published>,
}

impl KeypointStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Published> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Published> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the visible pose. Publishing the empty pose clears it.
    pub fn publish(&self, pose: PoseEstimate) {
        let mut published = self.write();
        published.pose = pose;
        published.generation += 1;
    }

    /// Copy of the most recently published pose.
    pub fn snapshot(&self) -> PoseEstimate {
        self.read().pose
    }

    /// Copy of the latest pose together with the number of publications so far.
    ///
    /// The generation only grows, so a reader polling faster than the worker
    /// publishes can tell a fresh result from one it has already seen.
    pub fn snapshot_with_generation(&self) -> (u64, PoseEstimate) {
        let published = self.read();
        (published.generation, published.pose)
    }

    pub fn generation(&self) -> u64 {
        self.read().generation
    }
}
