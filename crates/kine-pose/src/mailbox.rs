use kine_video::Frame;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex, MutexGuard,
};

/// What happens to a frame offered while the slot is still occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailboxPolicy {
    /// Keep the pending frame, discard the new one.
    #[default]
    DropNewest,
    /// Evict the pending frame in favour of the new one.
    LatestWins,
}

/// Result of [`FrameMailbox::try_put`]. Discarded frames are handed back so
/// the caller can recycle their buffers.
#[derive(Debug, PartialEq)]
#[must_use]
pub enum PutOutcome<T> {
    /// The slot was empty and now holds the frame.
    Stored,
    /// The slot was busy; this is the frame that was offered.
    Dropped(T),
    /// The slot was busy; the offered frame replaced this pending one.
    Replaced(T),
}

impl<T> PutOutcome<T> {
    /// True when the offered frame is now in the slot.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, PutOutcome::Dropped(_))
    }
}

/// Single-slot hand-off between the capture context and the inference worker.
///
/// Neither side ever blocks beyond the O(1) critical section: `try_put` never
/// waits for the consumer and `try_take` never waits for a frame. Frames are
/// moved in and out, their pixels are never copied.
#[derive(Debug)]
pub struct FrameMailbox<T = Frame> {
    slot: Mutex<Option<T>>,
    policy: MailboxPolicy,
    accepted: AtomicU64,
    dropped: AtomicU64,
}

impl<T> Default for FrameMailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FrameMailbox<T> {
    /// An empty mailbox with the drop-newest policy.
    pub fn new() -> Self {
        Self::with_policy(MailboxPolicy::default())
    }

    pub fn with_policy(policy: MailboxPolicy) -> Self {
        Self {
            slot: Mutex::new(None),
            policy,
            accepted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<T>> {
        // an Option swap cannot be left half done, so a poisoned lock is still consistent
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Offer a frame without blocking.
    pub fn try_put(&self, frame: T) -> PutOutcome<T> {
        let mut slot = self.slot();
        let outcome = match (slot.is_some(), self.policy) {
            (false, _) => {
                *slot = Some(frame);
                PutOutcome::Stored
            }
            (true, MailboxPolicy::DropNewest) => PutOutcome::Dropped(frame),
            (true, MailboxPolicy::LatestWins) => match slot.replace(frame) {
                Some(evicted) => PutOutcome::Replaced(evicted),
                None => PutOutcome::Stored,
            },
        };
        drop(slot);

        if outcome.is_accepted() {
            self.accepted.fetch_add(1, Ordering::Relaxed);
        }
        if !matches!(outcome, PutOutcome::Stored) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        outcome
    }

    /// Take the pending frame, if any, without blocking.
    pub fn try_take(&self) -> Option<T> {
        self.slot().take()
    }

    pub fn is_occupied(&self) -> bool {
        self.slot().is_some()
    }

    pub fn policy(&self) -> MailboxPolicy {
        self.policy
    }

    /// Frames that entered the slot.
    pub fn accepted_count(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Frames discarded, whether offered or evicted.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
