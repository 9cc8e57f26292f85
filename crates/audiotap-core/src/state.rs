//! Activation and video-blocking flags shared by the host, the preference
//! load, and the classifier.

use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide service flags. Both start `false`.
#[derive(Debug, Default)]
pub struct ServiceState {
    active: AtomicBool,
    block_video: AtomicBool,
}

/// Point-in-time copy of [`ServiceState`] used for one classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateSnapshot {
    pub active: bool,
    pub block_video: bool,
}

impl ServiceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn set_block_video(&self, block: bool) {
        self.block_video.store(block, Ordering::Release);
    }

    pub fn is_blocking_video(&self) -> bool {
        self.block_video.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            active: self.is_active(),
            block_video: self.is_blocking_video(),
        }
    }
}
