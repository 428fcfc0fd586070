//! Idle / Processing state

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag that admits one request at a time
#[derive(Debug, Clone, Default)]
pub struct ProcessingFlag {
    busy: Arc<AtomicBool>,
}

impl ProcessingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter Processing, or `None` if a request is already running.
    ///
    /// The returned guard puts the flag back to Idle when dropped,
    /// whatever happened while it was held.
    pub fn try_begin(&self) -> Option<ProcessingGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard {
                busy: self.busy.clone(),
            })
    }

    pub fn is_processing(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of one request
#[derive(Debug)]
pub struct ProcessingGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
