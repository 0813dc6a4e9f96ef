use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use racing_core::{ProgressLine, WorkItem};
use racing_logging::racing_info;

/// Serializes progress lines from concurrent workers.
#[derive(Debug)]
pub struct ProgressReporter {
    started: Instant,
    print_lock: Mutex<()>,
}

impl ProgressReporter {
    pub fn new(started: Instant) -> Self {
        Self {
            started,
            print_lock: Mutex::new(()),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn line(&self, item: &WorkItem, status: &str) -> ProgressLine {
        ProgressLine {
            index: item.index,
            total: item.total,
            identifier: item.identifier.clone(),
            status: status.to_string(),
            elapsed: self.elapsed(),
        }
    }

    pub fn report(&self, item: &WorkItem, status: &str) {
        let line = self.line(item, status);
        // A poisoned lock only means another worker panicked mid-print.
        let _guard = self.print_lock.lock().unwrap_or_else(PoisonError::into_inner);
        racing_info!("{}", line);
    }
}
