use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use racing_core::{FailureStage, ItemFailure, SaveTask};
use racing_logging::{racing_error, racing_info, racing_warn};
use tokio_util::sync::CancellationToken;

use crate::panic_message;
use crate::workbook::SheetWriter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub saved: Vec<PathBuf>,
    pub failures: Vec<ItemFailure>,
    /// Tasks dropped unwritten because the run was cancelled.
    pub discarded: usize,
}

/// Single consumer that performs every disk write of a run, in enqueue order.
///
/// The worker stops once all senders are dropped and the queue is empty. If the
/// run is cancelled, every task still queued or sent afterwards is discarded
/// instead of written.
pub struct SaveWorker {
    handle: JoinHandle<SaveReport>,
}

impl SaveWorker {
    pub fn spawn(
        queue: Receiver<SaveTask>,
        writer: Arc<dyn SheetWriter>,
        token: CancellationToken,
        poll_interval: Duration,
    ) -> std::io::Result<Self> {
        let handle = thread::Builder::new()
            .name("save-worker".to_string())
            .spawn(move || drain(queue, writer.as_ref(), &token, poll_interval))?;
        Ok(Self { handle })
    }

    /// Waits for the queue to drain (or for cancellation) and returns what was written.
    pub fn finish(self) -> SaveReport {
        match self.handle.join() {
            Ok(report) => report,
            Err(payload) => {
                racing_error!("Save worker panicked: {}", panic_message(payload.as_ref()));
                SaveReport::default()
            }
        }
    }
}

fn drain(
    queue: Receiver<SaveTask>,
    writer: &dyn SheetWriter,
    token: &CancellationToken,
    poll_interval: Duration,
) -> SaveReport {
    let mut report = SaveReport::default();
    loop {
        match queue.recv_timeout(poll_interval) {
            Ok(task) => {
                if token.is_cancelled() {
                    report.discarded += 1 + discard_until_closed(&queue);
                    break;
                }
                save(task, writer, &mut report);
            }
            Err(RecvTimeoutError::Timeout) => {
                if token.is_cancelled() {
                    report.discarded += discard_until_closed(&queue);
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    if report.discarded > 0 {
        racing_warn!("Run cancelled, discarded {} queued save(s)", report.discarded);
    }
    report
}

/// Blocks until every sender is gone, so tasks from workers still finishing are counted too.
fn discard_until_closed(queue: &Receiver<SaveTask>) -> usize {
    queue.iter().count()
}

fn save(task: SaveTask, writer: &dyn SheetWriter, report: &mut SaveReport) {
    let SaveTask {
        identifier,
        destination,
        result,
    } = task;
    if result.has_no_rows() {
        racing_warn!("{}: every table is empty, writing placeholder sheet", identifier);
    }
    let tables = result.into_writable();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| writer.write(&tables, &destination)));
    let message = match outcome {
        Ok(Ok(path)) => {
            racing_info!("{}: saved {} sheet(s) to {:?}", identifier, tables.len(), path);
            report.saved.push(path);
            return;
        }
        Ok(Err(err)) => err.to_string(),
        Err(payload) => format!("writer panicked: {}", panic_message(payload.as_ref())),
    };
    racing_error!("{}: failed to save {:?}: {}", identifier, destination, message);
    report.failures.push(ItemFailure {
        identifier,
        stage: FailureStage::Save,
        message,
    });
}
