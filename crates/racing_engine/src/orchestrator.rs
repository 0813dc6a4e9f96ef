use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use racing_core::{FailureStage, ItemFailure, RunSummary, SaveTask, ScrapeResult, WorkItem};
use racing_logging::{racing_debug, racing_error, racing_info, racing_warn, set_item_label};
use tokio_util::sync::CancellationToken;

use crate::filename::destination_for;
use crate::panic_message;
use crate::progress::ProgressReporter;
use crate::retry::RetryPolicy;
use crate::save_worker::{SaveReport, SaveWorker};
use crate::scrape::PageScraper;
use crate::session::SessionFactory;
use crate::workbook::SheetWriter;

pub const DATE_PLACEHOLDER: &str = "{date}";

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub worker_count: usize,
    pub save_poll_interval: Duration,
    pub retry: RetryPolicy,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            worker_count: 4,
            save_poll_interval: Duration::from_millis(500),
            retry: RetryPolicy::default(),
        }
    }
}

/// One page to scrape and where its workbook goes.
#[derive(Clone)]
pub struct Target {
    pub identifier: String,
    pub url: String,
    pub destination: PathBuf,
    pub scraper: Arc<dyn PageScraper>,
}

/// How dated targets are built: a URL template containing `{date}` and a file prefix.
#[derive(Debug, Clone)]
pub struct DatePlan {
    pub url_template: String,
    pub output_dir: PathBuf,
    pub file_prefix: String,
}

impl DatePlan {
    pub fn url_for(&self, date: &str) -> String {
        self.url_template.replace(DATE_PLACEHOLDER, date.trim())
    }

    pub fn destination_for(&self, date: &str) -> PathBuf {
        destination_for(&self.output_dir, &self.file_prefix, date.trim())
    }

    pub fn targets(&self, dates: &[String], scraper: Arc<dyn PageScraper>) -> Vec<Target> {
        dates
            .iter()
            .map(|date| Target {
                identifier: date.trim().to_string(),
                url: self.url_for(date),
                destination: self.destination_for(date),
                scraper: scraper.clone(),
            })
            .collect()
    }
}

struct Job {
    item: WorkItem,
    scraper: Arc<dyn PageScraper>,
}

#[derive(Default)]
struct WorkerTally {
    dispatched: usize,
    scraped: usize,
    discarded: usize,
    failures: Vec<ItemFailure>,
}

/// Runs one scrape per target on a bounded worker pool and funnels results to a
/// single save worker.
///
/// Each worker owns a fresh session per work item. A failed or empty item is
/// logged and skipped; it never affects other items. Once `token` is cancelled
/// no new item starts, finished scrapes are not enqueued and the save queue is
/// discarded rather than drained.
pub struct Orchestrator {
    settings: OrchestratorSettings,
    sessions: Arc<dyn SessionFactory>,
    writer: Arc<dyn SheetWriter>,
    token: CancellationToken,
}

impl Orchestrator {
    pub fn new(
        settings: OrchestratorSettings,
        sessions: Arc<dyn SessionFactory>,
        writer: Arc<dyn SheetWriter>,
        token: CancellationToken,
    ) -> Self {
        Self {
            settings,
            sessions,
            writer,
            token,
        }
    }

    /// Scrapes one page per date with `scraper`, naming outputs by `plan`.
    pub fn run_dates(
        &self,
        dates: &[String],
        plan: &DatePlan,
        scraper: Arc<dyn PageScraper>,
    ) -> RunSummary {
        self.run(plan.targets(dates, scraper))
    }

    pub fn run(&self, targets: Vec<Target>) -> RunSummary {
        let started = Instant::now();
        let jobs = plan_jobs(targets);
        let total = jobs.len();
        let worker_count = self.settings.worker_count.max(1).min(total.max(1));
        racing_info!("Starting run: {} item(s) on {} worker(s)", total, worker_count);

        let (queue_tx, queue_rx) = mpsc::channel::<SaveTask>();
        let save_worker = match SaveWorker::spawn(
            queue_rx,
            self.writer.clone(),
            self.token.clone(),
            self.settings.save_poll_interval,
        ) {
            Ok(worker) => Some(worker),
            Err(err) => {
                racing_error!("Could not start save worker: {}", err);
                None
            }
        };

        let tally = Mutex::new(WorkerTally::default());
        if save_worker.is_some() {
            let next = AtomicUsize::new(0);
            let reporter = ProgressReporter::new(started);
            thread::scope(|scope| {
                for worker_id in 0..worker_count {
                    let ctx = WorkerContext {
                        orchestrator: self,
                        jobs: &jobs,
                        next: &next,
                        reporter: &reporter,
                        tally: &tally,
                        queue: queue_tx.clone(),
                    };
                    let spawned = thread::Builder::new()
                        .name(format!("scrape-worker-{worker_id}"))
                        .spawn_scoped(scope, move || ctx.run());
                    if let Err(err) = spawned {
                        racing_error!("Could not start worker {}: {}", worker_id, err);
                    }
                }
            });
        }
        // Closing the last sender is the save worker's stop signal.
        drop(queue_tx);

        let report = save_worker.map(SaveWorker::finish).unwrap_or_default();
        let tally = tally.into_inner().unwrap_or_else(PoisonError::into_inner);
        let summary = summarize(tally, report, self.token.is_cancelled(), started.elapsed());
        racing_info!("Run {}", summary);
        summary
    }

    fn process(&self, item: &WorkItem, scraper: &dyn PageScraper) -> Result<ScrapeResult, ItemFailure> {
        let retry = self.settings.retry;
        let mut outcome = self.attempt(item, scraper);
        for attempt in 2..=retry.attempts() {
            let Err(failure) = &outcome else {
                break;
            };
            racing_warn!(
                "Attempt {} of {} failed ({}: {}), retrying",
                attempt - 1,
                retry.attempts(),
                failure.stage,
                failure.message
            );
            if !retry.wait(attempt, &self.token) {
                break;
            }
            outcome = self.attempt(item, scraper);
        }
        outcome
    }

    fn attempt(&self, item: &WorkItem, scraper: &dyn PageScraper) -> Result<ScrapeResult, ItemFailure> {
        let fail = |stage, message: String| ItemFailure {
            identifier: item.identifier.clone(),
            stage,
            message,
        };

        let mut session = self
            .sessions
            .create()
            .map_err(|err| fail(FailureStage::Session, err.to_string()))?;
        racing_debug!("Scraping {} with {}", item.url, scraper.name());
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            scraper.scrape(session.as_mut(), &item.url)
        }));
        // The session is released here, before the result is handled.
        drop(session);

        match outcome {
            Ok(Ok(result)) if !result.is_empty() => Ok(result),
            Ok(Ok(_)) => Err(fail(FailureStage::EmptyResult, "no tables found".to_string())),
            Ok(Err(err)) => Err(fail(FailureStage::Scrape, err.to_string())),
            Err(payload) => Err(fail(FailureStage::Panicked, panic_message(payload.as_ref()))),
        }
    }
}

struct WorkerContext<'a> {
    orchestrator: &'a Orchestrator,
    jobs: &'a [Job],
    next: &'a AtomicUsize,
    reporter: &'a ProgressReporter,
    tally: &'a Mutex<WorkerTally>,
    queue: Sender<SaveTask>,
}

impl WorkerContext<'_> {
    fn run(self) {
        let token = &self.orchestrator.token;
        loop {
            if token.is_cancelled() {
                break;
            }
            let index = self.next.fetch_add(1, Ordering::SeqCst);
            let Some(job) = self.jobs.get(index) else {
                break;
            };
            set_item_label(Some(&job.item.identifier));
            self.update(|t| t.dispatched += 1);
            self.handle(job);
            set_item_label(None);
        }
    }

    fn handle(&self, job: &Job) {
        let item = &job.item;
        match self.orchestrator.process(item, job.scraper.as_ref()) {
            Ok(result) => {
                self.update(|t| t.scraped += 1);
                if self.orchestrator.token.is_cancelled() {
                    self.update(|t| t.discarded += 1);
                    self.reporter.report(item, "scraped after cancellation, not saved");
                    return;
                }
                let task = SaveTask {
                    identifier: item.identifier.clone(),
                    destination: item.destination.clone(),
                    result,
                };
                if self.queue.send(task).is_err() {
                    self.update(|t| t.discarded += 1);
                    self.reporter.report(item, "save queue closed, not saved");
                } else {
                    self.reporter.report(item, "queued for save");
                }
            }
            Err(failure) => {
                racing_warn!("Skipping {}: {} ({})", item.url, failure.message, failure.stage);
                self.reporter.report(item, &format!("failed ({})", failure.stage));
                self.update(|t| t.failures.push(failure));
            }
        }
    }

    fn update(&self, f: impl FnOnce(&mut WorkerTally)) {
        let mut tally = self.tally.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut tally);
    }
}

/// Builds numbered work items, dropping targets whose destination repeats an
/// earlier one so every save task writes a distinct file.
fn plan_jobs(targets: Vec<Target>) -> Vec<Job> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let unique: Vec<Target> = targets
        .into_iter()
        .filter(|target| {
            let fresh = seen.insert(target.destination.clone());
            if !fresh {
                racing_warn!(
                    "Ignoring duplicate target {} (destination {:?})",
                    target.identifier,
                    target.destination
                );
            }
            fresh
        })
        .collect();

    let total = unique.len();
    unique
        .into_iter()
        .enumerate()
        .map(|(position, target)| Job {
            item: WorkItem {
                identifier: target.identifier,
                url: target.url,
                destination: target.destination,
                index: position + 1,
                total,
            },
            scraper: target.scraper,
        })
        .collect()
}

fn summarize(
    tally: WorkerTally,
    report: SaveReport,
    cancelled: bool,
    elapsed: Duration,
) -> RunSummary {
    RunSummary {
        dispatched: tally.dispatched,
        scraped: tally.scraped,
        saved: report.saved,
        failures: tally.failures,
        save_failures: report.failures,
        discarded: tally.discarded + report.discarded,
        cancelled,
        elapsed,
    }
}

/// Destinations a run over `dates` would produce, in input order.
pub fn planned_destinations(plan: &DatePlan, dates: &[String]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    dates
        .iter()
        .map(|date| plan.destination_for(date))
        .filter(|path| seen.insert(path.clone()))
        .collect()
}
