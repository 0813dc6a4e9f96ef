use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use racing_core::WorkItem;
use racing_engine::ProgressReporter;

fn item(index: usize, total: usize) -> WorkItem {
    WorkItem {
        identifier: format!("2024/01/{index:02}"),
        url: format!("https://example.test/results?date=2024/01/{index:02}"),
        destination: PathBuf::from(format!("out/race_results_2024_01_{index:02}.xlsx")),
        index,
        total,
    }
}

#[test]
fn line_carries_position_and_status() {
    let reporter = ProgressReporter::new(Instant::now());
    let line = reporter.line(&item(2, 8), "queued for save");
    assert_eq!(line.index, 2);
    assert_eq!(line.total, 8);
    assert_eq!(line.identifier, "2024/01/02");
    assert_eq!(line.status, "queued for save");
    assert!(line.to_string().starts_with("[2/8]"));
}

#[test]
fn concurrent_reports_complete_without_deadlock() {
    racing_logging::initialize_for_tests();
    let reporter = ProgressReporter::new(Instant::now());
    let workers = 8;
    let reports_each = 25;

    let started = Instant::now();
    thread::scope(|scope| {
        for worker in 0..workers {
            let reporter = &reporter;
            scope.spawn(move || {
                for n in 0..reports_each {
                    reporter.report(&item(worker + 1, workers), &format!("step {n}"));
                }
            });
        }
    });

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(reporter.elapsed() >= Duration::ZERO);
}
