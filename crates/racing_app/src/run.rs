use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use racing_core::{FailureStage, ItemFailure, RunSummary};
use racing_engine::{
    collect_meeting_dates, destination_for, CancellationToken, Notification, Notifier,
    Orchestrator, OutboxNotifier, PageScraper, RaceCardScraper, RaceResultScraper,
    RankingScraper, SessionFactory, SheetWriter, SpeedProScraper, Target,
};
use racing_logging::{racing_error, racing_info, racing_warn};

use crate::config::RunConfig;

const DATES_FILE_PREFIX: &str = "all_dates";
const DATE_CATALOG: &str = "meeting dates";

/// Scrapes everything the config asks for in one orchestrated run.
///
/// Failures while listing meeting dates are recorded in the summary; the
/// current pages are still scraped.
pub fn execute(
    config: &RunConfig,
    token: &CancellationToken,
    sessions: Arc<dyn SessionFactory>,
    writer: Arc<dyn SheetWriter>,
    today: NaiveDate,
) -> RunSummary {
    let mut catalog_failures = Vec::new();
    let dates = match select_dates(config, sessions.as_ref(), writer.as_ref(), today) {
        Ok(dates) => dates,
        Err(failure) => {
            racing_error!("Skipping dated results: {}", failure.message);
            catalog_failures.push(failure);
            Vec::new()
        }
    };

    let mut targets = Vec::new();
    if config.include_current_pages {
        targets.extend(current_page_targets(config, today));
    }
    let results: Arc<dyn PageScraper> = Arc::new(RaceResultScraper);
    targets.extend(config.date_plan().targets(&dates, results));

    let orchestrator = Orchestrator::new(
        config.orchestrator_settings(),
        sessions,
        writer,
        token.clone(),
    );
    let mut summary = orchestrator.run(targets);
    summary.failures.extend(catalog_failures);
    summary
}

fn select_dates(
    config: &RunConfig,
    sessions: &dyn SessionFactory,
    writer: &dyn SheetWriter,
    today: NaiveDate,
) -> Result<Vec<String>, ItemFailure> {
    if !config.crawl_all_dates {
        if let Some(date) = &config.race_date {
            return Ok(vec![normalize_meeting_date(date)]);
        }
    }

    let destination = destination_for(
        &config.output_dir,
        DATES_FILE_PREFIX,
        &today.format("%Y/%m/%d").to_string(),
    );
    let dates = collect_meeting_dates(sessions, writer, &config.dates_url, &destination).map_err(
        |err| ItemFailure {
            identifier: DATE_CATALOG.to_string(),
            stage: FailureStage::Scrape,
            message: err.to_string(),
        },
    )?;
    let dates: Vec<String> = dates.iter().map(|d| normalize_meeting_date(d)).collect();

    if config.crawl_all_dates {
        Ok(dates)
    } else {
        // Single-date mode without an explicit date: the picker lists the latest meeting first.
        Ok(dates.into_iter().take(1).collect())
    }
}

/// The date picker shows `dd/mm/yyyy`; result URLs and file names use `yyyy/mm/dd`.
pub fn normalize_meeting_date(raw: &str) -> String {
    let raw = raw.trim();
    match NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        Ok(date) => date.format("%Y/%m/%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn current_page_targets(config: &RunConfig, today: NaiveDate) -> Vec<Target> {
    let day = today.format("%Y/%m/%d").to_string();
    let ranking: Arc<dyn PageScraper> = Arc::new(RankingScraper);
    let pages: [(&str, &str, Arc<dyn PageScraper>); 4] = [
        ("race_card", config.race_card_url.as_str(), Arc::new(RaceCardScraper)),
        ("trainer_ranking", config.trainer_ranking_url.as_str(), ranking.clone()),
        ("jockey_ranking", config.jockey_ranking_url.as_str(), ranking),
        ("speed_pro", config.speed_pro_url.as_str(), Arc::new(SpeedProScraper)),
    ];
    pages
        .into_iter()
        .map(|(key, url, scraper)| Target {
            identifier: key.to_string(),
            url: url.to_string(),
            destination: destination_for(&config.output_dir, key, &day),
            scraper,
        })
        .collect()
}

/// Hands the written files to the notifier when email is enabled. Failures are logged only.
pub fn notify_if_enabled(config: &RunConfig, summary: &RunSummary, today: NaiveDate) -> bool {
    if !config.send_email {
        return false;
    }
    if summary.saved.is_empty() {
        racing_warn!("Nothing was saved, skipping notification");
        return false;
    }
    let notifier = OutboxNotifier::new(config.notify.outbox_dir.clone());
    let notification = build_notification(config, summary, today);
    match notifier.notify(&notification) {
        Ok(()) => true,
        Err(err) => {
            racing_error!("Notification failed: {}", err);
            false
        }
    }
}

fn build_notification(config: &RunConfig, summary: &RunSummary, today: NaiveDate) -> Notification {
    let body = if config.notify.body.is_empty() {
        summary.to_string()
    } else {
        config.notify.body.clone()
    };
    Notification {
        recipients: config.notify.recipients.clone(),
        subject: format!("{} {}", config.notify.subject, today.format("%Y-%m-%d")),
        body,
        attachments: summary.saved.clone(),
    }
}

pub fn log_summary(summary: &RunSummary, output_dir: &Path) {
    racing_info!("Output directory: {:?}", output_dir);
    for failure in &summary.failures {
        racing_warn!("Failed {} ({}): {}", failure.identifier, failure.stage, failure.message);
    }
    for failure in &summary.save_failures {
        racing_warn!("Not saved {}: {}", failure.identifier, failure.message);
    }
    racing_info!("Summary: {}", summary);
}
