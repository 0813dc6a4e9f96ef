//! Run configuration, read from a RON file before any scraping starts.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use racing_engine::{
    DatePlan, FetchSettings, OrchestratorSettings, RetryPolicy, DATE_PLACEHOLDER,
};
use serde::Deserialize;
use thiserror::Error;

use crate::logging::LoggingConfig;

pub const DEFAULT_CONFIG_FILENAME: &str = "racing.ron";

const SITE: &str = "https://racing.hkjc.com/racing";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub recipients: Vec<String>,
    pub subject: String,
    /// Empty means "use the run summary".
    pub body: String,
    pub outbox_dir: PathBuf,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            recipients: Vec::new(),
            subject: "Racing data export".to_string(),
            body: String::new(),
            outbox_dir: PathBuf::from("outbox"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub send_email: bool,
    pub crawl_all_dates: bool,
    pub worker_count: usize,
    /// Single-date mode target; `None` picks the most recent meeting.
    pub race_date: Option<String>,
    pub include_current_pages: bool,
    pub output_dir: PathBuf,
    pub results_url_template: String,
    pub dates_url: String,
    pub race_card_url: String,
    pub trainer_ranking_url: String,
    pub jockey_ranking_url: String,
    pub speed_pro_url: String,
    pub page_timeout_secs: u64,
    pub save_poll_interval_ms: u64,
    /// How long an interrupted run may keep going before the process exits.
    /// Must exceed `page_timeout_secs` so an in-flight page finishes first.
    pub grace_period_secs: u64,
    pub retry: RetryConfig,
    pub notify: NotifyConfig,
    pub logging: LoggingConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            send_email: false,
            crawl_all_dates: false,
            worker_count: 4,
            race_date: None,
            include_current_pages: true,
            output_dir: PathBuf::from("output"),
            results_url_template: format!(
                "{SITE}/information/English/Racing/LocalResults.aspx?RaceDate={DATE_PLACEHOLDER}"
            ),
            dates_url: format!("{SITE}/information/English/Racing/LocalResults.aspx"),
            race_card_url: format!("{SITE}/information/English/racing/RaceCard.aspx"),
            trainer_ranking_url: format!("{SITE}/information/English/Trainers/TrainerRanking.aspx"),
            jockey_ranking_url: format!("{SITE}/information/English/Jockey/JockeyRanking.aspx"),
            speed_pro_url: format!("{SITE}/speedpro/english/formguide/formguide.html"),
            page_timeout_secs: 15,
            save_poll_interval_ms: 500,
            grace_period_secs: 30,
            retry: RetryConfig::default(),
            notify: NotifyConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RunConfig {
    /// Loads `path`. A missing file is an error only when `required`; otherwise defaults apply.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::Invalid("worker_count must be at least 1".into()));
        }
        if !self.results_url_template.contains(DATE_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "results_url_template must contain {DATE_PLACEHOLDER}"
            )));
        }
        let urls = [
            ("results_url_template", &self.results_url_template),
            ("dates_url", &self.dates_url),
            ("race_card_url", &self.race_card_url),
            ("trainer_ranking_url", &self.trainer_ranking_url),
            ("jockey_ranking_url", &self.jockey_ranking_url),
            ("speed_pro_url", &self.speed_pro_url),
        ];
        if let Some((name, _)) = urls
            .iter()
            .find(|(_, url)| !(url.starts_with("http://") || url.starts_with("https://")))
        {
            return Err(ConfigError::Invalid(format!("{name} must be an http(s) URL")));
        }
        if self.page_timeout_secs == 0 {
            return Err(ConfigError::Invalid("page_timeout_secs must be positive".into()));
        }
        if self.grace_period_secs <= self.page_timeout_secs {
            return Err(ConfigError::Invalid(format!(
                "grace_period_secs ({}) must be longer than page_timeout_secs ({})",
                self.grace_period_secs, self.page_timeout_secs
            )));
        }
        if self.send_email {
            if self.notify.recipients.is_empty() {
                return Err(ConfigError::Invalid(
                    "send_email is set but notify.recipients is empty".into(),
                ));
            }
            if let Some(bad) = self.notify.recipients.iter().find(|r| !r.contains('@')) {
                return Err(ConfigError::Invalid(format!("invalid recipient {bad:?}")));
            }
        }
        Ok(())
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: Duration::from_secs(self.page_timeout_secs),
            ..FetchSettings::default()
        }
    }

    pub fn orchestrator_settings(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            worker_count: self.worker_count,
            save_poll_interval: Duration::from_millis(self.save_poll_interval_ms),
            retry: RetryPolicy {
                max_attempts: self.retry.max_attempts,
                backoff: Duration::from_millis(self.retry.backoff_ms),
            },
        }
    }

    pub fn date_plan(&self) -> DatePlan {
        DatePlan {
            url_template: self.results_url_template.clone(),
            output_dir: self.output_dir.clone(),
            file_prefix: "race_results".to_string(),
        }
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }
}
