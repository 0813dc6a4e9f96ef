use std::path::PathBuf;

use racing_logging::racing_info;
use serde_json::json;
use thiserror::Error;

use crate::filename::sanitize_component;
use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<PathBuf>,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification has no recipients")]
    NoRecipients,
    #[error("attachment missing: {0}")]
    MissingAttachment(String),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Delivers the files of a finished run to its recipients.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Drops a JSON envelope into an outbox directory, where a mail relay picks it up.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    outbox: PathBuf,
}

impl OutboxNotifier {
    pub fn new(outbox: PathBuf) -> Self {
        Self { outbox }
    }

    pub fn envelope_path(&self, notification: &Notification) -> PathBuf {
        self.outbox.join(envelope_name(notification))
    }
}

fn envelope_name(notification: &Notification) -> String {
    format!("{}.json", sanitize_component(&notification.subject))
}

impl Notifier for OutboxNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        if notification.recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }
        if let Some(missing) = notification.attachments.iter().find(|path| !path.is_file()) {
            return Err(NotifyError::MissingAttachment(missing.display().to_string()));
        }

        let envelope = json!({
            "to": notification.recipients,
            "subject": notification.subject,
            "body": notification.body,
            "attachments": notification
                .attachments
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>(),
        });
        let writer = AtomicFileWriter::new(self.outbox.clone());
        let path = writer.write(&envelope_name(notification), envelope.to_string().as_bytes())?;
        racing_info!(
            "Queued notification for {} recipient(s) with {} attachment(s) at {:?}",
            notification.recipients.len(),
            notification.attachments.len(),
            path
        );
        Ok(())
    }
}
