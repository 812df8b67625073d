use serde::{Deserialize, Serialize};

use crate::mail::sendmail::MailError;

/// Outcome of the email that follows a committed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Sent,
    Failed,
    Skipped,
}

impl NotificationStatus {
    pub fn from_result(result: Result<(), MailError>, context: &str) -> Self {
        match result {
            Ok(()) => NotificationStatus::Sent,
            Err(e) => {
                tracing::warn!("Notification for {} failed: {}", context, e);
                NotificationStatus::Failed
            }
        }
    }

    /// Any failure wins; skipped only when every part was skipped.
    pub fn combine(self, other: NotificationStatus) -> Self {
        use NotificationStatus::*;
        match (self, other) {
            (Failed, _) | (_, Failed) => Failed,
            (Skipped, Skipped) => Skipped,
            _ => Sent,
        }
    }
}

/// A durable state change plus what happened to its notification.
#[derive(Debug, Clone)]
pub struct Committed<T> {
    pub value: T,
    pub notification: NotificationStatus,
}

impl<T> Committed<T> {
    pub fn new(value: T, notification: NotificationStatus) -> Self {
        Committed { value, notification }
    }
}
