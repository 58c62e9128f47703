use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::{ApplicantRecord, DecisionOutcome};

/// Fixed subject line for every decision email.
pub const DECISION_SUBJECT: &str = "Admission Status";

/// One outbound decision email, fully rendered. Content is deterministic:
/// the body always names the applicant, the course, and the outcome word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionNotice {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl DecisionNotice {
    pub fn compose(record: &ApplicantRecord, outcome: DecisionOutcome) -> Self {
        let body = match outcome {
            DecisionOutcome::Approved => format!(
                "Dear {}, your admission has been approved for the course: {}.",
                record.name, record.course
            ),
            DecisionOutcome::Rejected => format!(
                "Dear {}, your admission for {} has been rejected.",
                record.name, record.course
            ),
        };

        Self {
            recipient: record.email.clone(),
            subject: DECISION_SUBJECT.to_string(),
            body,
        }
    }
}

/// Outbound-email boundary collaborator. One best-effort send per decision;
/// no queueing, retry, or delivery confirmation.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, notice: DecisionNotice) -> Result<(), NotificationError>;
}

/// Transmission failure, caught at the sender boundary and never propagated
/// past the decision that triggered it.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("invalid sender address '{0}'")]
    InvalidSender(String),
    #[error("invalid recipient address '{0}'")]
    InvalidRecipient(String),
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}
