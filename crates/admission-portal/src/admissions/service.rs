use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    ApplicantRecord, ApplicationId, ApplicationStatus, ApplicationSubmission, DecisionOutcome,
    ValidationError,
};
use super::notifier::{DecisionNotice, NotificationSender};
use super::repository::{ApplicantRepository, NewApplicant, RepositoryError};

/// Service composing the persistence store and the notification sender.
///
/// Constructed explicitly at startup and handed to the router; there is no
/// ambient global handle.
pub struct AdmissionService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R, N> AdmissionService<R, N>
where
    R: ApplicantRepository + 'static,
    N: NotificationSender + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Register a new application, returning the store-backed record.
    ///
    /// No duplicate detection: identical submissions create distinct records.
    pub async fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<ApplicantRecord, AdmissionServiceError> {
        submission.validate()?;

        let record = self
            .repository
            .insert(NewApplicant {
                name: submission.name,
                email: submission.email,
                phone: submission.phone,
                course: submission.course,
                status: ApplicationStatus::Pending,
                applied_at: Utc::now(),
            })
            .await?;

        info!(id = record.id.0, course = %record.course, "application registered");
        Ok(record)
    }

    /// All applications for the admin review listing, most recent first.
    pub async fn list(&self) -> Result<Vec<ApplicantRecord>, AdmissionServiceError> {
        let mut records = self.repository.list_all().await?;
        records.sort_by(|a, b| {
            b.applied_at
                .cmp(&a.applied_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    /// Apply the administrator's verdict and notify the applicant.
    ///
    /// The status overwrite is unconditional: re-deciding an already-decided
    /// record is permitted and the last call wins. A notification failure is
    /// logged and swallowed; it never rolls back the status change.
    pub async fn decide(
        &self,
        id: ApplicationId,
        outcome: DecisionOutcome,
    ) -> Result<ApplicantRecord, AdmissionServiceError> {
        let mut record = self
            .repository
            .fetch(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        record.status = outcome.status();
        self.repository.update(record.clone()).await?;

        let notice = DecisionNotice::compose(&record, outcome);
        if let Err(err) = self.notifier.send(notice).await {
            warn!(id = record.id.0, error = %err, "decision notification failed");
        }

        info!(id = record.id.0, status = record.status.label(), "application decided");
        Ok(record)
    }

    /// Fetch a single application for API responses.
    pub async fn get(&self, id: ApplicationId) -> Result<ApplicantRecord, AdmissionServiceError> {
        let record = self
            .repository
            .fetch(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the admission service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
