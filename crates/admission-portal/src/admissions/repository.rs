use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::{ApplicantRecord, ApplicationId, ApplicationStatus};

/// Row content handed to the store before an id exists. The store assigns
/// the id on insert and returns the completed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplicant {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Implementations own the applicant table exclusively; the service is the
/// only writer. No operation spans more than one record, and nothing is ever
/// deleted.
#[async_trait]
pub trait ApplicantRepository: Send + Sync {
    async fn insert(&self, applicant: NewApplicant) -> Result<ApplicantRecord, RepositoryError>;
    async fn fetch(&self, id: ApplicationId) -> Result<Option<ApplicantRecord>, RepositoryError>;
    /// Full overwrite by id. Fails with [`RepositoryError::NotFound`] when
    /// the id was never inserted.
    async fn update(&self, record: ApplicantRecord) -> Result<(), RepositoryError>;
    async fn list_all(&self) -> Result<Vec<ApplicantRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored row is malformed: {0}")]
    Malformed(String),
}
