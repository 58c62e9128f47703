//! Admission intake, review, and decision-notification workflow.
//!
//! The service owns the full lifecycle of an applicant record: created
//! Pending on submission, read back for the admin review listing, and
//! transitioned exactly once (in the normal flow) to Approved or Rejected,
//! which fires a best-effort decision email.

pub mod domain;
pub mod notifier;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantRecord, ApplicationId, ApplicationStatus, ApplicationSubmission, DecisionOutcome,
    ValidationError,
};
pub use notifier::{DecisionNotice, NotificationError, NotificationSender, DECISION_SUBJECT};
pub use repository::{ApplicantRepository, NewApplicant, RepositoryError};
pub use router::admission_router;
pub use service::{AdmissionService, AdmissionServiceError};
