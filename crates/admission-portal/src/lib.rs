//! Core library for the student admission registration portal.
//!
//! The [`admissions`] module carries the whole business workflow: applicants
//! submit a registration, an administrator reviews the pending list and
//! approves or rejects each application, and the applicant is notified of the
//! decision by email. Storage and email transports live behind traits so the
//! deployable service can wire in SQLite and SMTP while tests run against
//! in-memory doubles.

pub mod admissions;
pub mod config;
pub mod error;
pub mod telemetry;
