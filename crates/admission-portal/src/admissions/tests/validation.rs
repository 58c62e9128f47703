use super::common::*;
use crate::admissions::domain::{ApplicationStatus, DecisionOutcome, ValidationError};

#[test]
fn complete_submission_passes_validation() {
    assert_eq!(submission().validate(), Ok(()));
}

#[test]
fn each_missing_field_is_reported_by_name() {
    for field in ["name", "email", "phone", "course"] {
        let mut candidate = submission();
        match field {
            "name" => candidate.name.clear(),
            "email" => candidate.email.clear(),
            "phone" => candidate.phone.clear(),
            _ => candidate.course.clear(),
        }

        assert_eq!(
            candidate.validate(),
            Err(ValidationError::MissingField { field }),
            "expected '{field}' to be flagged"
        );
    }
}

#[test]
fn whitespace_only_fields_count_as_missing() {
    let mut candidate = submission();
    candidate.phone = "   ".to_string();
    assert_eq!(
        candidate.validate(),
        Err(ValidationError::MissingField { field: "phone" })
    );
}

#[test]
fn status_labels_round_trip() {
    for status in [
        ApplicationStatus::Pending,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ] {
        assert_eq!(ApplicationStatus::from_label(status.label()), Some(status));
    }
    assert_eq!(ApplicationStatus::from_label("Waitlisted"), None);
}

#[test]
fn outcome_maps_to_terminal_status_and_word() {
    assert_eq!(
        DecisionOutcome::Approved.status(),
        ApplicationStatus::Approved
    );
    assert_eq!(
        DecisionOutcome::Rejected.status(),
        ApplicationStatus::Rejected
    );
    assert_eq!(DecisionOutcome::Approved.word(), "approved");
    assert_eq!(DecisionOutcome::Rejected.word(), "rejected");
}
