use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::{ApplicationId, ApplicationSubmission, DecisionOutcome};
use super::notifier::NotificationSender;
use super::repository::{ApplicantRepository, RepositoryError};
use super::service::{AdmissionService, AdmissionServiceError};

/// Router builder exposing HTTP endpoints for intake, review, and decisions.
pub fn admission_router<R, N>(service: Arc<AdmissionService<R, N>>) -> Router
where
    R: ApplicantRepository + 'static,
    N: NotificationSender + 'static,
{
    Router::new()
        .route(
            "/api/v1/admissions/applications",
            post(submit_handler::<R, N>).get(list_handler::<R, N>),
        )
        .route(
            "/api/v1/admissions/applications/:id/approve",
            post(approve_handler::<R, N>),
        )
        .route(
            "/api/v1/admissions/applications/:id/reject",
            post(reject_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<AdmissionService<R, N>>>,
    axum::Json(submission): axum::Json<ApplicationSubmission>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationSender + 'static,
{
    match service.submit(submission).await {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(AdmissionServiceError::Validation(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn list_handler<R, N>(
    State(service): State<Arc<AdmissionService<R, N>>>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationSender + 'static,
{
    match service.list().await {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(err) => internal_error(err),
    }
}

pub(crate) async fn approve_handler<R, N>(
    State(service): State<Arc<AdmissionService<R, N>>>,
    Path(id): Path<i64>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationSender + 'static,
{
    decide(service, id, DecisionOutcome::Approved).await
}

pub(crate) async fn reject_handler<R, N>(
    State(service): State<Arc<AdmissionService<R, N>>>,
    Path(id): Path<i64>,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationSender + 'static,
{
    decide(service, id, DecisionOutcome::Rejected).await
}

async fn decide<R, N>(
    service: Arc<AdmissionService<R, N>>,
    id: i64,
    outcome: DecisionOutcome,
) -> Response
where
    R: ApplicantRepository + 'static,
    N: NotificationSender + 'static,
{
    match service.decide(ApplicationId(id), outcome).await {
        Ok(record) => {
            let message = match outcome {
                DecisionOutcome::Approved => format!("{} approved successfully!", record.name),
                DecisionOutcome::Rejected => format!("{} rejected.", record.name),
            };
            let payload = json!({ "message": message, "applicant": record });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(AdmissionServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": format!("application {id} not found") });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

fn internal_error(err: AdmissionServiceError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
