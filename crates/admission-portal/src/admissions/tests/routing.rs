use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::admissions::router;
use crate::admissions::AdmissionService;

#[tokio::test]
async fn submit_route_creates_a_pending_application() {
    let (service, _, _) = build_service();
    let router = admission_router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/admissions/applications")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&submission()).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("id"), Some(&json!(1)));
    assert_eq!(payload.get("status"), Some(&json!("Pending")));
    assert_eq!(payload.get("name"), Some(&json!("Ana")));
}

#[tokio::test]
async fn submit_handler_rejects_incomplete_forms() {
    let (service, repository, _) = build_service();

    let mut incomplete = submission();
    incomplete.email = "  ".to_string();

    let response = router::submit_handler::<MemoryRepository, MemoryNotifier>(
        State(service),
        axum::Json(incomplete),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload
        .get("error")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .contains("email"));
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn submit_handler_reports_storage_failures() {
    let service = Arc::new(AdmissionService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
    ));

    let response = router::submit_handler::<UnavailableRepository, MemoryNotifier>(
        State(service),
        axum::Json(submission()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn list_route_returns_applications_newest_first() {
    let (service, repository, _) = build_service();

    for candidate in [submission(), second_submission()] {
        service.submit(candidate).await.expect("submit succeeds");
    }
    {
        let mut guard = repository.records.lock().expect("repository mutex");
        let record = guard
            .get_mut(&crate::admissions::ApplicationId(1))
            .expect("record present");
        record.applied_at = record.applied_at - chrono::Duration::minutes(30);
    }

    let router = admission_router_with_service(service);
    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/admissions/applications")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let listed = payload.as_array().expect("array payload");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].get("name"), Some(&json!("Ben")));
    assert_eq!(listed[1].get("name"), Some(&json!("Ana")));
}

#[tokio::test]
async fn approve_route_returns_flash_message_and_record() {
    let (service, _, notifier) = build_service();
    service.submit(submission()).await.expect("submit succeeds");

    let router = admission_router_with_service(service);
    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/admissions/applications/1/approve")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("message"),
        Some(&json!("Ana approved successfully!"))
    );
    assert_eq!(
        payload
            .get("applicant")
            .and_then(|applicant| applicant.get("status")),
        Some(&json!("Approved"))
    );
    assert_eq!(notifier.notices().len(), 1);
}

#[tokio::test]
async fn reject_handler_uses_rejection_message() {
    let (service, _, _) = build_service();
    let record = service.submit(submission()).await.expect("submit succeeds");

    let response = router::reject_handler::<MemoryRepository, MemoryNotifier>(
        State(service),
        Path(record.id.0),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("message"), Some(&json!("Ana rejected.")));
}

#[tokio::test]
async fn decision_routes_return_not_found_for_unknown_ids() {
    let (service, _, notifier) = build_service();
    let router = admission_router_with_service(service);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/admissions/applications/999/reject")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(notifier.notices().is_empty());
}
