use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::admissions::domain::{ApplicantRecord, ApplicationId, ApplicationSubmission};
use crate::admissions::notifier::{DecisionNotice, NotificationError, NotificationSender};
use crate::admissions::repository::{ApplicantRepository, NewApplicant, RepositoryError};
use crate::admissions::{admission_router, AdmissionService};

pub(super) fn submission() -> ApplicationSubmission {
    ApplicationSubmission {
        name: "Ana".to_string(),
        email: "ana@x.com".to_string(),
        phone: "555".to_string(),
        course: "CS".to_string(),
    }
}

pub(super) fn second_submission() -> ApplicationSubmission {
    ApplicationSubmission {
        name: "Ben".to_string(),
        email: "ben@x.com".to_string(),
        phone: "556".to_string(),
        course: "Math".to_string(),
    }
}

pub(super) fn build_service() -> (
    Arc<AdmissionService<MemoryRepository, MemoryNotifier>>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = Arc::new(AdmissionService::new(repository.clone(), notifier.clone()));
    (service, repository, notifier)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    sequence: AtomicI64,
    pub(super) records: Mutex<BTreeMap<ApplicationId, ApplicantRecord>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

#[async_trait]
impl ApplicantRepository for MemoryRepository {
    async fn insert(&self, applicant: NewApplicant) -> Result<ApplicantRecord, RepositoryError> {
        let id = ApplicationId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let record = ApplicantRecord {
            id,
            name: applicant.name,
            email: applicant.email,
            phone: applicant.phone,
            course: applicant.course,
            status: applicant.status,
            applied_at: applicant.applied_at,
        };
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(id, record.clone());
        Ok(record)
    }

    async fn fetch(&self, id: ApplicationId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    async fn update(&self, record: ApplicantRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id, record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    async fn list_all(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    pub(super) fail: std::sync::atomic::AtomicBool,
    notices: Mutex<Vec<DecisionNotice>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<DecisionNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl NotificationSender for MemoryNotifier {
    async fn send(&self, notice: DecisionNotice) -> Result<(), NotificationError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(NotificationError::Transport("relay offline".to_string()));
        }
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

#[async_trait]
impl ApplicantRepository for UnavailableRepository {
    async fn insert(&self, _applicant: NewApplicant) -> Result<ApplicantRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn fetch(&self, _id: ApplicationId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn update(&self, _record: ApplicantRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn list_all(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn admission_router_with_service(
    service: Arc<AdmissionService<MemoryRepository, MemoryNotifier>>,
) -> axum::Router {
    admission_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
