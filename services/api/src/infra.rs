use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use admission_portal::admissions::{
    ApplicantRecord, ApplicantRepository, ApplicationId, ApplicationStatus, DecisionNotice,
    NewApplicant, NotificationError, NotificationSender, RepositoryError,
};
use admission_portal::config::MailConfig;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Durable applicant store backed by a single SQLite file.
pub(crate) struct SqliteApplicantRepository {
    pool: SqlitePool,
}

impl SqliteApplicantRepository {
    /// Open (creating if missing) the database file and ensure the table
    /// exists. The only migration this system ever runs.
    pub(crate) async fn open(path: &Path) -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(unavailable)?;

        let repository = Self::from_pool(pool);
        repository.init_schema().await?;
        Ok(repository)
    }

    pub(crate) fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) async fn init_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS applicants (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                phone TEXT NOT NULL,
                course TEXT NOT NULL,
                status TEXT NOT NULL,
                applied_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;
        Ok(())
    }
}

fn unavailable(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Unavailable(err.to_string())
}

/// Timestamps are stored as fixed-width RFC 3339 so the SQL ordering over
/// the text column matches chronological order.
fn encode_applied_at(applied_at: DateTime<Utc>) -> String {
    applied_at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_applied_at(raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| RepositoryError::Malformed(format!("applied_at '{raw}': {err}")))
}

fn record_from_row(row: &SqliteRow) -> Result<ApplicantRecord, RepositoryError> {
    let status: String = row
        .try_get("status")
        .map_err(|err| RepositoryError::Malformed(err.to_string()))?;
    let status = ApplicationStatus::from_label(&status)
        .ok_or_else(|| RepositoryError::Malformed(format!("unknown status '{status}'")))?;
    let applied_at: String = row
        .try_get("applied_at")
        .map_err(|err| RepositoryError::Malformed(err.to_string()))?;

    let column = |name: &str| -> Result<String, RepositoryError> {
        row.try_get(name)
            .map_err(|err| RepositoryError::Malformed(err.to_string()))
    };

    Ok(ApplicantRecord {
        id: ApplicationId(
            row.try_get("id")
                .map_err(|err| RepositoryError::Malformed(err.to_string()))?,
        ),
        name: column("name")?,
        email: column("email")?,
        phone: column("phone")?,
        course: column("course")?,
        status,
        applied_at: decode_applied_at(&applied_at)?,
    })
}

#[async_trait]
impl ApplicantRepository for SqliteApplicantRepository {
    async fn insert(&self, applicant: NewApplicant) -> Result<ApplicantRecord, RepositoryError> {
        let applied_at = encode_applied_at(applicant.applied_at);
        let result = sqlx::query(
            "INSERT INTO applicants (name, email, phone, course, status, applied_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&applicant.name)
        .bind(&applicant.email)
        .bind(&applicant.phone)
        .bind(&applicant.course)
        .bind(applicant.status.label())
        .bind(&applied_at)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(ApplicantRecord {
            id: ApplicationId(result.last_insert_rowid()),
            name: applicant.name,
            email: applicant.email,
            phone: applicant.phone,
            course: applicant.course,
            status: applicant.status,
            // Reflect storage precision so a later fetch returns the same value.
            applied_at: decode_applied_at(&applied_at)?,
        })
    }

    async fn fetch(&self, id: ApplicationId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, email, phone, course, status, applied_at
             FROM applicants WHERE id = ?1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn update(&self, record: ApplicantRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE applicants
             SET name = ?2, email = ?3, phone = ?4, course = ?5, status = ?6, applied_at = ?7
             WHERE id = ?1",
        )
        .bind(record.id.0)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(&record.course)
        .bind(record.status.label())
        .bind(encode_applied_at(record.applied_at))
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, email, phone, course, status, applied_at
             FROM applicants ORDER BY applied_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        rows.iter().map(record_from_row).collect()
    }
}

/// Decision emails over an SMTP relay (STARTTLS when configured). One
/// best-effort send per decision; the service logs and swallows failures.
pub(crate) struct SmtpNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpNotificationSender {
    pub(crate) fn from_config(mail: &MailConfig) -> Result<Self, NotificationError> {
        let sender: Mailbox = mail
            .sender
            .parse()
            .map_err(|_| NotificationError::InvalidSender(mail.sender.clone()))?;

        let mut builder = if mail.smtp_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&mail.smtp_host)
                .map_err(|err| NotificationError::Transport(err.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&mail.smtp_host)
        };
        builder = builder.port(mail.smtp_port);
        if let Some((username, password)) = mail.credentials() {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            sender,
        })
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send(&self, notice: DecisionNotice) -> Result<(), NotificationError> {
        let recipient: Mailbox = notice
            .recipient
            .parse()
            .map_err(|_| NotificationError::InvalidRecipient(notice.recipient.clone()))?;

        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(notice.subject)
            .body(notice.body)
            .map_err(|err| NotificationError::Transport(err.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|err| NotificationError::Transport(err.to_string()))?;
        Ok(())
    }
}

/// Volatile store for the CLI demo.
#[derive(Default)]
pub(crate) struct InMemoryApplicantRepository {
    sequence: AtomicI64,
    records: Mutex<BTreeMap<ApplicationId, ApplicantRecord>>,
}

#[async_trait]
impl ApplicantRepository for InMemoryApplicantRepository {
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

/// Captures notices instead of sending them, so the demo can print what the
/// applicant would have received.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    notices: Mutex<Vec<DecisionNotice>>,
}

impl RecordingNotifier {
    pub(crate) fn notices(&self) -> Vec<DecisionNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send(&self, notice: DecisionNotice) -> Result<(), NotificationError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}
