//! Submissions and their corrections
//!
//! A submission records what the user sent; a correction record stores the
//! text that came back, keyed by the submission id.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rectifai_core::CorrectionResult;

use crate::{PersistenceError, ScyllaClient};

/// Submission processing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Completed,
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    fn parse(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

/// Input kind of a submission; only plain text today
pub const TEXT_INPUT: &str = "text";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub input_type: String,
    pub input_content: String,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating a submission
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub input_type: String,
    pub input_content: String,
    pub status: SubmissionStatus,
}

impl NewSubmission {
    /// A pending plain-text submission; completed once its correction is stored
    pub fn text(input: impl Into<String>) -> Self {
        Self {
            input_type: TEXT_INPUT.to_string(),
            input_content: input.into(),
            status: SubmissionStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub corrected_content: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl CorrectionRecord {
    /// Stored corrections are flagged verified above this confidence
    pub fn is_verified_confidence(confidence: f64) -> bool {
        confidence > CorrectionResult::VERIFIED_THRESHOLD
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCorrection {
    pub submission_id: Uuid,
    pub corrected_content: String,
    pub verified: bool,
}

impl NewCorrection {
    pub fn from_result(submission_id: Uuid, result: &CorrectionResult) -> Self {
        Self {
            submission_id,
            corrected_content: result.corrected.clone(),
            verified: CorrectionRecord::is_verified_confidence(result.confidence),
        }
    }
}

/// Storage collaborator for the correction flow
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Insert a submission, returning it with a generated id
    async fn create_submission(&self, new: NewSubmission) -> Result<Submission, PersistenceError>;

    /// Insert a correction for an existing submission id
    async fn create_correction(
        &self,
        new: NewCorrection,
    ) -> Result<CorrectionRecord, PersistenceError>;

    /// Move a submission to `status`
    async fn update_status(
        &self,
        id: Uuid,
        status: SubmissionStatus,
    ) -> Result<(), PersistenceError>;

    async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>, PersistenceError>;

    /// Corrections for a submission, newest first
    async fn corrections_for(
        &self,
        submission_id: Uuid,
    ) -> Result<Vec<CorrectionRecord>, PersistenceError>;

    /// Short backend name for status reporting
    fn backend(&self) -> &'static str;
}

fn timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}

/// ScyllaDB-backed store
#[derive(Clone)]
pub struct ScyllaSubmissionStore {
    client: ScyllaClient,
}

impl ScyllaSubmissionStore {
    pub fn new(client: ScyllaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubmissionStore for ScyllaSubmissionStore {
    async fn create_submission(&self, new: NewSubmission) -> Result<Submission, PersistenceError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let query = format!(
            "INSERT INTO {}.submissions (id, input_type, input_content, status, created_at)
             VALUES (?, ?, ?, ?, ?)",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    id,
                    new.input_type.as_str(),
                    new.input_content.as_str(),
                    new.status.as_str(),
                    now.timestamp_millis(),
                ),
            )
            .await?;

        tracing::debug!(submission_id = %id, "Submission stored");

        Ok(Submission {
            id,
            input_type: new.input_type,
            input_content: new.input_content,
            status: new.status,
            created_at: now,
        })
    }

    async fn create_correction(
        &self,
        new: NewCorrection,
    ) -> Result<CorrectionRecord, PersistenceError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let query = format!(
            "INSERT INTO {}.corrections (submission_id, created_at, id, corrected_content, verified)
             VALUES (?, ?, ?, ?, ?)",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    new.submission_id,
                    now.timestamp_millis(),
                    id,
                    new.corrected_content.as_str(),
                    new.verified,
                ),
            )
            .await?;

        tracing::debug!(
            submission_id = %new.submission_id,
            correction_id = %id,
            verified = new.verified,
            "Correction stored"
        );

        Ok(CorrectionRecord {
            id,
            submission_id: new.submission_id,
            corrected_content: new.corrected_content,
            verified: new.verified,
            created_at: now,
        })
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: SubmissionStatus,
    ) -> Result<(), PersistenceError> {
        let query = format!(
            "UPDATE {}.submissions SET status = ? WHERE id = ?",
            self.client.keyspace()
        );

        self.client
            .session()
            .query_unpaged(query, (status.as_str(), id))
            .await?;

        tracing::debug!(submission_id = %id, status = status.as_str(), "Submission status updated");
        Ok(())
    }

    async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>, PersistenceError> {
        let query = format!(
            "SELECT id, input_type, input_content, status, created_at
             FROM {}.submissions WHERE id = ?",
            self.client.keyspace()
        );

        let result = self.client.session().query_unpaged(query, (id,)).await?;

        let Some(row) = result.rows.and_then(|rows| rows.into_iter().next()) else {
            return Ok(None);
        };

        let (id, input_type, input_content, status, created_at): (
            Uuid,
            String,
            String,
            String,
            i64,
        ) = row
            .into_typed()
            .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

        Ok(Some(Submission {
            id,
            input_type,
            input_content,
            status: SubmissionStatus::parse(&status),
            created_at: timestamp(created_at),
        }))
    }

    async fn corrections_for(
        &self,
        submission_id: Uuid,
    ) -> Result<Vec<CorrectionRecord>, PersistenceError> {
        let query = format!(
            "SELECT id, submission_id, corrected_content, verified, created_at
             FROM {}.corrections WHERE submission_id = ?",
            self.client.keyspace()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (submission_id,))
            .await?;

        let mut records = Vec::new();
        for row in result.rows.unwrap_or_default() {
            let (id, submission_id, corrected_content, verified, created_at): (
                Uuid,
                Uuid,
                String,
                bool,
                i64,
            ) = row
                .into_typed()
                .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

            records.push(CorrectionRecord {
                id,
                submission_id,
                corrected_content,
                verified,
                created_at: timestamp(created_at),
            });
        }

        Ok(records)
    }

    fn backend(&self) -> &'static str {
        "scylla"
    }
}

/// Submissions kept by [`InMemorySubmissionStore::new`]
pub const DEFAULT_MEMORY_CAPACITY: usize = 10_000;

#[derive(Default)]
struct MemoryState {
    submissions: HashMap<Uuid, Submission>,
    corrections: HashMap<Uuid, Vec<CorrectionRecord>>,
    /// Insertion order, oldest first
    order: VecDeque<Uuid>,
}

/// Process-local store, used when ScyllaDB is disabled or unreachable
///
/// Holds at most `capacity` submissions; inserting beyond that evicts the
/// oldest submission together with its corrections.
pub struct InMemorySubmissionStore {
    state: RwLock<MemoryState>,
    capacity: usize,
}

impl Default for InMemorySubmissionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }

    /// Store bounded to `capacity` submissions (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn submission_count(&self) -> usize {
        self.state.read().submissions.len()
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn create_submission(&self, new: NewSubmission) -> Result<Submission, PersistenceError> {
        let submission = Submission {
            id: Uuid::new_v4(),
            input_type: new.input_type,
            input_content: new.input_content,
            status: new.status,
            created_at: Utc::now(),
        };

        let mut state = self.state.write();
        while state.order.len() >= self.capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            state.submissions.remove(&oldest);
            state.corrections.remove(&oldest);
            tracing::trace!(submission_id = %oldest, "Evicted submission");
        }
        state.order.push_back(submission.id);
        state.submissions.insert(submission.id, submission.clone());

        Ok(submission)
    }

    async fn create_correction(
        &self,
        new: NewCorrection,
    ) -> Result<CorrectionRecord, PersistenceError> {
        let mut state = self.state.write();
        if !state.submissions.contains_key(&new.submission_id) {
            return Err(PersistenceError::NotFound(format!(
                "submission {}",
                new.submission_id
            )));
        }

        let record = CorrectionRecord {
            id: Uuid::new_v4(),
            submission_id: new.submission_id,
            corrected_content: new.corrected_content,
            verified: new.verified,
            created_at: Utc::now(),
        };
        state
            .corrections
            .entry(record.submission_id)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: SubmissionStatus,
    ) -> Result<(), PersistenceError> {
        match self.state.write().submissions.get_mut(&id) {
            Some(submission) => {
                submission.status = status;
                Ok(())
            }
            None => Err(PersistenceError::NotFound(format!("submission {}", id))),
        }
    }

    async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>, PersistenceError> {
        Ok(self.state.read().submissions.get(&id).cloned())
    }

    async fn corrections_for(
        &self,
        submission_id: Uuid,
    ) -> Result<Vec<CorrectionRecord>, PersistenceError> {
        let mut records = self
            .state
            .read()
            .corrections
            .get(&submission_id)
            .cloned()
            .unwrap_or_default();
        records.reverse();
        Ok(records)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
