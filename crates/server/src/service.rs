//! Correction service: fallback chain plus best-effort persistence

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rectifai_core::{ChangeSummary, CorrectionRequest, CorrectionResult};
use rectifai_llm::CorrectionOrchestrator;
use rectifai_persistence::{
    CorrectionRecord, NewCorrection, NewSubmission, Submission, SubmissionStatus,
    SubmissionStore,
};

use crate::metrics;
use crate::ServerError;

/// Body of a successful `POST /api/correct`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResponse {
    pub corrected: String,
    pub confidence: f64,
    pub changes: ChangeSummary,
    /// Provider that answered, or `rule_based`
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<Uuid>,
    /// Whether both the submission and its correction were stored
    pub persisted: bool,
}

/// A stored submission with its corrections, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionView {
    #[serde(flatten)]
    pub submission: Submission,
    pub corrections: Vec<CorrectionRecord>,
}

pub struct CorrectionService {
    orchestrator: CorrectionOrchestrator,
    store: Arc<dyn SubmissionStore>,
}

impl CorrectionService {
    pub fn new(orchestrator: CorrectionOrchestrator, store: Arc<dyn SubmissionStore>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }

    pub fn orchestrator(&self) -> &CorrectionOrchestrator {
        &self.orchestrator
    }

    pub fn store(&self) -> &Arc<dyn SubmissionStore> {
        &self.store
    }

    /// Correct `input` and record it.
    ///
    /// Only empty or over-long input is an error. Storage failures are
    /// logged and reported through `persisted`.
    pub async fn correct(&self, input: &str) -> Result<CorrectionResponse, ServerError> {
        let started = Instant::now();
        let request = self.orchestrator.request(input)?;

        let outcome = self.orchestrator.run(&request).await;
        for failure in &outcome.failures {
            metrics::record_provider_failure(failure.provider);
        }
        metrics::record_correction(outcome.source, started.elapsed());

        let (submission_id, persisted) = self.persist(&request, &outcome.result).await;

        let CorrectionResult {
            corrected,
            confidence,
            changes,
        } = outcome.result;

        Ok(CorrectionResponse {
            corrected,
            confidence,
            changes,
            source: outcome.source.to_string(),
            submission_id,
            persisted,
        })
    }

    async fn persist(
        &self,
        request: &CorrectionRequest,
        result: &CorrectionResult,
    ) -> (Option<Uuid>, bool) {
        let submission = match self
            .store
            .create_submission(NewSubmission::text(request.text()))
            .await
        {
            Ok(submission) => submission,
            Err(e) => {
                tracing::error!(step = "create_submission", error = %e, "Failed to store submission");
                metrics::record_persistence_failure("create_submission");
                return (None, false);
            }
        };

        match self
            .store
            .create_correction(NewCorrection::from_result(submission.id, result))
            .await
        {
            Ok(_) => {
                let persisted = self
                    .mark(submission.id, SubmissionStatus::Completed)
                    .await;
                (Some(submission.id), persisted)
            }
            Err(e) => {
                tracing::error!(
                    step = "create_correction",
                    submission_id = %submission.id,
                    error = %e,
                    "Failed to store correction"
                );
                metrics::record_persistence_failure("create_correction");
                self.mark(submission.id, SubmissionStatus::Failed).await;
                (Some(submission.id), false)
            }
        }
    }

    async fn mark(&self, id: Uuid, status: SubmissionStatus) -> bool {
        match self.store.update_status(id, status).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    step = "update_status",
                    submission_id = %id,
                    status = status.as_str(),
                    error = %e,
                    "Failed to update submission status"
                );
                metrics::record_persistence_failure("update_status");
                false
            }
        }
    }

    /// Look up a stored submission and its corrections
    pub async fn submission(&self, id: Uuid) -> Result<SubmissionView, ServerError> {
        let submission = self
            .store
            .get_submission(id)
            .await?
            .ok_or_else(|| ServerError::NotFound(format!("submission {}", id)))?;
        let corrections = self.store.corrections_for(id).await?;

        Ok(SubmissionView {
            submission,
            corrections,
        })
    }
}
