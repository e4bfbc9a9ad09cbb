//! Persistence for RectifAI
//!
//! Stores every submission and the correction returned for it:
//! - ScyllaDB when persistence is enabled
//! - An in-memory store otherwise (and as fallback when Scylla is unreachable)

pub mod client;
pub mod error;
pub mod schema;
pub mod submissions;

pub use client::{ScyllaClient, ScyllaConfig};
pub use error::PersistenceError;
pub use submissions::{
    CorrectionRecord, InMemorySubmissionStore, NewCorrection, NewSubmission,
    ScyllaSubmissionStore, Submission, SubmissionStatus, SubmissionStore, TEXT_INPUT,
};

/// Connect to ScyllaDB, ensure the schema and return the store
pub async fn init(config: ScyllaConfig) -> Result<ScyllaSubmissionStore, PersistenceError> {
    let client = ScyllaClient::connect(config).await?;
    client.ensure_schema().await?;
    Ok(ScyllaSubmissionStore::new(client))
}
