//! Core types for the RectifAI correction service
//!
//! This crate provides foundational types used across all other crates:
//! - Correction request/result value types
//! - Provider identifiers and the source that served a correction
//! - Error types

pub mod correction;
pub mod error;
pub mod provider;

pub use correction::{dedup_labels, ChangeSummary, CorrectionRequest, CorrectionResult};
pub use error::{Error, Result};
pub use provider::{CorrectionSource, ProviderKind};
