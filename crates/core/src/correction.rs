//! Correction request and result types

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Validated correction input
///
/// Construction fails for empty or whitespace-only text, so any value of this
/// type is safe to hand to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionRequest {
    text: String,
}

impl CorrectionRequest {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::InputRequired);
        }
        Ok(Self { text })
    }

    /// Like [`new`](Self::new), also rejecting text longer than
    /// `max_chars` characters
    pub fn with_max_chars(text: impl Into<String>, max_chars: usize) -> Result<Self> {
        let request = Self::new(text)?;
        if request.text.chars().nth(max_chars).is_some() {
            return Err(Error::InputTooLong { max: max_chars });
        }
        Ok(request)
    }

    /// The raw text, untrimmed
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// What changed between input and corrected text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// Character-level edit distance between input and corrected text
    pub total: usize,
    /// Change labels in detection order, no duplicates
    pub types: Vec<String>,
}

/// Outcome of a single correction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub corrected: String,
    /// Heuristic quality score in [0, 1]
    pub confidence: f64,
    pub changes: ChangeSummary,
}

impl CorrectionResult {
    /// Build a result, clamping confidence into [0, 1] and removing
    /// duplicate labels while keeping first-seen order.
    pub fn new<I, S>(corrected: impl Into<String>, confidence: f64, total: usize, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };

        Self {
            corrected: corrected.into(),
            confidence,
            changes: ChangeSummary {
                total,
                types: dedup_labels(types),
            },
        }
    }

    /// Confidence threshold above which a stored correction is flagged verified
    pub const VERIFIED_THRESHOLD: f64 = 0.8;

    pub fn is_verified(&self) -> bool {
        self.confidence > Self::VERIFIED_THRESHOLD
    }
}

/// Remove duplicate labels, keeping the first occurrence
pub fn dedup_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        let label = label.into();
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}
