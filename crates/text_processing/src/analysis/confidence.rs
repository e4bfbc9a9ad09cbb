//! Heuristic confidence estimation
//!
//! One estimator shared by every provider, parameterised by a small
//! calibration record. The score starts at the provider's base, moves to a
//! lower band as the length-change ratio grows, gets a bonus for several
//! detected change kinds and is finally clamped.

use rectifai_core::ProviderKind;

use crate::grammar::char_len;

/// Confidence reported whenever the corrected text equals the input
pub const IDENTICAL_CONFIDENCE: f64 = 0.95;

/// Confidence used once the length-change ratio passes `threshold`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioBand {
    pub threshold: f64,
    /// `>=` instead of `>`
    pub inclusive: bool,
    pub confidence: f64,
}

impl RatioBand {
    const fn above(threshold: f64, confidence: f64) -> Self {
        Self {
            threshold,
            inclusive: false,
            confidence,
        }
    }

    const fn at_least(threshold: f64, confidence: f64) -> Self {
        Self {
            threshold,
            inclusive: true,
            confidence,
        }
    }

    fn applies(&self, ratio: f64) -> bool {
        if self.inclusive {
            ratio >= self.threshold
        } else {
            ratio > self.threshold
        }
    }
}

/// Per-provider calibration constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceCalibration {
    pub base: f64,
    /// Ascending thresholds; the last band that applies wins
    pub bands: &'static [RatioBand],
    /// Added once when at least `bonus_min_labels` labels were detected
    pub bonus: f64,
    pub bonus_min_labels: usize,
    /// Added for every detected label
    pub per_label: f64,
    pub min: f64,
    pub max: f64,
}

impl ConfidenceCalibration {
    pub const CLAUDE: Self = Self {
        base: 0.98,
        bands: &[
            RatioBand::above(0.02, 0.96),
            RatioBand::above(0.25, 0.94),
            RatioBand::above(0.5, 0.90),
        ],
        bonus: 0.01,
        bonus_min_labels: 3,
        per_label: 0.0,
        min: 0.85,
        max: 1.0,
    };

    pub const GEMINI: Self = Self {
        base: 0.95,
        bands: &[
            RatioBand::above(0.05, 0.92),
            RatioBand::above(0.3, 0.85),
            RatioBand::above(0.6, 0.75),
        ],
        bonus: 0.03,
        bonus_min_labels: 3,
        per_label: 0.0,
        min: 0.7,
        max: 1.0,
    };

    pub const OPENAI: Self = Self {
        base: 0.94,
        bands: &[RatioBand::at_least(0.05, 0.92), RatioBand::at_least(0.1, 0.88)],
        bonus: 0.02,
        bonus_min_labels: 2,
        per_label: 0.0,
        min: 0.80,
        max: 0.96,
    };

    pub const PERPLEXITY: Self = Self {
        base: 0.96,
        bands: &[RatioBand::at_least(0.05, 0.94), RatioBand::at_least(0.1, 0.90)],
        bonus: 0.02,
        bonus_min_labels: 2,
        per_label: 0.0,
        min: 0.85,
        max: 0.98,
    };

    pub const HUGGINGFACE: Self = Self {
        base: 0.92,
        bands: &[RatioBand::at_least(0.05, 0.90), RatioBand::at_least(0.1, 0.85)],
        bonus: 0.03,
        bonus_min_labels: 2,
        per_label: 0.0,
        min: 0.75,
        max: 0.95,
    };

    /// Rule-based corrector: grows with the number of rules that fired
    pub const RULE_BASED: Self = Self {
        base: 0.75,
        bands: &[],
        bonus: 0.0,
        bonus_min_labels: 0,
        per_label: 0.03,
        min: 0.75,
        max: 0.92,
    };

    pub fn for_provider(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::ClaudeEdge | ProviderKind::Claude => Self::CLAUDE,
            ProviderKind::Gemini => Self::GEMINI,
            ProviderKind::OpenAi => Self::OPENAI,
            ProviderKind::Perplexity => Self::PERPLEXITY,
            ProviderKind::HuggingFace => Self::HUGGINGFACE,
        }
    }

    /// Estimate confidence for a correction; always within [0, 1]
    pub fn estimate<S: AsRef<str>>(&self, original: &str, corrected: &str, labels: &[S]) -> f64 {
        if original == corrected {
            return IDENTICAL_CONFIDENCE;
        }

        let ratio = length_change_ratio(original, corrected);
        let mut confidence = self
            .bands
            .iter()
            .filter(|band| band.applies(ratio))
            .last()
            .map_or(self.base, |band| band.confidence);

        if self.bonus_min_labels > 0 && labels.len() >= self.bonus_min_labels {
            confidence += self.bonus;
        }
        confidence += self.per_label * labels.len() as f64;

        confidence.clamp(self.min, self.max).clamp(0.0, 1.0)
    }
}

/// `|len(corrected) - len(original)| / len(original)`, in chars
///
/// An empty original with a non-empty correction counts as an unbounded change.
pub fn length_change_ratio(original: &str, corrected: &str) -> f64 {
    let original_len = char_len(original);
    let corrected_len = char_len(corrected);

    if original_len == 0 {
        return if corrected_len == 0 { 0.0 } else { f64::INFINITY };
    }

    original_len.abs_diff(corrected_len) as f64 / original_len as f64
}
