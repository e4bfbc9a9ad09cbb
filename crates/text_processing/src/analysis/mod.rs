//! Post-hoc analysis of a provider's correction
//!
//! Providers return corrected text only. Change labels, confidence and the
//! edit-distance total are derived here, the same way for every provider.

mod classifier;
mod confidence;

pub use classifier::{
    Check, ClassifierProfile, Signal, ADVANCED_PROFESSIONAL_WORDS, EXTENDED_PUNCTUATION,
    LOGICAL_CONNECTORS, PROFESSIONAL_WORDS, STANDARD_PUNCTUATION,
};
pub use confidence::{length_change_ratio, ConfidenceCalibration, RatioBand, IDENTICAL_CONFIDENCE};

use rectifai_core::{CorrectionResult, ProviderKind};

use crate::grammar::levenshtein_distance;

/// Build the result for a provider's corrected text
pub fn assess(kind: ProviderKind, original: &str, corrected: &str) -> CorrectionResult {
    let labels = ClassifierProfile::for_provider(kind).classify(original, corrected);
    let confidence = ConfidenceCalibration::for_provider(kind).estimate(original, corrected, &labels);
    let total = levenshtein_distance(original, corrected);

    CorrectionResult::new(corrected, confidence, total, labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assess_populates_every_field() {
        let result = assess(ProviderKind::OpenAi, "i cant go", "I can't go.");
        assert_eq!(result.corrected, "I can't go.");
        assert_eq!(result.changes.total, 3);
        assert_eq!(result.changes.types[0], "AI enhancement");
        assert!(result.confidence >= 0.80 && result.confidence <= 0.96);
    }

    #[test]
    fn test_assess_identical() {
        let result = assess(ProviderKind::Gemini, "All good.", "All good.");
        assert_eq!(result.changes.total, 0);
        assert_eq!(result.confidence, IDENTICAL_CONFIDENCE);
        assert_eq!(result.changes.types, vec!["universal enhancement"]);
    }
}
