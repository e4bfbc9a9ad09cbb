//! Rule-based fallback corrector
//!
//! Applies the rule table in order and records a rule's label whenever the
//! rule changed the text. Performs no I/O and never fails for non-empty input.

use rectifai_core::{CorrectionRequest, CorrectionResult, Result};

use super::edit_distance::levenshtein_distance;
use super::rules::{RuleLabel, RULES};
use crate::analysis::ConfidenceCalibration;

/// Label reported when no rule changed the text
pub const DEFAULT_LABEL: &str = "RectifAI enhancement";

/// Deterministic dictionary and regex corrector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleBasedCorrector {
    professional_tone: bool,
}

impl Default for RuleBasedCorrector {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RuleBasedCorrector {
    /// `professional_tone` enables the casual to formal substitutions
    pub fn new(professional_tone: bool) -> Self {
        Self { professional_tone }
    }

    pub fn professional_tone(&self) -> bool {
        self.professional_tone
    }

    /// Run the rule table, returning the corrected text and the labels of
    /// the rules that changed it, in rule order without duplicates
    pub fn apply(&self, input: &str) -> (String, Vec<RuleLabel>) {
        let mut text = input.to_string();
        let mut labels: Vec<RuleLabel> = Vec::new();

        for rule in RULES.iter() {
            if rule.professional && !self.professional_tone {
                continue;
            }

            let next = rule.apply(&text);
            if next != text {
                if !labels.contains(&rule.label) {
                    labels.push(rule.label);
                }
                text = next;
            }
        }

        (text, labels)
    }

    /// Correct text; fails only on empty or whitespace-only input
    pub fn correct(&self, input: &str) -> Result<CorrectionResult> {
        let request = CorrectionRequest::new(input)?;
        Ok(self.correct_request(&request))
    }

    /// Correct already validated input; cannot fail
    pub fn correct_request(&self, request: &CorrectionRequest) -> CorrectionResult {
        let input = request.text();
        let (corrected, labels) = self.apply(input);

        let label_names: Vec<&str> = labels.iter().map(RuleLabel::as_str).collect();
        let confidence =
            ConfidenceCalibration::RULE_BASED.estimate(input, &corrected, &label_names);
        let total = levenshtein_distance(input, &corrected);

        tracing::debug!(
            improvements = labels.len(),
            total,
            "Rule-based correction completed"
        );

        let types = if label_names.is_empty() {
            vec![DEFAULT_LABEL]
        } else {
            label_names
        };

        CorrectionResult::new(corrected, confidence, total, types)
    }
}
