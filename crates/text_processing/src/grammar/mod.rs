//! Grammar correction module
//!
//! The deterministic corrector that terminates the fallback chain, plus the
//! edit-distance metric shared by every correction.

mod edit_distance;
mod rule_corrector;
mod rules;

pub use edit_distance::{char_len, levenshtein_distance};
pub use rule_corrector::{RuleBasedCorrector, DEFAULT_LABEL};
pub use rules::RuleLabel;
