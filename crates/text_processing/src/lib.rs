//! Text processing for RectifAI corrections
//!
//! This crate holds every piece of correction logic that needs no I/O:
//! - **Edit distance**: character-level Levenshtein distance, the "total changes" metric
//! - **Change classification**: heuristic labels describing what a provider changed
//! - **Confidence estimation**: per-provider calibrated quality score
//! - **Rule-based correction**: the deterministic corrector at the end of the fallback chain
//!
//! # Example
//!
//! ```
//! use rectifai_text_processing::RuleBasedCorrector;
//!
//! let corrector = RuleBasedCorrector::default();
//! let result = corrector.correct("i cant go there.").unwrap();
//! assert_eq!(result.corrected, "I can't go there.");
//! ```

pub mod analysis;
pub mod grammar;

pub use analysis::{
    assess, length_change_ratio, Check, ClassifierProfile, ConfidenceCalibration, RatioBand,
    Signal, IDENTICAL_CONFIDENCE,
};
pub use grammar::{char_len, levenshtein_distance, RuleBasedCorrector, RuleLabel, DEFAULT_LABEL};
