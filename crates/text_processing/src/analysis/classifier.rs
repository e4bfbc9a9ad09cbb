//! Heuristic change classification
//!
//! Compares original and corrected text and labels the kinds of improvement
//! that appear to have been made. This is pattern matching, not linguistic
//! analysis: each [`Signal`] fires when one structural property differs.

use once_cell::sync::Lazy;
use regex::Regex;

use rectifai_core::{dedup_labels, ProviderKind};

use crate::grammar::char_len;

/// Property compared between original and corrected text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    /// Texts differ at all
    Changed,
    /// Texts differ ignoring case
    Reworded,
    /// Texts differ only in case
    CaseOnly,
    /// Non-word, non-space characters differ
    ShapeChanged,
    /// Length-change ratio is above the threshold
    LengthRatioAbove(f64),
    /// Sentence count differs; `skip_blank` ignores empty segments
    SentenceCount { skip_blank: bool },
    /// Whitespace-separated word count differs
    WordCount,
    /// Count of characters from the set differs
    PunctuationCount(&'static str),
    /// Corrected text introduces a word from the list
    NewVocabulary(&'static [&'static str]),
    /// Corrected text has more words of at least this many letters
    MoreLongWords(usize),
    /// A known misspelling in the original is fixed in the correction
    KnownFixes,
}

/// A check and the label it contributes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub check: Check,
    pub label: &'static str,
}

const fn signal(check: Check, label: &'static str) -> Signal {
    Signal { check, label }
}

/// Ordered signals with the fallback label used when none fire
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierProfile {
    pub signals: Vec<Signal>,
    pub default_label: &'static str,
    /// Evaluate nothing when the texts are identical
    pub only_when_changed: bool,
}

pub const STANDARD_PUNCTUATION: &str = ".!?,:;";
pub const EXTENDED_PUNCTUATION: &str = ".!?,:;()-";

pub const PROFESSIONAL_WORDS: &[&str] = &[
    "utilize",
    "implement",
    "facilitate",
    "optimize",
    "enhance",
    "ensure",
    "provide",
    "maintain",
];

pub const ADVANCED_PROFESSIONAL_WORDS: &[&str] = &[
    "utilize",
    "implement",
    "facilitate",
    "optimize",
    "enhance",
    "ensure",
    "provide",
    "maintain",
    "demonstrate",
    "establish",
    "comprehensive",
    "strategic",
    "innovative",
    "effective",
    "efficient",
    "sophisticated",
];

pub const LOGICAL_CONNECTORS: &[&str] = &[
    "therefore",
    "however",
    "furthermore",
    "consequently",
    "moreover",
    "nevertheless",
];

/// (misspelled in original, fixed in correction, label)
static KNOWN_FIXES: Lazy<Vec<(Regex, Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bi\b", r"\bI\b", "capitalization"),
        (r"(?i)\bteh\b", r"(?i)\bthe\b", "spelling"),
        (r"(?i)\brecieve\b", r"(?i)\breceive\b", "spelling"),
        (r"(?i)\bseperate\b", r"(?i)\bseparate\b", "spelling"),
        (r"(?i)\bdefinately\b", r"(?i)\bdefinitely\b", "spelling"),
    ]
    .into_iter()
    .map(|(before, after, label)| {
        (
            Regex::new(before).expect("valid known-fix pattern"),
            Regex::new(after).expect("valid known-fix pattern"),
            label,
        )
    })
    .collect()
});

static SENTENCE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence split pattern"));

static LONG_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid word pattern"));

fn sentence_count(text: &str, skip_blank: bool) -> usize {
    SENTENCE_SPLIT
        .split(text)
        .filter(|s| !skip_blank || !s.trim().is_empty())
        .count()
}

fn punctuation_count(text: &str, set: &str) -> usize {
    text.chars().filter(|c| set.contains(*c)).count()
}

fn shape(text: &str) -> String {
    text.chars()
        .filter(|c| !(c.is_alphanumeric() || *c == '_' || c.is_whitespace()))
        .collect()
}

fn long_word_count(text: &str, min_len: usize) -> usize {
    LONG_WORD
        .find_iter(text)
        .filter(|m| char_len(m.as_str()) >= min_len)
        .count()
}

fn introduces_any(original: &str, corrected: &str, words: &[&str]) -> bool {
    let original = original.to_lowercase();
    let corrected = corrected.to_lowercase();
    words
        .iter()
        .any(|w| !original.contains(w) && corrected.contains(w))
}

impl Check {
    /// Labels this check contributes; `label` is used by every check except
    /// [`Check::KnownFixes`], which carries its own.
    fn fire(
        &self,
        original: &str,
        corrected: &str,
        label: &'static str,
        out: &mut Vec<&'static str>,
    ) {
        let fired = match *self {
            Check::Changed => original != corrected,
            Check::Reworded => original.to_lowercase() != corrected.to_lowercase(),
            Check::CaseOnly => {
                original != corrected && original.to_lowercase() == corrected.to_lowercase()
            }
            Check::ShapeChanged => shape(original) != shape(corrected),
            Check::LengthRatioAbove(threshold) => {
                let diff = char_len(original).abs_diff(char_len(corrected)) as f64;
                diff > char_len(original) as f64 * threshold
            }
            Check::SentenceCount { skip_blank } => {
                sentence_count(original, skip_blank) != sentence_count(corrected, skip_blank)
            }
            Check::WordCount => {
                original.split_whitespace().count() != corrected.split_whitespace().count()
            }
            Check::PunctuationCount(set) => {
                punctuation_count(original, set) != punctuation_count(corrected, set)
            }
            Check::NewVocabulary(words) => introduces_any(original, corrected, words),
            Check::MoreLongWords(min_len) => {
                long_word_count(corrected, min_len) > long_word_count(original, min_len)
            }
            Check::KnownFixes => {
                for (before, after, fix_label) in KNOWN_FIXES.iter() {
                    if before.is_match(original) && after.is_match(corrected) {
                        out.push(*fix_label);
                    }
                }
                false
            }
        };

        if fired {
            out.push(label);
        }
    }
}

impl ClassifierProfile {
    /// Label vocabulary used by a provider's adapter
    pub fn for_provider(kind: ProviderKind) -> Self {
        use Check::*;

        match kind {
            ProviderKind::ClaudeEdge | ProviderKind::Claude => Self {
                signals: vec![
                    signal(Reworded, "RectifAI Language Enhancement"),
                    signal(ShapeChanged, "Advanced Structure Optimization"),
                    signal(LengthRatioAbove(0.05), "Intelligent Content Optimization"),
                    signal(
                        NewVocabulary(ADVANCED_PROFESSIONAL_WORDS),
                        "Professional Excellence Enhancement",
                    ),
                    signal(
                        SentenceCount { skip_blank: true },
                        "Clarity & Readability Optimization",
                    ),
                    signal(
                        PunctuationCount(EXTENDED_PUNCTUATION),
                        "Advanced Punctuation & Formatting",
                    ),
                    signal(MoreLongWords(8), "Tone & Style Sophistication"),
                    signal(NewVocabulary(LOGICAL_CONNECTORS), "Logic & Coherence Enhancement"),
                ],
                default_label: "RectifAI Universal Enhancement",
                only_when_changed: false,
            },
            ProviderKind::Gemini => Self {
                signals: vec![
                    signal(KnownFixes, ""),
                    signal(Reworded, "language enhancement"),
                    signal(ShapeChanged, "structure optimization"),
                    signal(LengthRatioAbove(0.1), "content optimization"),
                    signal(CaseOnly, "formatting enhancement"),
                    signal(NewVocabulary(PROFESSIONAL_WORDS), "professional enhancement"),
                    signal(SentenceCount { skip_blank: true }, "clarity improvement"),
                    signal(PunctuationCount(STANDARD_PUNCTUATION), "punctuation"),
                ],
                default_label: "universal enhancement",
                only_when_changed: false,
            },
            ProviderKind::OpenAi => Self {
                signals: vec![
                    signal(Changed, "AI enhancement"),
                    signal(Reworded, "language improvement"),
                    signal(SentenceCount { skip_blank: false }, "structure optimization"),
                    signal(PunctuationCount(STANDARD_PUNCTUATION), "punctuation"),
                ],
                default_label: "text enhancement",
                only_when_changed: true,
            },
            ProviderKind::Perplexity => Self {
                signals: vec![
                    signal(Changed, "RectifAI enhancement"),
                    signal(Reworded, "language improvement"),
                    signal(SentenceCount { skip_blank: false }, "structure optimization"),
                    signal(PunctuationCount(STANDARD_PUNCTUATION), "punctuation"),
                    signal(NewVocabulary(PROFESSIONAL_WORDS), "professional enhancement"),
                ],
                default_label: "universal enhancement",
                only_when_changed: true,
            },
            ProviderKind::HuggingFace => Self {
                signals: vec![
                    signal(Changed, "grammar enhancement"),
                    signal(Reworded, "language improvement"),
                    signal(WordCount, "structure optimization"),
                    signal(PunctuationCount(STANDARD_PUNCTUATION), "punctuation"),
                ],
                default_label: "text enhancement",
                only_when_changed: true,
            },
        }
    }

    /// Labels for a correction, in signal order; never empty
    pub fn classify(&self, original: &str, corrected: &str) -> Vec<String> {
        let mut labels: Vec<&'static str> = Vec::new();

        if !(self.only_when_changed && original == corrected) {
            for s in &self.signals {
                s.check.fire(original, corrected, s.label, &mut labels);
            }
        }

        if labels.is_empty() {
            labels.push(self.default_label);
        }

        dedup_labels(labels)
    }
}
