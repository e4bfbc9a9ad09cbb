//! Fallback correction rule table
//!
//! Rules run in table order. Each rule carries the label recorded when it
//! changes the text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Kind of improvement a rule makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleLabel {
    Spelling,
    Capitalization,
    Grammar,
    Punctuation,
    Formatting,
    ProfessionalEnhancement,
    StructureImprovement,
}

impl RuleLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spelling => "spelling",
            Self::Capitalization => "capitalization",
            Self::Grammar => "grammar",
            Self::Punctuation => "punctuation",
            Self::Formatting => "formatting",
            Self::ProfessionalEnhancement => "professional enhancement",
            Self::StructureImprovement => "structure improvement",
        }
    }
}

impl std::fmt::Display for RuleLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub(crate) enum Transform {
    /// Regex replacement; `$n` references allowed unless `preserve_case`
    Replace {
        pattern: Regex,
        replacement: &'static str,
        /// Keep an upper-case first letter of the matched text
        preserve_case: bool,
    },
    /// Upper-case the first letter of every sentence
    SentenceCase,
    /// `..` becomes `.`; ellipses and longer runs are left alone
    CollapseDoublePeriods,
    /// Remove leading and trailing whitespace
    Trim,
}

#[derive(Debug)]
pub(crate) struct Rule {
    pub label: RuleLabel,
    pub transform: Transform,
    /// Only applied when professional tone is enabled
    pub professional: bool,
}

impl Rule {
    pub fn apply(&self, text: &str) -> String {
        match &self.transform {
            Transform::Replace {
                pattern,
                replacement,
                preserve_case: true,
            } => pattern
                .replace_all(text, |caps: &Captures| match_case(&caps[0], replacement))
                .into_owned(),
            Transform::Replace {
                pattern,
                replacement,
                preserve_case: false,
            } => pattern.replace_all(text, *replacement).into_owned(),
            Transform::SentenceCase => SENTENCE_START
                .replace_all(text, |caps: &Captures| {
                    format!("{}{}", &caps[1], caps[2].to_uppercase())
                })
                .into_owned(),
            Transform::CollapseDoublePeriods => collapse_double_periods(text),
            Transform::Trim => text.trim().to_string(),
        }
    }
}

/// Give `replacement` an upper-case first letter when `matched` has one
fn match_case(matched: &str, replacement: &str) -> String {
    let starts_upper = matched.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return replacement.to_string();
    }

    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn collapse_double_periods(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;

    let flush = |out: &mut String, run: usize| {
        let keep = if run == 2 { 1 } else { run };
        out.extend(std::iter::repeat('.').take(keep));
    };

    for c in text.chars() {
        if c == '.' {
            run += 1;
            continue;
        }
        flush(&mut out, run);
        run = 0;
        out.push(c);
    }
    flush(&mut out, run);

    out
}

static SENTENCE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[.!?]\s+)(\p{Ll})").expect("valid sentence pattern"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid rule pattern {pattern:?}: {e}"))
}

/// Case-insensitive, word-bounded, case-preserving substitution
fn word(label: RuleLabel, from: &str, to: &'static str) -> Rule {
    // Phrases match any run of whitespace between their words
    let pattern = from.split(' ').collect::<Vec<_>>().join(r"\s+");
    Rule {
        label,
        transform: Transform::Replace {
            pattern: compile(&format!(r"(?i)\b{}\b", pattern)),
            replacement: to,
            preserve_case: true,
        },
        professional: false,
    }
}

fn pattern(label: RuleLabel, pattern: &str, replacement: &'static str) -> Rule {
    Rule {
        label,
        transform: Transform::Replace {
            pattern: compile(pattern),
            replacement,
            preserve_case: false,
        },
        professional: false,
    }
}

fn special(label: RuleLabel, transform: Transform) -> Rule {
    Rule {
        label,
        transform,
        professional: false,
    }
}

fn professional(from: &str, to: &'static str) -> Rule {
    Rule {
        professional: true,
        ..word(RuleLabel::ProfessionalEnhancement, from, to)
    }
}

const MISSPELLINGS: &[(&str, &str)] = &[
    ("teh", "the"),
    ("recieve", "receive"),
    ("seperate", "separate"),
    ("definately", "definitely"),
    ("occured", "occurred"),
    ("neccessary", "necessary"),
    ("existance", "existence"),
    ("alot", "a lot"),
    ("effectivly", "effectively"),
    ("powerfull", "powerful"),
    ("grammer", "grammar"),
    ("untill", "until"),
    ("wich", "which"),
    ("beleive", "believe"),
    ("thier", "their"),
    ("truely", "truly"),
    ("tommorow", "tomorrow"),
];

const GRAMMAR_PHRASES: &[(&str, &str)] = &[
    ("your welcome", "you're welcome"),
    ("their going", "they're going"),
    ("would of", "would have"),
    ("could of", "could have"),
    ("should of", "should have"),
    ("there performance", "their performance"),
    ("there customer", "their customer"),
];

const CONTRACTIONS: &[(&str, &str)] = &[
    ("cant", "can't"),
    ("dont", "don't"),
    ("wont", "won't"),
    ("isnt", "isn't"),
    ("arent", "aren't"),
    ("didnt", "didn't"),
    ("doesnt", "doesn't"),
    ("wasnt", "wasn't"),
    ("werent", "weren't"),
    ("couldnt", "couldn't"),
    ("shouldnt", "shouldn't"),
    ("wouldnt", "wouldn't"),
    ("havent", "haven't"),
    ("hasnt", "hasn't"),
];

const PROFESSIONAL_TONE: &[(&str, &str)] = &[
    ("very good", "excellent"),
    ("really good", "exceptional"),
    ("works well", "performs effectively"),
    ("stuff", "items"),
    ("thing", "element"),
    ("get better", "improve"),
    ("make sure", "ensure"),
    ("help with", "assist with"),
];

pub(crate) static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    use RuleLabel::*;

    let mut rules = Vec::new();

    for &(from, to) in MISSPELLINGS {
        rules.push(word(Spelling, from, to));
    }

    rules.push(pattern(Capitalization, r"\bi\b", "I"));

    for &(from, to) in GRAMMAR_PHRASES.iter().chain(CONTRACTIONS) {
        rules.push(word(Grammar, from, to));
    }

    rules.push(pattern(Punctuation, r"[ \t]+([,.!?;:])", "$1"));
    rules.push(pattern(Punctuation, r",(?:[ \t]*,)+", ","));
    rules.push(pattern(Punctuation, r"!{3,}", "!"));
    rules.push(pattern(Punctuation, r"\?{3,}", "?"));
    rules.push(pattern(Punctuation, r"\.{4,}", "..."));
    rules.push(special(Punctuation, Transform::CollapseDoublePeriods));

    rules.push(pattern(Formatting, r"\t+", " "));
    rules.push(pattern(Formatting, r" {2,}", " "));
    rules.push(pattern(Formatting, r"\n{3,}", "\n\n"));
    rules.push(special(Formatting, Transform::Trim));

    for &(from, to) in PROFESSIONAL_TONE {
        rules.push(professional(from, to));
    }

    rules.push(special(Capitalization, Transform::SentenceCase));

    rules.push(pattern(
        StructureImprovement,
        r"(?i)(^|[.!?]\s+)(however|therefore|furthermore|moreover|consequently|nevertheless)[ \t]+",
        "${1}${2}, ",
    ));

    rules
});
