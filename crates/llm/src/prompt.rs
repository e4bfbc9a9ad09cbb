//! Correction prompts
//!
//! Chat APIs get the instructions as a system message and the raw input as
//! the user message. Single-prompt APIs get the input embedded in the
//! instructions.

use rectifai_core::ProviderKind;

/// Short instructions for general-purpose chat models
pub const CONCISE_SYSTEM_PROMPT: &str = "You are RectifAI, an advanced text correction system. \
Fix all grammar, spelling, punctuation, clarity and style issues while preserving the original \
meaning and tone. Respond with ONLY the corrected text, no explanations.";

const CORRECTION_AREAS: &str = "\
You are RectifAI, a universal text correction system. Fix everything that is wrong with the \
content you are given, whatever its domain.

CORRECTION AREAS:
Language and communication:
- Grammar, spelling, punctuation, syntax
- Clarity, coherence, flow, readability
- Tone consistency and word choice, redundancy removal

Logic and reasoning:
- Factual consistency and logical flow
- Missing context and contradictions

Professional and technical:
- Business communication standards
- Technical accuracy and terminology
- Professional formatting and structure

Style and context:
- Narrative flow and expression
- Cultural sensitivity and appropriate formality
- Adaptation to the intended audience

PRINCIPLES:
- Fix everything that can be improved
- Keep the original intent and voice
- Keep the core message";

const RESPONSE_RULE: &str = "RESPOND WITH ONLY THE CORRECTED TEXT. NO EXPLANATIONS, NO FORMATTING, \
JUST THE IMPROVED TEXT.";

/// Instruction prepended to the input for the Hugging Face text-to-text model
pub const HUGGINGFACE_INSTRUCTION: &str = "Fix grammar and improve this text: ";

/// System prompt for chat-style providers
pub fn system_prompt(kind: ProviderKind) -> String {
    match kind {
        ProviderKind::OpenAi => CONCISE_SYSTEM_PROMPT.to_string(),
        _ => format!("{}\n\n{}", CORRECTION_AREAS, RESPONSE_RULE),
    }
}

/// Full prompt with the input embedded, for single-prompt providers
pub fn single_prompt(input: &str) -> String {
    format!(
        "{}\n\nINPUT TO CORRECT: \"{}\"\n\nProvide only the corrected version, addressing every \
         possible improvement while preserving the core message and intent.\n\n{}",
        CORRECTION_AREAS, input, RESPONSE_RULE
    )
}

/// Input as sent to the Hugging Face model
pub fn huggingface_input(input: &str) -> String {
    format!("{}{}", HUGGINGFACE_INSTRUCTION, input)
}

/// Remove an echoed instruction prefix (case-insensitive) and trim
pub fn strip_instruction(generated: &str) -> &str {
    let prefix = HUGGINGFACE_INSTRUCTION.trim_end();
    let trimmed = generated.trim_start();

    match trimmed.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => trimmed[prefix.len()..].trim(),
        _ => trimmed.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_prompt_embeds_input() {
        let prompt = single_prompt("i cant go");
        assert!(prompt.contains("INPUT TO CORRECT: \"i cant go\""));
        assert!(prompt.ends_with(RESPONSE_RULE));
    }

    #[test]
    fn test_system_prompts() {
        assert_eq!(system_prompt(ProviderKind::OpenAi), CONCISE_SYSTEM_PROMPT);
        assert!(system_prompt(ProviderKind::Perplexity).contains("CORRECTION AREAS"));
    }

    #[test]
    fn test_strip_instruction() {
        assert_eq!(
            strip_instruction("Fix grammar and improve this text: I can't go."),
            "I can't go."
        );
        assert_eq!(
            strip_instruction("  fix GRAMMAR and improve this text:   Hello "),
            "Hello"
        );
        assert_eq!(strip_instruction(" Hello there "), "Hello there");
        assert_eq!(strip_instruction("Fix"), "Fix");
    }

    #[test]
    fn test_strip_instruction_multibyte() {
        assert_eq!(strip_instruction("héllo wörld, ça va très bien"), "héllo wörld, ça va très bien");
    }
}
