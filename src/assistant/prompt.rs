//! Prompt composition

/// Appended after the web context
pub const CONTEXT_INSTRUCTION: &str =
    "Please provide a detailed answer using the above context when relevant.";

/// Build the model input.
///
/// Without internet search the question goes out unchanged. `context` is
/// expected to start with its own separator (as rendered page blocks do).
pub fn compose_prompt(question: &str, context: &str, use_internet: bool) -> String {
    if !use_internet {
        return question.to_string();
    }

    format!(
        "Question: {}\n\nWeb Context (for reference):{}\n\n{}",
        question, context, CONTEXT_INSTRUCTION
    )
}
