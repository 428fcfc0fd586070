//! Downloadable transcript

/// File name offered for the saved output
pub const TRANSCRIPT_FILE_NAME: &str = "Ollama_Output.txt";

/// Plain-text record of one exchange
pub fn render_transcript(question: &str, context: &str, reply: &str) -> String {
    format!(
        "Question: {}\n\nWeb Content:\n{}\n\nAnswer:\n{}",
        question, context, reply
    )
}
