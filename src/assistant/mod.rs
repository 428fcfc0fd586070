//! The question answering pipeline
//!
//! Gathers web context, composes the prompt and asks the model. Every
//! failure is folded into the returned [`Exchange`].

mod orchestrator;
mod processing;
mod prompt;
mod transcript;

pub use orchestrator::{AskOptions, Assistant, Exchange, MAX_LENGTH_RANGE, MAX_RESULTS_RANGE};
pub use processing::{ProcessingFlag, ProcessingGuard};
pub use prompt::{compose_prompt, CONTEXT_INSTRUCTION};
pub use transcript::{render_transcript, TRANSCRIPT_FILE_NAME};
