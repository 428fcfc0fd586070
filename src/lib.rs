//! Ollama-Search-RS: answer questions with a local model and live web context
//!
//! A question is searched on the web, the top result pages are scraped to
//! plain text, and that text is handed to an Ollama model together with
//! the question.

pub mod assistant;
pub mod config;
pub mod context;
pub mod engines;
pub mod llm;
pub mod network;
pub mod scrape;
pub mod web;

pub use assistant::{AskOptions, Assistant, Exchange};
pub use config::Settings;
pub use context::{ContextAggregator, WebContext};
pub use engines::{SearchProvider, SearchResult};
pub use llm::{ChatModel, OllamaClient};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
