//! Search, compose, ask

use super::prompt::compose_prompt;
use super::transcript::render_transcript;
use crate::config::Settings;
use crate::context::ContextAggregator;
use crate::engines::EngineLoader;
use crate::llm::{ChatModel, OllamaClient};
use crate::network::HttpClient;
use crate::scrape::PageFetcher;
use anyhow::Result;
use serde::Serialize;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Accepted range for the number of scraped results
pub const MAX_RESULTS_RANGE: RangeInclusive<usize> = 1..=10;

/// Accepted range for the per-page character budget
pub const MAX_LENGTH_RANGE: RangeInclusive<usize> = 100..=10000;

/// Per-request knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AskOptions {
    pub use_internet: bool,
    pub max_results: usize,
    pub max_length: usize,
}

impl Default for AskOptions {
    fn default() -> Self {
        Self {
            use_internet: true,
            max_results: 3,
            max_length: 2000,
        }
    }
}

impl AskOptions {
    /// Pull both numbers into their accepted ranges
    pub fn clamped(self) -> Self {
        Self {
            use_internet: self.use_internet,
            max_results: self
                .max_results
                .clamp(*MAX_RESULTS_RANGE.start(), *MAX_RESULTS_RANGE.end()),
            max_length: self
                .max_length
                .clamp(*MAX_LENGTH_RANGE.start(), *MAX_LENGTH_RANGE.end()),
        }
    }
}

/// Result of one request: what the user sees
#[derive(Debug, Clone, Default, Serialize)]
pub struct Exchange {
    pub question: String,
    pub model: String,
    /// Rendered web context, empty when search was off
    pub context: String,
    /// Model reply or an `Error: ...` line
    pub reply: String,
    /// Pages that failed to download
    pub notices: Vec<String>,
    pub elapsed_ms: u64,
}

impl Exchange {
    pub fn transcript(&self) -> String {
        render_transcript(&self.question, &self.context, &self.reply)
    }

    pub fn is_error(&self) -> bool {
        self.reply.starts_with("Error: ")
    }
}

/// Runs the whole pipeline for a question
pub struct Assistant {
    aggregator: ContextAggregator,
    model: Arc<dyn ChatModel>,
}

impl Assistant {
    pub fn new(aggregator: ContextAggregator, model: Arc<dyn ChatModel>) -> Self {
        Self { aggregator, model }
    }

    /// Wire up search, fetching and the model from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = HttpClient::with_settings(&settings.outgoing)?;
        let search = EngineLoader::load(settings, client.clone())?;
        let fetcher = PageFetcher::new(client.clone())
            .with_timeout(Duration::from_secs_f64(settings.outgoing.page_timeout));
        let aggregator = ContextAggregator::new(Arc::new(search), fetcher)
            .with_concurrency(settings.search.fetch_concurrency);
        let model = OllamaClient::from_settings(client.inner().clone(), &settings.ollama);
        info!("Using Ollama at {}", model.base_url());

        Ok(Self::new(aggregator, Arc::new(model)))
    }

    /// Answer `question` with `model`; failures end up in the reply text.
    pub async fn answer(&self, question: &str, model: &str, options: AskOptions) -> Exchange {
        let start = Instant::now();

        let (context, prompt, notices) = if options.use_internet {
            let gathered = self
                .aggregator
                .build_context(question, options.max_results, options.max_length)
                .await;
            let rendered = gathered.context.render();

            // A failed search is shown to the user but kept out of the prompt.
            let prompt = if gathered.context.is_search_failure() {
                question.to_string()
            } else {
                compose_prompt(question, &rendered, true)
            };
            (rendered, prompt, gathered.notices())
        } else {
            (String::new(), compose_prompt(question, "", false), Vec::new())
        };

        let reply = match self.model.chat(model, &prompt).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Model {} failed: {}", model, e);
                format!("Error: {}", e)
            }
        };

        let elapsed = start.elapsed();
        info!("Answered with {} in {:?}", model, elapsed);

        Exchange {
            question: question.to_string(),
            model: model.to_string(),
            context,
            reply,
            notices,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}
