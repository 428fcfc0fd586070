//! Web context types

use serde::Serialize;

/// Shown in place of context when no page produced any text
pub const NO_CONTENT: &str = "No relevant web content found.";

/// Prefix of the text shown when the search itself failed
pub const SEARCH_ERROR_PREFIX: &str = "Web search error:";

/// Text extracted from one result page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageBlock {
    pub title: String,
    pub url: String,
    pub text: String,
}

impl PageBlock {
    /// The labeled block as it appears in the context
    pub fn render(&self) -> String {
        format!("\n\n--- PAGE: {} ---\n{}\n", self.title, self.text)
    }
}

/// Outcome of gathering web context for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WebContext {
    /// At least one page produced text, in result order
    Pages { pages: Vec<PageBlock> },
    /// Search worked but nothing usable came out of it
    NothingFound,
    /// The search provider failed
    SearchFailed { reason: String },
}

impl WebContext {
    /// Build from collected blocks, falling back to [`WebContext::NothingFound`]
    pub fn from_pages(pages: Vec<PageBlock>) -> Self {
        if pages.is_empty() {
            Self::NothingFound
        } else {
            Self::Pages { pages }
        }
    }

    /// Text form used for display, transcripts and prompts
    pub fn render(&self) -> String {
        match self {
            Self::Pages { pages } => pages.iter().map(PageBlock::render).collect(),
            Self::NothingFound => NO_CONTENT.to_string(),
            Self::SearchFailed { reason } => format!("{} {}", SEARCH_ERROR_PREFIX, reason),
        }
    }

    pub fn is_search_failure(&self) -> bool {
        matches!(self, Self::SearchFailed { .. })
    }

    pub fn page_count(&self) -> usize {
        match self {
            Self::Pages { pages } => pages.len(),
            _ => 0,
        }
    }
}

/// A result that contributed nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPage {
    pub url: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    InvalidLink,
    FetchFailed(String),
    Empty,
}

impl SkippedPage {
    /// User-facing notice, only for pages that failed to download
    pub fn notice(&self) -> Option<String> {
        match &self.reason {
            SkipReason::FetchFailed(err) => Some(format!("Error scraping {}: {}", self.url, err)),
            _ => None,
        }
    }
}

/// Everything the aggregator learned for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gathered {
    pub context: WebContext,
    pub skipped: Vec<SkippedPage>,
}

impl Gathered {
    pub fn search_failed(reason: impl Into<String>) -> Self {
        Self {
            context: WebContext::SearchFailed {
                reason: reason.into(),
            },
            skipped: Vec::new(),
        }
    }

    /// Notices for pages that could not be fetched
    pub fn notices(&self) -> Vec<String> {
        self.skipped.iter().filter_map(SkippedPage::notice).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(title: &str, text: &str) -> PageBlock {
        PageBlock {
            title: title.to_string(),
            url: format!("https://{}.example/", title.to_lowercase()),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_render_pages_in_order() {
        let context = WebContext::from_pages(vec![
            block("A", "Paris is the capital."),
            block("B", "France's capital is Paris."),
        ]);
        assert_eq!(
            context.render(),
            "\n\n--- PAGE: A ---\nParis is the capital.\n\n\n--- PAGE: B ---\nFrance's capital is Paris.\n"
        );
        assert_eq!(context.page_count(), 2);
    }

    #[test]
    fn test_empty_pages_render_sentinel() {
        let context = WebContext::from_pages(vec![]);
        assert_eq!(context, WebContext::NothingFound);
        assert_eq!(context.render(), "No relevant web content found.");
    }

    #[test]
    fn test_search_failure_render() {
        let gathered = Gathered::search_failed("connection reset");
        assert!(gathered.context.is_search_failure());
        assert_eq!(gathered.context.render(), "Web search error: connection reset");
    }

    #[test]
    fn test_notices_only_for_fetch_failures() {
        let gathered = Gathered {
            context: WebContext::NothingFound,
            skipped: vec![
                SkippedPage {
                    url: "nope".to_string(),
                    reason: SkipReason::InvalidLink,
                },
                SkippedPage {
                    url: "https://slow.example/".to_string(),
                    reason: SkipReason::FetchFailed("timed out after 10s".to_string()),
                },
            ],
        };
        assert_eq!(
            gathered.notices(),
            vec!["Error scraping https://slow.example/: timed out after 10s".to_string()]
        );
    }
}
