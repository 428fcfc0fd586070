//! Search, scrape and merge

use super::types::*;
use crate::engines::{SearchProvider, SearchResult};
use crate::scrape::{is_valid_link, PageFetcher};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Builds the web context for a question
pub struct ContextAggregator {
    search: Arc<dyn SearchProvider>,
    fetcher: PageFetcher,
    concurrency: usize,
}

impl ContextAggregator {
    pub fn new(search: Arc<dyn SearchProvider>, fetcher: PageFetcher) -> Self {
        Self {
            search,
            fetcher,
            concurrency: 1,
        }
    }

    /// Fetch up to `concurrency` pages at once. Output order is unaffected.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Search for `query`, scrape up to `max_results` hits and merge their text
    pub async fn build_context(
        &self,
        query: &str,
        max_results: usize,
        max_length: usize,
    ) -> Gathered {
        let start = Instant::now();

        let results = match self.search.search(query, max_results).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Web search failed for '{}': {}", query, e);
                return Gathered::search_failed(e.to_string());
            }
        };

        info!("Scraping {} results for '{}'", results.len().min(max_results), query);

        // `buffered` yields in input order regardless of completion order.
        let outcomes: Vec<Result<PageBlock, SkippedPage>> =
            stream::iter(results.into_iter().take(max_results))
                .map(|result| self.scrape(result, max_length))
                .buffered(self.concurrency)
                .collect()
                .await;

        let mut pages = Vec::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(page) => pages.push(page),
                Err(skip) => skipped.push(skip),
            }
        }

        debug!(
            "Context for '{}': {} pages, {} skipped in {:?}",
            query,
            pages.len(),
            skipped.len(),
            start.elapsed()
        );

        Gathered {
            context: WebContext::from_pages(pages),
            skipped,
        }
    }

    async fn scrape(
        &self,
        result: SearchResult,
        max_length: usize,
    ) -> Result<PageBlock, SkippedPage> {
        let SearchResult { title, href } = result;

        if !is_valid_link(&href) {
            debug!("Skipping invalid link: {}", href);
            return Err(SkippedPage {
                url: href,
                reason: SkipReason::InvalidLink,
            });
        }

        match self.fetcher.fetch_and_extract(&href, max_length).await {
            Ok(text) if text.is_empty() => Err(SkippedPage {
                url: href,
                reason: SkipReason::Empty,
            }),
            Ok(text) => Ok(PageBlock {
                title,
                url: href,
                text,
            }),
            Err(e) => {
                warn!("Error scraping {}: {}", href, e);
                Err(SkippedPage {
                    url: href,
                    reason: SkipReason::FetchFailed(e.to_string()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::SearchError;
    use crate::network::HttpClient;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Returns canned results and records the limit it was asked for
    struct FixedSearch {
        results: Vec<SearchResult>,
        limits: Mutex<Vec<usize>>,
    }

    impl FixedSearch {
        fn new(results: Vec<SearchResult>) -> Arc<Self> {
            Arc::new(Self {
                results,
                limits: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SearchProvider for FixedSearch {
        async fn search(
            &self,
            _query: &str,
            limit: usize,
        ) -> Result<Vec<SearchResult>, SearchError> {
            self.limits.lock().unwrap().push(limit);
            // Deliberately ignores `limit` to prove the aggregator enforces it.
            Ok(self.results.clone())
        }
    }

    struct BrokenSearch;

    #[async_trait]
    impl SearchProvider for BrokenSearch {
        async fn search(
            &self,
            _query: &str,
            _limit: usize,
        ) -> Result<Vec<SearchResult>, SearchError> {
            Err(SearchError::Other("network unreachable".to_string()))
        }
    }

    async fn serve(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(server)
            .await;
    }

    fn aggregator(search: Arc<dyn SearchProvider>) -> ContextAggregator {
        let fetcher =
            PageFetcher::new(HttpClient::new().unwrap()).with_timeout(Duration::from_millis(300));
        ContextAggregator::new(search, fetcher)
    }

    #[tokio::test]
    async fn test_capital_of_france() {
        let server = MockServer::start().await;
        serve(&server, "/a", "<p>Paris is the capital.</p>").await;
        serve(&server, "/b", "<p>France's capital is Paris.</p>").await;

        let search = FixedSearch::new(vec![
            SearchResult::new("A", format!("{}/a", server.uri())),
            SearchResult::new("B", format!("{}/b", server.uri())),
        ]);
        let gathered = aggregator(search.clone())
            .build_context("capital of France", 2, 2000)
            .await;

        assert_eq!(
            gathered.context.render(),
            "\n\n--- PAGE: A ---\nParis is the capital.\n\n\n--- PAGE: B ---\nFrance's capital is Paris.\n"
        );
        assert_eq!(*search.limits.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_blocks_are_truncated() {
        let server = MockServer::start().await;
        serve(&server, "/a", "<p>Paris is the capital.</p>").await;
        serve(&server, "/b", "<p>France's capital is Paris.</p>").await;

        let search = FixedSearch::new(vec![
            SearchResult::new("A", format!("{}/a", server.uri())),
            SearchResult::new("B", format!("{}/b", server.uri())),
        ]);
        let gathered = aggregator(search).build_context("capital of France", 2, 5).await;

        let WebContext::Pages { pages } = gathered.context else {
            panic!("expected pages");
        };
        let texts: Vec<_> = pages.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["Paris", "Franc"]);
    }

    #[tokio::test]
    async fn test_never_more_blocks_than_max_results() {
        let server = MockServer::start().await;
        for route in ["/1", "/2", "/3", "/4"] {
            serve(&server, route, "<p>text</p>").await;
        }
        let search = FixedSearch::new(
            (1..=4)
                .map(|i| SearchResult::new(format!("T{i}"), format!("{}/{i}", server.uri())))
                .collect(),
        );

        let gathered = aggregator(search).build_context("q", 3, 100).await;
        assert_eq!(gathered.context.page_count(), 3);
    }

    #[tokio::test]
    async fn test_invalid_links_and_empty_pages_are_skipped() {
        let server = MockServer::start().await;
        serve(&server, "/empty", "<script>only()</script>").await;
        serve(&server, "/good", "<p>content</p>").await;

        let search = FixedSearch::new(vec![
            SearchResult::new("Relative", "/not/absolute"),
            SearchResult::new("Empty", format!("{}/empty", server.uri())),
            SearchResult::new("Good", format!("{}/good", server.uri())),
        ]);
        let gathered = aggregator(search).build_context("q", 3, 100).await;

        assert_eq!(gathered.context.render(), "\n\n--- PAGE: Good ---\ncontent\n");
        let reasons: Vec<_> = gathered.skipped.iter().map(|s| s.reason.clone()).collect();
        assert_eq!(reasons, vec![SkipReason::InvalidLink, SkipReason::Empty]);
        assert!(gathered.notices().is_empty());
    }

    #[tokio::test]
    async fn test_nothing_usable_returns_sentinel() {
        let search = FixedSearch::new(vec![SearchResult::new("Bad", "nonsense")]);
        let gathered = aggregator(search).build_context("q", 3, 100).await;
        assert_eq!(gathered.context, WebContext::NothingFound);
        assert_eq!(gathered.context.render(), "No relevant web content found.");

        let gathered = aggregator(FixedSearch::new(vec![])).build_context("q", 3, 100).await;
        assert_eq!(gathered.context.render(), "No relevant web content found.");
    }

    #[tokio::test]
    async fn test_one_timeout_does_not_sink_the_rest() {
        let server = MockServer::start().await;
        serve(&server, "/one", "<p>first page</p>").await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<p>too late</p>")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;
        serve(&server, "/three", "<p>third page</p>").await;

        let search = FixedSearch::new(vec![
            SearchResult::new("One", format!("{}/one", server.uri())),
            SearchResult::new("Slow", format!("{}/slow", server.uri())),
            SearchResult::new("Three", format!("{}/three", server.uri())),
        ]);
        let gathered = aggregator(search).build_context("q", 3, 100).await;

        let rendered = gathered.context.render();
        assert!(rendered.contains("--- PAGE: One ---\nfirst page"));
        assert!(rendered.contains("--- PAGE: Three ---\nthird page"));
        assert!(!rendered.contains("too late"));
        assert_eq!(gathered.notices().len(), 1);
        assert!(gathered.notices()[0].starts_with("Error scraping "));
    }

    #[tokio::test]
    async fn test_concurrent_fetch_keeps_result_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/first"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<p>first</p>")
                    .set_delay(Duration::from_millis(150)),
            )
            .mount(&server)
            .await;
        serve(&server, "/second", "<p>second</p>").await;

        let search = FixedSearch::new(vec![
            SearchResult::new("First", format!("{}/first", server.uri())),
            SearchResult::new("Second", format!("{}/second", server.uri())),
        ]);
        let gathered = aggregator(search)
            .with_concurrency(4)
            .build_context("q", 2, 100)
            .await;

        assert_eq!(
            gathered.context.render(),
            "\n\n--- PAGE: First ---\nfirst\n\n\n--- PAGE: Second ---\nsecond\n"
        );
    }

    #[tokio::test]
    async fn test_search_failure_is_tagged() {
        let gathered = aggregator(Arc::new(BrokenSearch)).build_context("q", 3, 100).await;
        assert!(gathered.context.is_search_failure());
        assert!(gathered.context.render().starts_with("Web search error:"));
    }
}
