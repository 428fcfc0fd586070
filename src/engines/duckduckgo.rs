//! DuckDuckGo search engine implementation (HTML endpoint)

use super::traits::*;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;
use url::Url;

static RESULT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.result:not(.result--ad)").expect("valid selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.result__a").expect("valid selector"));

/// DuckDuckGo web search engine
pub struct DuckDuckGo {
    html_url: String,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self::with_base_url("https://html.duckduckgo.com/html/")
    }

    /// Point the engine at another HTML endpoint
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            html_url: url.into(),
        }
    }

    fn parse_html_results(&self, html: &str) -> Vec<SearchResult> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        for element in document.select(&RESULT_SELECTOR) {
            let title_elem = match element.select(&TITLE_SELECTOR).next() {
                Some(t) => t,
                None => continue,
            };

            let title = title_elem.text().collect::<String>().trim().to_string();
            if title.is_empty() {
                continue;
            }

            let href = match title_elem.value().attr("href").and_then(resolve_link) {
                Some(h) => h,
                None => continue,
            };

            results.push(SearchResult::new(title, href));
        }

        results
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

/// Unwrap DuckDuckGo's `/l/?uddg=` redirect links.
///
/// Other links are passed through untouched; internal DuckDuckGo links
/// that don't carry a target are dropped.
fn resolve_link(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let base = Url::parse("https://duckduckgo.com/").ok()?;
    let Ok(parsed) = base.join(href) else {
        return Some(href.to_string());
    };

    let is_internal = parsed
        .host_str()
        .map(|h| h == "duckduckgo.com" || h.ends_with(".duckduckgo.com"))
        .unwrap_or(false);

    if !is_internal {
        return Some(href.to_string());
    }

    parsed
        .query_pairs()
        .find(|(k, _)| k == "uddg")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

impl Engine for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn request(&self, params: &RequestParams) -> Result<EngineRequest, SearchError> {
        let mut form_data = HashMap::new();
        form_data.insert("q".to_string(), params.query.clone());
        form_data.insert("b".to_string(), String::new());
        form_data.insert("kl".to_string(), params.region.clone());

        Ok(EngineRequest::post(&self.html_url)
            .header("Referer", "https://html.duckduckgo.com/")
            .form(form_data))
    }

    fn response(&self, response: EngineResponse) -> Result<Vec<SearchResult>, SearchError> {
        if !response.is_success() {
            return Err(SearchError::Http(response.status));
        }

        let results = self.parse_html_results(&response.text);
        if results.is_empty() && response.is_captcha() {
            return Err(SearchError::Blocked(
                "DuckDuckGo served a bot challenge".to_string(),
            ));
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> EngineResponse {
        EngineResponse {
            status: 200,
            text: body.to_string(),
        }
    }

    #[test]
    fn test_duckduckgo_request() {
        let ddg = DuckDuckGo::new();
        let params = RequestParams::new("rust programming").with_region("fr-fr");
        let request = ddg.request(&params).unwrap();

        assert!(request.url.contains("duckduckgo.com"));
        assert_eq!(request.method, HttpMethod::Post);
        let Some(RequestBody::Form(form)) = request.data else {
            panic!("expected form body");
        };
        assert_eq!(form["q"], "rust programming");
        assert_eq!(form["kl"], "fr-fr");
    }

    #[test]
    fn test_parse_results_in_order() {
        let html = r#"
            <div class="result results_links">
              <h2><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fen.wikipedia.org%2Fwiki%2FParis&amp;rut=abc">Paris - Wikipedia</a></h2>
            </div>
            <div class="result result--ad">
              <a class="result__a" href="https://ads.example.com/">Sponsored</a>
            </div>
            <div class="result">
              <a class="result__a" href="https://www.britannica.com/place/Paris"> Paris | Britannica </a>
            </div>
            <div class="result"><a class="result__a" href="/about">   </a></div>
        "#;

        let results = DuckDuckGo::new().response(page(html)).unwrap();

        assert_eq!(
            results,
            vec![
                SearchResult::new("Paris - Wikipedia", "https://en.wikipedia.org/wiki/Paris"),
                SearchResult::new("Paris | Britannica", "https://www.britannica.com/place/Paris"),
            ]
        );
    }

    #[test]
    fn test_http_error() {
        let mut response = page("");
        response.status = 503;
        let err = DuckDuckGo::new().response(response).unwrap_err();
        assert!(matches!(err, SearchError::Http(503)));
    }

    #[test]
    fn test_captcha_page_is_blocked() {
        let html = r#"<div class="anomaly-modal__title">Unfortunately, bots use DuckDuckGo too.</div>"#;
        let err = DuckDuckGo::new().response(page(html)).unwrap_err();
        assert!(matches!(err, SearchError::Blocked(_)));
    }

    #[test]
    fn test_resolve_link() {
        assert_eq!(
            resolve_link("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fa%3Fb%3D1"),
            Some("https://example.com/a?b=1".to_string())
        );
        assert_eq!(resolve_link("https://duckduckgo.com/settings"), None);
        assert_eq!(resolve_link("/relative/page"), None);
        assert_eq!(
            resolve_link("http://example.org/x"),
            Some("http://example.org/x".to_string())
        );
        assert_eq!(resolve_link(""), None);
    }
}
