//! Page scraping
//!
//! Link validation, page download and HTML-to-text reduction.

mod extract;
mod fetcher;
mod links;

pub use extract::{collapse_blank_lines, extract_text, html_to_text, truncate_chars};
pub use fetcher::{FetchError, PageFetcher, PAGE_TIMEOUT};
pub use links::is_valid_link;
