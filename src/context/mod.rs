//! Web context gathering
//!
//! Turns a question into labeled page extracts: search, validate links,
//! scrape each page, merge the text in result order.

mod aggregator;
mod types;

pub use aggregator::ContextAggregator;
pub use types::*;
