//! HTTP networking module
//!
//! Provides the browser-like HTTP client used for searching and page fetching.

mod client;
mod user_agent;

pub use client::HttpClient;
pub use user_agent::desktop_user_agent;
