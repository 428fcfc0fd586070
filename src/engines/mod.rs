//! Search engine module
//!
//! Defines the Engine and SearchProvider traits and the DuckDuckGo engine
//! used to find pages for the web context.

mod loader;
mod provider;
mod traits;

pub mod duckduckgo;

pub use duckduckgo::DuckDuckGo;
pub use loader::EngineLoader;
pub use provider::EngineSearch;
pub use traits::*;
