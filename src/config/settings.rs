//! Settings structures for the assistant configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure, mirrors settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub search: SearchSettings,
    pub ollama: OllamaSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that cannot be used as-is
    pub fn validate(&self) -> Result<()> {
        for (name, secs) in [
            ("outgoing.page_timeout", self.outgoing.page_timeout),
            ("outgoing.search_timeout", self.outgoing.search_timeout),
            ("ollama.timeout", self.ollama.timeout),
        ] {
            match Duration::try_from_secs_f64(secs) {
                Ok(d) if !d.is_zero() => {}
                _ => bail!("{} must be a positive number of seconds, got {}", name, secs),
            }
        }
        Ok(())
    }

    /// Merge with environment variables (ASSISTANT_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary variable lookup
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("ASSISTANT_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = lookup("ASSISTANT_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("ASSISTANT_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("ASSISTANT_OLLAMA_URL") {
            self.ollama.base_url = val;
        }
        if let Some(val) = lookup("ASSISTANT_MODELS") {
            let models: Vec<String> = val
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            if !models.is_empty() {
                self.ollama.models = models;
            }
        }
    }

    /// Default model shown first in the selector
    pub fn default_model(&self) -> &str {
        self.ollama
            .models
            .first()
            .map(|m| m.as_str())
            .unwrap_or(DEFAULT_MODEL)
    }

    /// Whether the model is one of the configured choices
    pub fn is_known_model(&self, name: &str) -> bool {
        self.ollama.models.iter().any(|m| m == name)
    }
}

const DEFAULT_MODEL: &str = "llama3.1:latest";

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Title displayed in the UI
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Ollama Search Assistant".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8501,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Timeout for fetching a single result page, in seconds
    pub page_timeout: f64,
    /// Timeout for the search engine request, in seconds
    pub search_timeout: f64,
    /// Fixed User-Agent (none = random desktop browser)
    pub user_agent: Option<String>,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            page_timeout: 10.0,
            search_timeout: 15.0,
            user_agent: None,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Web search behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Search engine backing the context aggregator
    pub engine: String,
    /// Region/language code passed to the engine
    pub region: String,
    /// Whether the "enable internet search" box starts checked
    pub enabled_by_default: bool,
    /// Default number of results to scrape (1-10)
    pub default_max_results: usize,
    /// Default per-page character budget (100-10000)
    pub default_max_length: usize,
    /// Number of pages fetched at once; 1 keeps fetching sequential
    pub fetch_concurrency: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            engine: "duckduckgo".to_string(),
            region: "wt-wt".to_string(),
            enabled_by_default: true,
            default_max_results: 3,
            default_max_length: 2000,
            fetch_concurrency: 1,
        }
    }
}

/// Ollama endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    /// Base URL of the Ollama server
    pub base_url: String,
    /// Models offered in the selector
    pub models: Vec<String>,
    /// Chat request timeout in seconds
    pub timeout: f64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".to_string(),
            models: vec![DEFAULT_MODEL.to_string()],
            timeout: 300.0,
        }
    }
}
