//! Application state shared across handlers

use crate::assistant::{Assistant, ProcessingFlag};
use crate::config::Settings;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Question answering pipeline
    pub assistant: Arc<Assistant>,
    /// Idle / Processing
    pub processing: ProcessingFlag,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create application state around an already wired assistant
    pub fn new(settings: Settings, assistant: Assistant) -> anyhow::Result<Self> {
        Ok(Self {
            settings: Arc::new(settings),
            assistant: Arc::new(assistant),
            processing: ProcessingFlag::new(),
            templates: Arc::new(super::Templates::new()?),
        })
    }

    /// Build everything from settings
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let assistant = Assistant::from_settings(&settings)?;
        Self::new(settings, assistant)
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
