//! Error handling for FlowVis-RS
//!
//! This module defines the crate error type and a Result alias for use
//! throughout the application. Filters themselves never fail; errors come
//! from ingestion, storage, configuration and command routing.

use crate::pipeline::PipelineError;
use thiserror::Error;

/// Main error type for FlowVis-RS operations
#[derive(Error, Debug)]
pub enum FlowVisError {
    /// A record failed validation at ingestion
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to the dataset store
    #[error("Store error: {0}")]
    Store(String),

    /// No dataset stored under the requested key
    #[error("No dataset stored under key '{0}'")]
    DatasetMissing(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// Errors raised while routing a filter command
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Timeout errors
    #[error("Timeout: {0}")]
    Timeout(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FlowVisError>,
    },
}

impl FlowVisError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FlowVisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for FlowVisError {
    fn from(err: serde_json::Error) -> Self {
        FlowVisError::Serialization(err.to_string())
    }
}

/// Result type alias for FlowVis-RS operations
pub type Result<T> = std::result::Result<T, FlowVisError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
