//! Error taxonomy for the download pipeline.
//!
//! Per-item failures are split by how they are handled: metadata lookups are
//! best-effort and never fail an item, download operations are retried, and a
//! missing identifier fails the item without touching the provider. Only
//! [`RunError`] escapes the orchestrator.

use thiserror::Error;

/// Best-effort metadata lookup failed. The fetcher swallows this and falls
/// back to the item's own title.
#[derive(Debug, Clone, Error)]
#[error("metadata lookup failed: {0}")]
pub struct MetadataLookupError(pub String);

/// A download attempt failed. Retryable; the message ends up in
/// `RetryOutcome::Failed::last_error` once attempts are exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct OperationError(pub String);

impl OperationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// External tool could not be located or started.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{tool} not found on PATH")]
    ToolNotFound {
        tool: &'static str,
        #[source]
        source: which::Error,
    },
    #[error("configured yt-dlp path does not exist: {0}")]
    MissingBinary(std::path::PathBuf),
}

/// Run-level failure: reported once, the run does not start (or, for playlist
/// lookup, never gets a work list).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("not a valid http(s) playlist URL: {0}")]
    InvalidUrl(String),
    #[error("no items to download (playlist is empty or private)")]
    EmptyWorkSource,
    #[error("none of the {0} items has an identifier")]
    NoValidItems(usize),
    #[error("could not fetch playlist info after {attempts} attempt(s): {message}")]
    PlaylistLookup { attempts: u32, message: String },
}

/// Invalid run settings (from config file or CLI overrides).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("batch_size must be at least 1")]
    ZeroBatchSize,
    #[error("retry.max_attempts must be at least 1")]
    ZeroAttempts,
    #[error("invalid {name} delay range: min {min}s, max {max}s")]
    InvalidDelayRange { name: &'static str, min: f64, max: f64 },
    #[error("retry.base_delay_secs must be a non-negative number, got {0}")]
    InvalidBaseDelay(f64),
}
