use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Configuration errors
    #[error("Config file not found at {path}. A template has been created - please edit it with your Supabase project settings and restart.")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Missing required config field: {field}")]
    ConfigMissingField { field: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // Data layer errors
    #[error("Content source {source_name} failed: {reason}")]
    DataSource { source_name: String, reason: String },

    #[error("Failed to decode content payload: {0}")]
    Decode(#[from] serde_json::Error),

    // Network errors
    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Failures surfaced by a [`TrackResolver`](crate::TrackResolver).
///
/// Resolution is interactive: every variant is rendered to the submitting user
/// and none is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Input matches neither the canonical nor the short-link shape.
    #[error("Invalid Suno URL")]
    InvalidReference,

    /// Network or body-read failure while following a short link.
    #[error("Failed to resolve URL: {reason}")]
    ResolutionFailed { reason: String },

    /// The short link was fetched but no track identifier could be extracted.
    #[error("Could not resolve song ID")]
    UnresolvableReference,

    /// The same input is already being resolved.
    #[error("A resolution for this URL is already in progress")]
    InFlight,
}

impl ResolveError {
    /// Whether the user can fix this by editing the submitted URL.
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(self, Self::InvalidReference | Self::UnresolvableReference)
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        Self::ResolutionFailed {
            reason: err.to_string(),
        }
    }
}
