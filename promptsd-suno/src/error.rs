use thiserror::Error;

/// Errors raised while constructing the Suno resolver.
///
/// Resolution itself reports [`promptsd_core::ResolveError`].
#[derive(Debug, Error)]
pub enum SunoError {
    /// One of the URL or markup patterns failed to compile.
    #[error("Invalid Suno pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Convenience type alias for Results with `SunoError`.
pub type Result<T> = std::result::Result<T, SunoError>;
