use crate::error::Result;
use crate::fetcher::{HttpPageFetcher, PageFetcher};
use crate::patterns::{LinkShape, SunoPatterns};
use async_trait::async_trait;
use promptsd_core::{ResolveError, ResolverConfig, TrackId, TrackReference, TrackResolver};
use tracing::{debug, info, warn};

const LOG_TARGET: &str = "promptsd::suno";

/// Resolves Suno canonical URLs and short links to track ids.
///
/// Canonical URLs resolve offline. Short links cost exactly one request;
/// the landing URL is checked first, then the page markup.
pub struct SunoResolver<F = HttpPageFetcher> {
    patterns: SunoPatterns,
    fetcher: F,
}

impl SunoResolver<HttpPageFetcher> {
    /// Create a resolver that follows short links over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the patterns fail to compile or the HTTP client
    /// cannot be created.
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        Self::with_fetcher(HttpPageFetcher::new(config)?)
    }
}

impl<F: PageFetcher> SunoResolver<F> {
    /// Create a resolver with a custom fetcher.
    ///
    /// # Errors
    ///
    /// Returns an error if the patterns fail to compile.
    pub fn with_fetcher(fetcher: F) -> Result<Self> {
        Ok(Self {
            patterns: SunoPatterns::new()?,
            fetcher,
        })
    }

    #[must_use]
    pub const fn patterns(&self) -> &SunoPatterns {
        &self.patterns
    }

    /// Track id from a canonical URL, without network access
    #[must_use]
    pub fn canonical_id(&self, url: &str) -> Option<TrackId> {
        self.patterns.canonical_id(url)
    }

    async fn follow_short_link(
        &self,
        raw_url: &str,
        fetch_url: &str,
    ) -> std::result::Result<TrackReference, ResolveError> {
        let page = self
            .fetcher
            .fetch(fetch_url)
            .await
            .inspect_err(|e| warn!(target: LOG_TARGET, "Failed to follow {}: {}", fetch_url, e))?;

        if let Some(id) = self.patterns.canonical_id(&page.final_url) {
            info!(target: LOG_TARGET, "Short link {} redirected to track {}", raw_url, id);
            return Ok(TrackReference::new(raw_url, id).with_resolved_url(page.final_url));
        }

        if !page.is_success() {
            warn!(target: LOG_TARGET, "Short link {} returned status {}", fetch_url, page.status);
            return Err(ResolveError::ResolutionFailed {
                reason: format!("Suno returned status: {}", page.status),
            });
        }

        match self.patterns.scan_markup(&page.body) {
            Some(id) => {
                info!(target: LOG_TARGET, "Short link {} resolved to track {} from page markup", raw_url, id);
                Ok(TrackReference::new(raw_url, id))
            }
            None => {
                warn!(target: LOG_TARGET, "No track id found behind {}", raw_url);
                Err(ResolveError::UnresolvableReference)
            }
        }
    }
}

#[async_trait]
impl<F: PageFetcher> TrackResolver for SunoResolver<F> {
    fn name(&self) -> &'static str {
        "suno"
    }

    async fn resolve(&self, raw_url: &str) -> std::result::Result<TrackReference, ResolveError> {
        // Match on the trimmed form; the reference keeps the string as submitted
        let candidate = raw_url.trim();

        match self.patterns.classify(candidate) {
            Some(LinkShape::Canonical(id)) => {
                debug!(target: LOG_TARGET, "Canonical URL {} -> {}", candidate, id);
                Ok(TrackReference::new(raw_url, id))
            }
            Some(LinkShape::Short { fetch_url }) => self.follow_short_link(raw_url, &fetch_url).await,
            None => {
                debug!(target: LOG_TARGET, "Rejected non-Suno URL: {}", candidate);
                Err(ResolveError::InvalidReference)
            }
        }
    }
}
