//! Track resolution seam and submission-side concurrency guard.

use crate::error::ResolveError;
use crate::track::TrackReference;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Turns a user-supplied music URL into a stable track reference.
///
/// Everything fragile about resolution (URL shapes, redirects, markup scans)
/// lives behind this one method so implementations can be swapped without
/// touching callers.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Get the resolver name
    fn name(&self) -> &'static str;

    /// Resolve a raw URL.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidReference`] when the URL has no known
    /// shape, [`ResolveError::ResolutionFailed`] on network failure and
    /// [`ResolveError::UnresolvableReference`] when no identifier is found.
    async fn resolve(&self, raw_url: &str) -> Result<TrackReference, ResolveError>;
}

/// Tracks inputs that are currently being resolved.
#[derive(Debug, Default, Clone)]
pub struct InflightGuard {
    inflight: Arc<Mutex<HashSet<String>>>,
}

impl InflightGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `input` until the returned permit is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InFlight`] if the same input is already claimed.
    pub fn acquire(&self, input: &str) -> Result<InflightPermit, ResolveError> {
        let key = input.trim().to_string();
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if !inflight.insert(key.clone()) {
            debug!("Rejecting concurrent resolution for {}", key);
            return Err(ResolveError::InFlight);
        }
        Ok(InflightPermit {
            inflight: Arc::clone(&self.inflight),
            key,
        })
    }

    /// Number of inputs currently claimed
    #[must_use]
    pub fn len(&self) -> usize {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases its input when dropped
#[derive(Debug)]
pub struct InflightPermit {
    inflight: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for InflightPermit {
    fn drop(&mut self) {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

/// Resolver wrapper that refuses a second concurrent resolution of the same input
pub struct GuardedResolver<R> {
    inner: R,
    guard: InflightGuard,
}

impl<R: TrackResolver> GuardedResolver<R> {
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            guard: InflightGuard::new(),
        }
    }

    #[must_use]
    pub const fn guard(&self) -> &InflightGuard {
        &self.guard
    }
}

#[async_trait]
impl<R: TrackResolver> TrackResolver for GuardedResolver<R> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn resolve(&self, raw_url: &str) -> Result<TrackReference, ResolveError> {
        let _permit = self.guard.acquire(raw_url)?;
        self.inner.resolve(raw_url).await
    }
}
