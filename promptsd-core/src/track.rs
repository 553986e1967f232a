//! Track identifiers and the references produced by resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL of the embeddable player surface.
pub const EMBED_BASE_URL: &str = "https://suno.com/embed";

/// Opaque identifier naming a playable track on the music service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Wrap an identifier. Returns `None` for empty or whitespace-only input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical playable URL for this track, optionally with autoplay.
    #[must_use]
    pub fn embed_url(&self, autoplay: bool) -> String {
        embed_url(self, autoplay)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TrackId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build the embed URL handed to the presentation layer's frame.
#[must_use]
pub fn embed_url(track_id: &TrackId, autoplay: bool) -> String {
    if autoplay {
        format!("{EMBED_BASE_URL}/{track_id}?autoplay=1")
    } else {
        format!("{EMBED_BASE_URL}/{track_id}")
    }
}

/// Successful resolution of a user-submitted URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackReference {
    /// URL exactly as submitted
    pub raw_url: String,
    /// Stable external identifier
    pub track_id: TrackId,
    /// Final URL after following redirects, when a redirect produced the ID
    pub resolved_url: Option<String>,
}

impl TrackReference {
    #[must_use]
    pub fn new(raw_url: impl Into<String>, track_id: TrackId) -> Self {
        Self {
            raw_url: raw_url.into(),
            track_id,
            resolved_url: None,
        }
    }

    #[must_use]
    pub fn with_resolved_url(mut self, resolved_url: impl Into<String>) -> Self {
        self.resolved_url = Some(resolved_url.into());
        self
    }
}

/// Track selected for playback, as shown by every display surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub track_id: TrackId,
    pub display_name: String,
    pub image_url: Option<String>,
}

impl NowPlaying {
    #[must_use]
    pub fn new(track_id: TrackId, display_name: impl Into<String>) -> Self {
        Self {
            track_id,
            display_name: display_name.into(),
            image_url: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}
