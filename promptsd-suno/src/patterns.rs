//! URL and markup patterns for Suno track links.
//!
//! Markup scans run in a fixed order: the `"songId"` JSON field first, then the
//! 36-character slug parameter. The first match wins.

use crate::error::Result;
use promptsd_core::TrackId;
use regex::Regex;

/// Canonical track URL: `suno.com/song/<id>`
const CANONICAL_PATTERN: &str = r"suno\.(?:com|ai)/song/([A-Za-z0-9-]+)";

/// Short link: `suno.com/s/<token>`
const SHORT_LINK_PATTERN: &str = r"suno\.(com|ai)/s/([A-Za-z0-9]+)";

/// JSON field embedded in client-rendered short-link pages
const SONG_ID_FIELD_PATTERN: &str = r#""songId":"([A-Za-z0-9-]+)""#;

/// Route parameter for the `/song/[slug]` page followed by a UUID-shaped id
const SLUG_PARAM_PATTERN: &str = r#"/song/\[slug\].*?"([A-Za-z0-9-]{36})""#;

/// Shape of a recognised link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkShape {
    /// Identifier is in the URL itself
    Canonical(TrackId),
    /// Identifier must be fetched; carries the URL to follow
    Short { fetch_url: String },
}

/// Compiled patterns
#[derive(Debug, Clone)]
pub struct SunoPatterns {
    canonical: Regex,
    short_link: Regex,
    song_id_field: Regex,
    slug_param: Regex,
}

impl SunoPatterns {
    /// Compile all patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            canonical: Regex::new(CANONICAL_PATTERN)?,
            short_link: Regex::new(SHORT_LINK_PATTERN)?,
            song_id_field: Regex::new(SONG_ID_FIELD_PATTERN)?,
            slug_param: Regex::new(SLUG_PARAM_PATTERN)?,
        })
    }

    /// Track id from a canonical URL, without any network access
    #[must_use]
    pub fn canonical_id(&self, url: &str) -> Option<TrackId> {
        first_capture(&self.canonical, url)
    }

    /// Classify a raw URL. Canonical takes precedence over short links.
    #[must_use]
    pub fn classify(&self, url: &str) -> Option<LinkShape> {
        if let Some(id) = self.canonical_id(url) {
            return Some(LinkShape::Canonical(id));
        }

        // Rebuild the link from its parts so only the service itself is fetched
        let captures = self.short_link.captures(url)?;
        let tld = captures.get(1)?.as_str();
        let token = captures.get(2)?.as_str();
        Some(LinkShape::Short {
            fetch_url: format!("https://suno.{tld}/s/{token}"),
        })
    }

    /// Scan page markup for a track id
    #[must_use]
    pub fn scan_markup(&self, html: &str) -> Option<TrackId> {
        first_capture(&self.song_id_field, html).or_else(|| first_capture(&self.slug_param, html))
    }
}

fn first_capture(pattern: &Regex, haystack: &str) -> Option<TrackId> {
    pattern
        .captures(haystack)
        .and_then(|c| c.get(1))
        .and_then(|m| TrackId::new(m.as_str()))
}
