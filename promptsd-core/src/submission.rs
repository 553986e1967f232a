//! Turning an upload form into the record handed to the store.

use crate::content::{ModerationStatus, MusicLink, TagKind};
use crate::error::ResolveError;
use crate::resolver::TrackResolver;
use thiserror::Error;
use tracing::info;

/// Platform name recorded for attached tracks
pub const MUSIC_PLATFORM: &str = "suno";

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Character name is required")]
    MissingName,

    #[error(transparent)]
    Music(#[from] ResolveError),
}

/// Upload form contents as entered by the user
#[derive(Debug, Clone, Default)]
pub struct SubmissionDraft {
    pub name: String,
    pub short_worldview: Option<String>,
    pub ai_tool_used: Option<String>,
    pub prompt_summary: Option<String>,
    pub music_url: Option<String>,
    pub tags: Vec<String>,
}

/// Tag to attach, with the category written to `tags(name, type)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTag {
    pub name: String,
    pub kind: TagKind,
}

impl SubmittedTag {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = TagKind::for_name(&name);
        Self { name, kind }
    }
}

/// Validated submission ready to insert. Always enters the queue as pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSubmission {
    pub name: String,
    pub short_worldview: Option<String>,
    pub ai_tool_used: Option<String>,
    pub prompt_summary: Option<String>,
    pub has_music: bool,
    pub status: ModerationStatus,
    pub music: Option<MusicLink>,
    pub tags: Vec<SubmittedTag>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SubmissionDraft {
    /// Validate the draft and resolve its music URL, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::MissingName`] for a blank name, or the
    /// resolver's error when the music URL cannot be resolved.
    pub async fn prepare(
        self,
        resolver: &dyn TrackResolver,
    ) -> Result<PreparedSubmission, SubmissionError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(SubmissionError::MissingName);
        }

        let music = match non_blank(self.music_url) {
            Some(url) => {
                let reference = resolver.resolve(&url).await?;
                info!(
                    "Resolved music for submission {:?}: {} -> {}",
                    name, url, reference.track_id
                );
                Some(MusicLink {
                    id: None,
                    platform: MUSIC_PLATFORM.to_string(),
                    embed_url: url,
                    verified_owner: false,
                    title: None,
                    suno_track_id: Some(reference.track_id),
                })
            }
            None => None,
        };

        let mut tags: Vec<SubmittedTag> = Vec::with_capacity(self.tags.len());
        for tag in self.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t.name == tag) {
                tags.push(SubmittedTag::new(tag));
            }
        }

        Ok(PreparedSubmission {
            name,
            short_worldview: non_blank(self.short_worldview),
            ai_tool_used: non_blank(self.ai_tool_used),
            prompt_summary: non_blank(self.prompt_summary),
            has_music: music.is_some(),
            status: ModerationStatus::Pending,
            music,
            tags,
        })
    }
}
