//! Gallery content as read from the data layer, and the visibility rules
//! applied to it.
//!
//! Items are owned by the external store. Nothing here mutates them; the
//! moderation helpers only compute the status an admin surface would write.

use crate::track::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default page size for gallery listings
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Maximum number of search results
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Moderation state of a submitted character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    /// Awaiting review (every new submission)
    Pending,
    /// Approved and visible in the gallery
    Public,
    /// Rejected by a moderator
    Reject,
}

impl ModerationStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Public => "public",
            Self::Reject => "reject",
        }
    }

    /// Only approved content is visible to the public
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        matches!(self, Self::Public)
    }

    /// Status after approval, or `None` if the item was already decided
    #[must_use]
    pub const fn approve(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Public),
            Self::Public | Self::Reject => None,
        }
    }

    /// Status after rejection, or `None` if the item was already decided
    #[must_use]
    pub const fn reject(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Reject),
            Self::Public | Self::Reject => None,
        }
    }
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub original_url: String,
    pub thumb_url: Option<String>,
    pub prompt_summary: Option<String>,
}

/// Music attached to a character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicLink {
    #[serde(default)]
    pub id: Option<String>,
    pub platform: String,
    /// URL as submitted (canonical or short link)
    pub embed_url: String,
    #[serde(default)]
    pub verified_owner: bool,
    #[serde(default)]
    pub title: Option<String>,
    /// Identifier stored at submission time, when resolution succeeded
    #[serde(default)]
    pub suno_track_id: Option<TrackId>,
}

/// Tag category shown as a colour group on the upload form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// Physical traits (ears, wings, accessories); also the fallback
    #[default]
    Feature,
    Emotion,
    World,
}

const FEATURE_PRESETS: &[&str] = &["猫耳", "犬耳", "うさ耳", "角", "翼", "尻尾", "メガネ", "帽子"];
const EMOTION_PRESETS: &[&str] = &["笑顔", "泣き顔", "怒り", "驚き", "無表情", "照れ"];
const WORLD_PRESETS: &[&str] = &["ファンタジー", "現代", "SF", "和風", "スチームパンク", "メルヘン"];

impl TagKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Emotion => "emotion",
            Self::World => "world",
        }
    }

    /// Preset tags offered for this category
    #[must_use]
    pub const fn presets(&self) -> &'static [&'static str] {
        match self {
            Self::Feature => FEATURE_PRESETS,
            Self::Emotion => EMOTION_PRESETS,
            Self::World => WORLD_PRESETS,
        }
    }

    /// Category of a tag name; free-form tags count as features
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        [Self::Feature, Self::Emotion, Self::World]
            .into_iter()
            .find(|kind| kind.presets().contains(&name))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TagKind,
    pub color: Option<String>,
}

/// Join row between a character and a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterTag {
    pub tags: Tag,
}

/// A character row with its nested assets, music and tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub name: String,
    pub short_worldview: Option<String>,
    pub has_music: bool,
    pub ai_tool_used: Option<String>,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub music: Vec<MusicLink>,
    #[serde(default)]
    pub character_tags: Vec<CharacterTag>,
}

impl ContentItem {
    /// Primary image
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.assets.first().map(|a| a.original_url.as_str())
    }

    /// Submitted music URL of the first track
    #[must_use]
    pub fn music_embed_url(&self) -> Option<&str> {
        self.music.first().map(|m| m.embed_url.as_str())
    }

    /// Track id of the first track: the stored id, else whatever `extract`
    /// can read from the submitted URL without a network hop.
    #[must_use]
    pub fn music_track_id<F>(&self, extract: F) -> Option<TrackId>
    where
        F: Fn(&str) -> Option<TrackId>,
    {
        let music = self.music.first()?;
        music
            .suno_track_id
            .clone()
            .or_else(|| extract(&music.embed_url))
    }

    #[must_use]
    pub fn tag_names(&self) -> Vec<&str> {
        self.character_tags
            .iter()
            .map(|t| t.tags.name.as_str())
            .collect()
    }

    /// Whether the first track is marked as the submitter's own work
    #[must_use]
    pub fn verified_owner(&self) -> bool {
        self.music.first().is_some_and(|m| m.verified_owner)
    }
}

/// Card-level projection handed to presentation surfaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub id: String,
    pub name: String,
    pub short_worldview: Option<String>,
    pub image_url: Option<String>,
    pub has_music: bool,
    pub music_embed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_track_id: Option<TrackId>,
    pub verified_owner: bool,
    pub tags: Vec<String>,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
}

impl ContentSummary {
    #[must_use]
    pub fn from_item<F>(item: &ContentItem, extract: F) -> Self
    where
        F: Fn(&str) -> Option<TrackId>,
    {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            short_worldview: item.short_worldview.clone(),
            image_url: item.image_url().map(str::to_string),
            has_music: item.has_music,
            music_embed_url: item.music_embed_url().map(str::to_string),
            music_track_id: item.music_track_id(extract),
            verified_owner: item.verified_owner(),
            tags: item.tag_names().into_iter().map(str::to_string).collect(),
            status: item.status,
            created_at: item.created_at,
        }
    }
}

/// Home page tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryTab {
    /// Characters with a track
    #[default]
    Music,
    /// Characters without a track
    NoMusic,
    /// Everything
    All,
}

impl GalleryTab {
    /// `has_music` filter implied by the tab
    #[must_use]
    pub const fn has_music(&self) -> Option<bool> {
        match self {
            Self::Music => Some(true),
            Self::NoMusic => Some(false),
            Self::All => None,
        }
    }
}

/// Ordering by `created_at`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    /// Moderation queue: longest-waiting first
    OldestFirst,
}

impl SortOrder {
    /// PostgREST `order` value
    #[must_use]
    pub const fn as_order_param(&self) -> &'static str {
        match self {
            Self::NewestFirst => "created_at.desc",
            Self::OldestFirst => "created_at.asc",
        }
    }
}

/// Gallery listing parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentQuery {
    pub has_music: Option<bool>,
    /// Include items regardless of moderation status (new-arrivals view)
    pub include_all: bool,
    /// Exact status filter; takes precedence over `include_all`
    pub status: Option<ModerationStatus>,
    pub order: SortOrder,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ContentQuery {
    fn default() -> Self {
        Self {
            has_music: None,
            include_all: false,
            status: None,
            order: SortOrder::NewestFirst,
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

impl ContentQuery {
    #[must_use]
    pub fn for_tab(tab: GalleryTab) -> Self {
        Self {
            has_music: tab.has_music(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_include_all(mut self, include_all: bool) -> Self {
        self.include_all = include_all;
        self
    }

    /// Items awaiting review, oldest submission first
    #[must_use]
    pub fn pending_queue() -> Self {
        Self::default()
            .with_status(ModerationStatus::Pending)
            .with_order(SortOrder::OldestFirst)
    }

    #[must_use]
    pub const fn with_status(mut self, status: ModerationStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub const fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub const fn with_page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    /// Status the store should filter on, if any
    #[must_use]
    pub const fn status_filter(&self) -> Option<ModerationStatus> {
        match self.status {
            Some(status) => Some(status),
            None if self.include_all => None,
            None => Some(ModerationStatus::Public),
        }
    }

    /// Filter predicate equivalent to the store-side query
    #[must_use]
    pub fn matches(&self, item: &ContentItem) -> bool {
        if self.status_filter().is_some_and(|status| item.status != status) {
            return false;
        }
        self.has_music.is_none_or(|wanted| item.has_music == wanted)
    }

    /// Apply filter, ordering and paging to an in-memory set
    #[must_use]
    pub fn apply(&self, items: &[ContentItem]) -> Vec<ContentItem> {
        let mut matched: Vec<_> = items.iter().filter(|i| self.matches(i)).cloned().collect();
        match self.order {
            SortOrder::NewestFirst => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::OldestFirst => matched.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }
        matched
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

/// Case-insensitive name substring search over public items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    term: String,
    pub limit: usize,
}

impl SearchQuery {
    /// Returns `None` for blank input; blank searches never hit the store.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let term = raw.trim();
        if term.is_empty() {
            return None;
        }
        Some(Self {
            term: term.to_string(),
            limit: DEFAULT_SEARCH_LIMIT,
        })
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn matches(&self, item: &ContentItem) -> bool {
        item.status.is_visible() && item.name.to_lowercase().contains(&self.term.to_lowercase())
    }

    /// Apply to an in-memory set
    #[must_use]
    pub fn apply(&self, items: &[ContentItem]) -> Vec<ContentItem> {
        items
            .iter()
            .filter(|i| self.matches(i))
            .take(self.limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn item(id: &str, name: &str, status: ModerationStatus, has_music: bool, day: u32) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            name: name.to_string(),
            short_worldview: None,
            has_music,
            ai_tool_used: None,
            status,
            created_at: Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap(),
            user_id: "user-1".to_string(),
            assets: vec![],
            music: vec![],
            character_tags: vec![],
        }
    }
}
