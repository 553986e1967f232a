pub mod config;
pub mod content;
pub mod coordinator;
pub mod error;
pub mod paths;
pub mod playback;
pub mod resolver;
pub mod source;
pub mod submission;
pub mod surface;
pub mod track;

pub use config::{
    GalleryConfig, LoggingConfig, PromptsdConfig, ResolverConfig, ServerConfig, SupabaseConfig,
    CONFIG_TEMPLATE, DEFAULT_LOG_FILTER,
};

/// Re-export toml error type for config parsing error handling
pub use toml::de::Error as TomlParseError;
pub use content::{
    Asset, CharacterTag, ContentItem, ContentQuery, ContentSummary, GalleryTab, ModerationStatus,
    MusicLink, SearchQuery, SortOrder, Tag, TagKind,
};
pub use coordinator::{PlaybackCoordinator, PlaybackEvent};
pub use error::{CoreError, ResolveError};
pub use paths::{
    config_dir, log_file_path, CONFIG_DIR_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, LOG_FILE_NAME,
};
pub use playback::{MotionMode, PlaybackPhase, PlaybackState};
pub use resolver::{GuardedResolver, InflightGuard, InflightPermit, TrackResolver};
pub use source::{ContentSource, MemorySource};
pub use submission::{PreparedSubmission, SubmissionDraft, SubmissionError, SubmittedTag};
pub use surface::{spawn_surface_bridge, SurfaceKind, SurfaceView};
pub use track::{embed_url, NowPlaying, TrackId, TrackReference};
