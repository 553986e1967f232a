use crate::track::{NowPlaying, TrackId};
use serde::{Deserialize, Serialize};

/// Animation intensity of visual surfaces, independent of playback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionMode {
    #[default]
    Calm,
    Lively,
}

impl MotionMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Lively => "lively",
        }
    }
}

impl std::fmt::Display for MotionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse state of the playback machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Nothing selected
    Idle,
    /// A track is selected but not playing
    Paused,
    /// A track is selected and playing
    Playing,
}

/// Shared playback state, owned by a [`PlaybackCoordinator`](crate::PlaybackCoordinator)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Selected track (None when idle)
    pub current_track: Option<NowPlaying>,
    /// Whether the selected track is playing
    pub is_playing: bool,
    /// Presentation preference
    pub motion_mode: MotionMode,
}

impl PlaybackState {
    #[must_use]
    pub fn phase(&self) -> PlaybackPhase {
        match (&self.current_track, self.is_playing) {
            (None, _) => PlaybackPhase::Idle,
            (Some(_), false) => PlaybackPhase::Paused,
            (Some(_), true) => PlaybackPhase::Playing,
        }
    }

    /// Identifier of the selected track, if any
    #[must_use]
    pub fn current_track_id(&self) -> Option<&TrackId> {
        self.current_track.as_ref().map(|t| &t.track_id)
    }

    /// Whether `track_id` is the selected track, playing or not
    #[must_use]
    pub fn is_selected(&self, track_id: &TrackId) -> bool {
        self.current_track_id() == Some(track_id)
    }

    /// Whether `track_id` is the one live track.
    ///
    /// Every surface derives its "live" flag from this single equality check,
    /// so at most one surface can report true for a given state.
    #[must_use]
    pub fn is_active(&self, track_id: &TrackId) -> bool {
        self.is_playing && self.is_selected(track_id)
    }

    /// Holds whenever the state was produced by the coordinator.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        !self.is_playing || self.current_track.is_some()
    }
}
