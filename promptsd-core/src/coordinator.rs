use crate::playback::{MotionMode, PlaybackState};
use crate::track::{NowPlaying, TrackId};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::debug;

const LOG_TARGET: &str = "promptsd::playback";

/// Capacity of the event channel; slower subscribers observe `Lagged`.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events emitted by the playback coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A track became the live track
    TrackStarted {
        track: NowPlaying,
        /// Previously selected track that was torn down, if different
        replaced: Option<TrackId>,
    },
    /// The selected track resumed without being re-selected
    Resumed { track: NowPlaying },
    /// The selected track was paused and stays selected
    Paused { track: NowPlaying },
    /// Selection cleared
    Stopped { previous: NowPlaying },
    /// Presentation motion mode changed
    MotionModeChanged { mode: MotionMode },
}

/// Process-local owner of the playback state.
///
/// Construct one per session and hand out clones of the `Arc`; nothing here is
/// global, so independent instances never observe each other.
pub struct PlaybackCoordinator {
    state_tx: watch::Sender<PlaybackState>,
    event_tx: broadcast::Sender<PlaybackEvent>,
}

impl PlaybackCoordinator {
    /// Create a coordinator in the idle state
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Subscribe to ordered playback events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.event_tx.subscribe()
    }

    /// Receiver that always holds the latest state
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state_tx.borrow().clone()
    }

    /// Currently selected track, playing or paused
    #[must_use]
    pub fn current_track(&self) -> Option<NowPlaying> {
        self.state_tx.borrow().current_track.clone()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state_tx.borrow().is_playing
    }

    #[must_use]
    pub fn motion_mode(&self) -> MotionMode {
        self.state_tx.borrow().motion_mode
    }

    /// Make `track` the live track, replacing whatever was selected
    pub fn play(&self, track: NowPlaying) {
        self.apply(|state| play_transition(state, track));
    }

    /// Pause the live track, keeping it selected. No-op unless playing.
    pub fn pause(&self) {
        self.apply(pause_transition);
    }

    /// Clear the selection entirely. No-op when idle.
    pub fn stop(&self) {
        self.apply(stop_transition);
    }

    /// Replace the motion mode
    pub fn set_motion_mode(&self, mode: MotionMode) {
        self.apply(|state| {
            if state.motion_mode == mode {
                return None;
            }
            state.motion_mode = mode;
            Some(PlaybackEvent::MotionModeChanged { mode })
        });
    }

    /// Stop `track` if it is the live track, otherwise play it.
    ///
    /// Returns whether `track` is playing afterwards.
    #[must_use]
    pub fn toggle(&self, track: NowPlaying) -> bool {
        let mut now_playing = false;
        self.apply(|state| {
            if state.is_active(&track.track_id) {
                stop_transition(state)
            } else {
                now_playing = true;
                play_transition(state, track)
            }
        });
        now_playing
    }

    /// Run a transition and publish its event while the state is still held,
    /// so subscribers see events in the order transitions were applied.
    fn apply<F>(&self, transition: F)
    where
        F: FnOnce(&mut PlaybackState) -> Option<PlaybackEvent>,
    {
        self.state_tx.send_if_modified(|state| {
            let Some(event) = transition(state) else {
                return false;
            };
            debug!(target: LOG_TARGET, "Playback transition: {:?}", event);
            // No subscribers is fine; the state itself is still updated
            let _ = self.event_tx.send(event);
            true
        });
    }
}

impl Default for PlaybackCoordinator {
    fn default() -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state_tx: watch::Sender::new(PlaybackState::default()),
            event_tx,
        }
    }
}

fn play_transition(state: &mut PlaybackState, track: NowPlaying) -> Option<PlaybackEvent> {
    if state.is_playing && state.current_track.as_ref() == Some(&track) {
        return None;
    }

    let was_playing = state.is_playing;
    let previous = state.current_track.replace(track.clone());
    state.is_playing = true;

    match previous {
        Some(prev) if prev.track_id == track.track_id => {
            if was_playing {
                // Same track, refreshed metadata
                Some(PlaybackEvent::TrackStarted {
                    track,
                    replaced: None,
                })
            } else {
                Some(PlaybackEvent::Resumed { track })
            }
        }
        prev => Some(PlaybackEvent::TrackStarted {
            track,
            replaced: prev.map(|p| p.track_id),
        }),
    }
}

fn pause_transition(state: &mut PlaybackState) -> Option<PlaybackEvent> {
    if !state.is_playing {
        return None;
    }
    state.is_playing = false;
    state
        .current_track
        .clone()
        .map(|track| PlaybackEvent::Paused { track })
}

fn stop_transition(state: &mut PlaybackState) -> Option<PlaybackEvent> {
    state.is_playing = false;
    state
        .current_track
        .take()
        .map(|previous| PlaybackEvent::Stopped { previous })
}
