//! Display surfaces that mirror the shared playback state.
//!
//! A gallery card, the character detail page and the fixed footer player each
//! keep a [`SurfaceView`]. Views never decide playback themselves: they apply
//! coordinator events in order and derive "am I live?" from the selected
//! track id.

use crate::coordinator::{PlaybackCoordinator, PlaybackEvent};
use crate::playback::{MotionMode, PlaybackState};
use crate::track::{NowPlaying, TrackId};
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast::error::RecvError, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const LOG_TARGET: &str = "promptsd::surface";

/// Where a surface is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Gallery grid card
    Card,
    /// Character detail page
    Detail,
    /// Persistent footer player
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceView {
    kind: SurfaceKind,
    /// Track this surface presents; the footer follows whatever is selected
    track_id: Option<TrackId>,
    mirror: PlaybackState,
    renders: u64,
}

impl SurfaceView {
    /// Surface bound to a specific track (cards, detail page)
    #[must_use]
    pub fn for_track(kind: SurfaceKind, track_id: TrackId) -> Self {
        Self {
            kind,
            track_id: Some(track_id),
            mirror: PlaybackState::default(),
            renders: 0,
        }
    }

    /// Footer surface that follows the selected track
    #[must_use]
    pub fn footer() -> Self {
        Self {
            kind: SurfaceKind::Footer,
            track_id: None,
            mirror: PlaybackState::default(),
            renders: 0,
        }
    }

    /// Re-render from a full snapshot
    pub fn render(&mut self, state: &PlaybackState) {
        self.mirror = state.clone();
        self.renders += 1;
    }

    /// Apply one coordinator event to the local mirror
    pub fn apply(&mut self, event: &PlaybackEvent) {
        match event {
            PlaybackEvent::TrackStarted { track, .. } | PlaybackEvent::Resumed { track } => {
                self.mirror.current_track = Some(track.clone());
                self.mirror.is_playing = true;
            }
            PlaybackEvent::Paused { track } => {
                self.mirror.current_track = Some(track.clone());
                self.mirror.is_playing = false;
            }
            PlaybackEvent::Stopped { .. } => {
                self.mirror.current_track = None;
                self.mirror.is_playing = false;
            }
            PlaybackEvent::MotionModeChanged { mode } => {
                self.mirror.motion_mode = *mode;
            }
        }
        self.renders += 1;
    }

    #[must_use]
    pub const fn kind(&self) -> SurfaceKind {
        self.kind
    }

    /// Number of times this view has re-rendered
    #[must_use]
    pub const fn renders(&self) -> u64 {
        self.renders
    }

    #[must_use]
    pub const fn motion_mode(&self) -> MotionMode {
        self.mirror.motion_mode
    }

    /// Track shown by this surface right now
    #[must_use]
    pub fn presented_track(&self) -> Option<&NowPlaying> {
        match &self.track_id {
            Some(id) => self
                .mirror
                .current_track
                .as_ref()
                .filter(|t| &t.track_id == id),
            None => self.mirror.current_track.as_ref(),
        }
    }

    /// Whether this surface presents the live track
    #[must_use]
    pub fn is_live(&self) -> bool {
        match &self.track_id {
            Some(id) => self.mirror.is_active(id),
            None => self.mirror.is_playing,
        }
    }

    /// Whether the embedded player frame is mounted.
    ///
    /// The footer keeps its frame while a paused track stays selected; bound
    /// surfaces only mount while their track is live.
    #[must_use]
    pub fn show_player(&self) -> bool {
        match self.kind {
            SurfaceKind::Footer => self.mirror.current_track.is_some(),
            SurfaceKind::Card | SurfaceKind::Detail => self.is_live(),
        }
    }

    /// Embed URL for the mounted frame, if any
    #[must_use]
    pub fn embed_url(&self) -> Option<String> {
        if !self.show_player() {
            return None;
        }
        let autoplay = self.mirror.is_playing;
        self.presented_track()
            .map(|t| t.track_id.embed_url(autoplay))
    }
}

/// Keep `view` in sync with `coordinator` until cancelled.
///
/// Returns the task handle and a receiver holding the latest rendered view.
pub fn spawn_surface_bridge(
    coordinator: &Arc<PlaybackCoordinator>,
    mut view: SurfaceView,
    cancel_token: CancellationToken,
) -> (tokio::task::JoinHandle<()>, watch::Receiver<SurfaceView>) {
    // Subscribe before the snapshot so no transition falls between them
    let mut rx = coordinator.subscribe();
    view.render(&coordinator.state());

    let (view_tx, view_rx) = watch::channel(view);
    let coordinator: Weak<PlaybackCoordinator> = Arc::downgrade(coordinator);

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel_token.cancelled() => {
                    debug!(target: LOG_TARGET, "Surface bridge shutting down");
                    break;
                }
                event = rx.recv() => {
                    match event {
                        Ok(event) => {
                            view_tx.send_modify(|view| view.apply(&event));
                        }
                        Err(RecvError::Lagged(n)) => {
                            info!(target: LOG_TARGET, "Missed {} playback events, re-rendering from snapshot", n);
                            let Some(coordinator) = coordinator.upgrade() else {
                                break;
                            };
                            let state = coordinator.state();
                            view_tx.send_modify(|view| view.render(&state));
                        }
                        Err(RecvError::Closed) => {
                            info!(target: LOG_TARGET, "Playback event channel closed");
                            break;
                        }
                    }
                }
            }
        }
    });

    (handle, view_rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> TrackId {
        TrackId::new(s).unwrap()
    }

    fn track(s: &str) -> NowPlaying {
        NowPlaying::new(id(s), format!("Character {s}"))
    }

    #[test]
    fn test_only_matching_card_is_live() {
        let mut card_a = SurfaceView::for_track(SurfaceKind::Card, id("a"));
        let mut card_b = SurfaceView::for_track(SurfaceKind::Card, id("b"));
        let mut footer = SurfaceView::footer();

        let events = [
            PlaybackEvent::TrackStarted {
                track: track("a"),
                replaced: None,
            },
            PlaybackEvent::TrackStarted {
                track: track("b"),
                replaced: Some(id("a")),
            },
        ];
        for event in &events {
            card_a.apply(event);
            card_b.apply(event);
            footer.apply(event);
        }

        assert!(!card_a.is_live());
        assert!(!card_a.show_player());
        assert!(card_b.is_live());
        assert!(footer.is_live());
        assert_eq!(footer.presented_track(), Some(&track("b")));
    }

    #[test]
    fn test_footer_keeps_frame_while_paused() {
        let mut footer = SurfaceView::footer();
        let mut detail = SurfaceView::for_track(SurfaceKind::Detail, id("a"));
        for event in [
            PlaybackEvent::TrackStarted {
                track: track("a"),
                replaced: None,
            },
            PlaybackEvent::Paused { track: track("a") },
        ] {
            footer.apply(&event);
            detail.apply(&event);
        }

        assert!(footer.show_player());
        assert!(!footer.is_live());
        assert_eq!(
            footer.embed_url().as_deref(),
            Some("https://suno.com/embed/a")
        );
        assert!(!detail.show_player());
        assert_eq!(detail.embed_url(), None);
    }

    #[test]
    fn test_live_embed_autoplays() {
        let mut detail = SurfaceView::for_track(SurfaceKind::Detail, id("ff99"));
        detail.apply(&PlaybackEvent::TrackStarted {
            track: track("ff99"),
            replaced: None,
        });
        assert_eq!(
            detail.embed_url().as_deref(),
            Some("https://suno.com/embed/ff99?autoplay=1")
        );
    }

    #[test]
    fn test_motion_mode_mirrored() {
        let mut card = SurfaceView::for_track(SurfaceKind::Card, id("a"));
        card.apply(&PlaybackEvent::MotionModeChanged {
            mode: MotionMode::Lively,
        });
        assert_eq!(card.motion_mode(), MotionMode::Lively);
        assert_eq!(card.renders(), 1);
    }

    #[tokio::test]
    async fn test_bridge_follows_coordinator() {
        let coordinator = PlaybackCoordinator::new();
        let cancel_token = CancellationToken::new();

        let (handle, mut view_rx) = spawn_surface_bridge(
            &coordinator,
            SurfaceView::for_track(SurfaceKind::Card, id("a")),
            cancel_token.clone(),
        );

        coordinator.play(track("a"));
        view_rx.wait_for(SurfaceView::is_live).await.unwrap();

        coordinator.play(track("b"));
        view_rx.wait_for(|view| !view.is_live()).await.unwrap();

        cancel_token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_bridge_starts_from_current_snapshot() {
        let coordinator = PlaybackCoordinator::new();
        coordinator.play(track("a"));
        coordinator.set_motion_mode(MotionMode::Lively);

        let cancel_token = CancellationToken::new();
        let (handle, view_rx) =
            spawn_surface_bridge(&coordinator, SurfaceView::footer(), cancel_token.clone());

        {
            let view = view_rx.borrow();
            assert!(view.is_live());
            assert_eq!(view.motion_mode(), MotionMode::Lively);
        }

        cancel_token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_bridge_ends_when_coordinator_dropped() {
        let coordinator = PlaybackCoordinator::new();
        let (handle, _view_rx) = spawn_surface_bridge(
            &coordinator,
            SurfaceView::footer(),
            CancellationToken::new(),
        );

        drop(coordinator);
        handle.await.unwrap();
    }
}
