//! Main application state and logic.

use std::time::Duration;

use color_eyre::Result;
use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::action::{Action, Focus, PlayerState};
use crate::client::ItunesClient;
use crate::config::Config;
use crate::player::{Player, PlayerEvent};
use crate::ui::{
    EqualizerState, NowPlayingState, PlaylistState, SearchState, Visualizer,
};

/// UI layout areas for mouse click detection.
#[derive(Debug, Default, Clone)]
pub struct UiLayout {
    /// Search input area
    pub search: Rect,
    /// Playlist sidebar area
    pub playlist: Rect,
    /// Now playing bar area
    pub now_playing: Rect,
    /// Progress bar row within now playing
    pub progress_bar: Rect,
    /// Volume bar cells within the controls row
    pub volume_bar: Rect,
    /// Equalizer panel area (if visible)
    pub equalizer: Option<Rect>,
}

/// Main application state.
pub struct App {
    /// Whether the app should quit
    pub should_quit: bool,

    /// Configuration
    pub config: Config,

    /// Catalog API client
    pub client: ItunesClient,

    /// Audio player
    pub player: Option<Player>,

    /// Track list and selection logic
    pub playlist: PlaylistState,

    /// Now playing state
    pub now_playing: NowPlayingState,

    /// Search input state
    pub search: SearchState,

    /// Visual equalizer (cosmetic)
    pub equalizer: EqualizerState,

    /// Waveform/rotation animation (cosmetic)
    pub visualizer: Visualizer,

    /// Which panel keyboard input goes to
    pub focus: Focus,

    /// Help overlay visible
    pub show_help: bool,

    /// Action sender for deferred work
    pub action_tx: mpsc::UnboundedSender<Action>,

    /// UI layout areas for mouse detection
    pub layout: UiLayout,
}

impl App {
    /// Create a new application instance.
    pub fn new(config: Config, action_tx: mpsc::UnboundedSender<Action>) -> Self {
        let seed = config.ui.visualizer_seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

        let search = SearchState::new(config.search.default_query.clone());
        let now_playing = NowPlayingState::new(config.player.volume, config.ui.show_artwork);

        Self {
            should_quit: false,
            client: ItunesClient::default(),
            player: None,
            playlist: PlaylistState::new(),
            now_playing,
            search,
            equalizer: EqualizerState::new(),
            visualizer: Visualizer::new(seed),
            focus: Focus::default(),
            show_help: false,
            action_tx,
            layout: UiLayout::default(),
            config,
        }
    }

    /// Initialize the application: bring up audio and run the initial
    /// catalog search.
    pub async fn init(&mut self) -> Result<()> {
        match Player::new() {
            Ok(player) => {
                let _ = player.set_volume(f32::from(self.now_playing.volume) / 100.0);
                self.player = Some(player);
            }
            Err(e) => {
                tracing::error!("Failed to initialize audio player: {}", e);
            }
        }

        self.action_tx.send(Action::SearchSubmit)?;

        Ok(())
    }

    /// Handle an action and update state.
    pub async fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }

            Action::Tick => {
                // Drain player events first to avoid borrow issues
                let events: Vec<_> = if let Some(player) = &mut self.player {
                    let mut events = Vec::new();
                    while let Some(event) = player.try_recv_event() {
                        events.push(event);
                    }
                    events
                } else {
                    Vec::new()
                };

                for event in events {
                    self.handle_player_event(event)?;
                }

                self.visualizer.tick(
                    self.now_playing.state.is_playing(),
                    self.equalizer.total(),
                );
            }

            Action::Resize(_, _) => {
                // Layout rects are recomputed on every draw
            }

            // Navigation
            Action::NavigateUp => match self.focus {
                _ if self.search.active => {}
                Focus::Playlist => self.playlist.select_previous(),
                Focus::Equalizer => self.equalizer.adjust(1),
            },

            Action::NavigateDown => match self.focus {
                _ if self.search.active => {}
                Focus::Playlist => self.playlist.select_next(),
                Focus::Equalizer => self.equalizer.adjust(-1),
            },

            Action::NavigateLeft => {
                if self.focus == Focus::Equalizer && !self.search.active {
                    self.equalizer.select_previous();
                }
            }

            Action::NavigateRight => {
                if self.focus == Focus::Equalizer && !self.search.active {
                    self.equalizer.select_next();
                }
            }

            Action::SwitchFocus => {
                if self.config.ui.show_visualizer {
                    self.focus = self.focus.toggle();
                }
            }

            Action::Select => {
                if self.search.active {
                    self.perform_search().await?;
                } else if self.focus == Focus::Playlist {
                    if let Some(index) = self.playlist.selected() {
                        self.play_index(index)?;
                    }
                }
            }

            // Search
            Action::OpenSearch => {
                self.search.open();
            }

            Action::CloseSearch => {
                self.search.close();
            }

            Action::SearchInput(c) => {
                self.search.input(c);
            }

            Action::SearchBackspace => {
                self.search.backspace();
            }

            Action::SearchSubmit => {
                self.perform_search().await?;
            }

            Action::TracksLoaded(tracks) => {
                self.search.finish();
                let was_playing = self.now_playing.state.is_playing();
                self.playlist.replace_tracks(tracks);

                if let Some(track) = self.playlist.current_track().cloned() {
                    self.now_playing.set_track(track.clone());
                    if let Some(url) = &track.artwork_url100 {
                        self.action_tx.send(Action::LoadArtwork(url.clone()))?;
                    }
                    // A running player rolls straight into the fresh
                    // results; otherwise the first track is just cued up
                    if was_playing {
                        self.play_current()?;
                    } else {
                        self.now_playing.state = PlayerState::Stopped;
                        if let Some(player) = &self.player {
                            player.stop()?;
                        }
                    }
                } else {
                    // Zero results: there is no track left to point at, so
                    // whatever was playing stops and the transport clears
                    self.now_playing.clear();
                    if let Some(player) = &self.player {
                        player.stop()?;
                    }
                }
            }

            // Playback controls
            Action::PlayPause => {
                self.toggle_play_pause()?;
            }

            Action::NextTrack => {
                if self.playlist.advance().is_some() {
                    self.switch_track()?;
                }
            }

            Action::PreviousTrack => {
                if self.playlist.go_back().is_some() {
                    self.switch_track()?;
                }
            }

            Action::SeekForward => {
                self.seek_relative(5)?;
            }

            Action::SeekBackward => {
                self.seek_relative(-5)?;
            }

            Action::VolumeUp => {
                self.set_volume(self.now_playing.volume.saturating_add(5))?;
            }

            Action::VolumeDown => {
                self.set_volume(self.now_playing.volume.saturating_sub(5))?;
            }

            Action::ToggleShuffle => {
                self.playlist.shuffle = !self.playlist.shuffle;
            }

            Action::ToggleRepeat => {
                self.playlist.repeat = !self.playlist.repeat;
            }

            // Mouse
            Action::MouseClick(x, y) => {
                self.handle_mouse_click(x, y)?;
            }

            Action::MouseScroll(delta, x, y) => {
                if contains(self.layout.volume_bar, x, y) {
                    let change: i16 = if delta < 0 { 5 } else { -5 };
                    let volume =
                        (i16::from(self.now_playing.volume) + change).clamp(0, 100) as u8;
                    self.set_volume(volume)?;
                } else if contains(self.layout.playlist, x, y) && !self.search.active {
                    if delta > 0 {
                        self.playlist.select_next();
                    } else {
                        self.playlist.select_previous();
                    }
                }
            }

            // Artwork
            Action::LoadArtwork(url) => {
                self.load_artwork(&url).await?;
            }

            Action::ArtworkLoaded(url, data) => {
                // Only apply if it still matches the current track
                if self.now_playing.artwork_url.as_deref() == Some(&url) {
                    self.now_playing.set_artwork(&data);
                }
            }

            // Overlays
            Action::ShowHelp => {
                self.show_help = true;
            }

            Action::HideHelp => {
                self.show_help = false;
            }

            Action::None => {}
        }

        Ok(())
    }

    /// Handle player events.
    fn handle_player_event(&mut self, event: PlayerEvent) -> Result<()> {
        match event {
            PlayerEvent::StateChanged(state) => {
                self.now_playing.state = state;
            }
            PlayerEvent::Progress { position, duration } => {
                self.now_playing.position = position.as_secs() as u32;
                let secs = duration.as_secs() as u32;
                if secs > 0 {
                    self.now_playing.duration = secs;
                }
            }
            PlayerEvent::TrackEnded => {
                self.handle_track_ended()?;
            }
            PlayerEvent::Error(msg) => {
                // Playback problems are logged, not surfaced; a track with
                // no usable preview simply stays silent
                tracing::error!("Player error: {}", msg);
                self.now_playing.state = PlayerState::Stopped;
            }
        }
        Ok(())
    }

    /// Handle end of track: repeat restarts the same track, otherwise this
    /// behaves exactly like next.
    fn handle_track_ended(&mut self) -> Result<()> {
        if self.playlist.repeat {
            self.now_playing.position = 0;
            if let Some(player) = &self.player {
                player.seek(Duration::ZERO)?;
            }
        } else if self.playlist.advance().is_some() {
            self.play_current()?;
        } else {
            self.now_playing.state = PlayerState::Stopped;
        }
        Ok(())
    }

    /// Toggle play/pause.
    fn toggle_play_pause(&mut self) -> Result<()> {
        match self.now_playing.state {
            PlayerState::Playing => {
                if let Some(player) = &self.player {
                    player.pause()?;
                }
                self.now_playing.state = PlayerState::Paused;
            }
            PlayerState::Paused => {
                if let Some(player) = &self.player {
                    player.resume()?;
                }
                self.now_playing.state = PlayerState::Playing;
            }
            PlayerState::Stopped => {
                self.play_current()?;
            }
        }
        Ok(())
    }

    /// Start playback of the playlist's current track. A missing preview URL
    /// leaves the player silent.
    fn play_current(&mut self) -> Result<()> {
        let Some(track) = self.playlist.current_track().cloned() else {
            return Ok(());
        };

        self.now_playing.set_track(track.clone());

        if let Some(url) = &track.artwork_url100 {
            self.action_tx.send(Action::LoadArtwork(url.clone()))?;
        }

        match (&self.player, track.preview_url.clone()) {
            (Some(player), Some(url)) => {
                let duration = track.track_time_millis.map(Duration::from_millis);
                player.play(url, duration)?;
            }
            (_, None) => {
                tracing::warn!("Track has no preview URL: {}", track.display_title());
            }
            (None, _) => {}
        }

        Ok(())
    }

    /// Move playback to the playlist's new current track. Track changes
    /// preserve the play/pause state: a paused player stays paused on the
    /// new track.
    fn switch_track(&mut self) -> Result<()> {
        if self.now_playing.state.is_playing() {
            self.play_current()?;
        } else if let Some(track) = self.playlist.current_track().cloned() {
            self.now_playing.set_track(track.clone());
            self.now_playing.state = PlayerState::Stopped;
            if let Some(url) = &track.artwork_url100 {
                self.action_tx.send(Action::LoadArtwork(url.clone()))?;
            }
            if let Some(player) = &self.player {
                player.stop()?;
            }
        }
        Ok(())
    }

    /// Play a specific playlist index.
    fn play_index(&mut self, index: usize) -> Result<()> {
        if self.playlist.play_index(index).is_some() {
            self.play_current()?;
        }
        Ok(())
    }

    /// Set the volume, clamped to 0-100, and apply it to the audio handle.
    fn set_volume(&mut self, volume: u8) -> Result<()> {
        let volume = volume.min(100);
        self.now_playing.volume = volume;
        if let Some(player) = &self.player {
            player.set_volume(f32::from(volume) / 100.0)?;
        }
        Ok(())
    }

    /// Seek relative to the current position. A no-op when the duration is
    /// unknown.
    fn seek_relative(&mut self, delta_secs: i32) -> Result<()> {
        if self.now_playing.duration == 0 {
            return Ok(());
        }

        let new_pos = if delta_secs < 0 {
            self.now_playing
                .position
                .saturating_sub(delta_secs.unsigned_abs())
        } else {
            (self.now_playing.position + delta_secs as u32).min(self.now_playing.duration)
        };

        self.now_playing.position = new_pos;
        if let Some(player) = &self.player {
            player.seek(Duration::from_secs(u64::from(new_pos)))?;
        }

        Ok(())
    }

    /// Handle a left mouse click by hit-testing the stored layout rects.
    fn handle_mouse_click(&mut self, x: u16, y: u16) -> Result<()> {
        if self.show_help {
            self.show_help = false;
            return Ok(());
        }

        if contains(self.layout.search, x, y) {
            self.search.open();
            return Ok(());
        }
        self.search.close();

        if contains(self.layout.playlist, x, y) {
            self.focus = Focus::Playlist;
            // Each playlist entry renders as two lines inside the border;
            // the list may be scrolled, so the click lands relative to the
            // first visible entry
            let row = y.saturating_sub(self.layout.playlist.y + 1);
            let index = self.playlist.list_state.offset() + (row / 2) as usize;
            if index < self.playlist.len() {
                self.play_index(index)?;
            }
        } else if contains(self.layout.volume_bar, x, y) {
            let bar_width = self.layout.volume_bar.width;
            let offset = x.saturating_sub(self.layout.volume_bar.x);
            let volume = (((u32::from(offset) + 1) * 100) / u32::from(bar_width)).min(100) as u8;
            self.set_volume(volume)?;
        } else if contains(self.layout.progress_bar, x, y) {
            let offset = x.saturating_sub(self.layout.progress_bar.x);
            let ratio = f64::from(offset) / f64::from(self.layout.progress_bar.width.max(1));
            // seek_target is None while the duration is unknown; nothing
            // moves in that case
            if let Some(target) = self.now_playing.seek_target(ratio) {
                self.now_playing.position = target;
                if let Some(player) = &self.player {
                    player.seek(Duration::from_secs(u64::from(target)))?;
                }
            }
        } else if let Some(eq_area) = self.layout.equalizer {
            if contains(eq_area, x, y) {
                self.focus = Focus::Equalizer;
                let inner_width = eq_area.width.saturating_sub(2).max(1);
                let offset = x.saturating_sub(eq_area.x + 1);
                let band = (usize::from(offset) * 5 / usize::from(inner_width)).min(4);
                self.equalizer.selected = band;
            }
        }

        Ok(())
    }

    /// Run a catalog search for the current query. On failure the track list
    /// is left untouched and the error goes to the log only.
    async fn perform_search(&mut self) -> Result<()> {
        let Some(term) = self.search.submit() else {
            self.search.close();
            return Ok(());
        };

        tracing::info!("Searching catalog for {:?}", term);
        match self
            .client
            .search(&term, self.config.search.result_limit)
            .await
        {
            Ok(tracks) => {
                self.action_tx.send(Action::TracksLoaded(tracks))?;
            }
            Err(e) => {
                self.search.finish();
                tracing::error!("Search failed: {}", e);
            }
        }

        Ok(())
    }

    /// Fetch artwork for the given URL.
    async fn load_artwork(&mut self, url: &str) -> Result<()> {
        if self.now_playing.picker.is_none() {
            return Ok(());
        }

        match reqwest::get(url).await {
            Ok(response) => {
                if let Ok(bytes) = response.bytes().await {
                    self.action_tx
                        .send(Action::ArtworkLoaded(url.to_string(), bytes.to_vec()))?;
                }
            }
            Err(e) => {
                tracing::warn!("Failed to load artwork: {}", e);
            }
        }
        Ok(())
    }
}

/// Check whether a point falls inside a rect.
fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::Track;

    fn test_app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut config = Config::default();
        config.ui.show_artwork = false;
        App::new(config, tx)
    }

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| serde_json::from_str(&format!(r#"{{"trackName": "t{i}"}}"#)).unwrap())
            .collect()
    }

    #[test]
    fn track_end_with_repeat_restarts_same_track() {
        let mut app = test_app();
        app.playlist.replace_tracks(tracks(3));
        app.playlist.repeat = true;
        app.now_playing.position = 17;

        app.handle_track_ended().unwrap();

        assert_eq!(app.playlist.current, Some(0));
        assert_eq!(app.now_playing.position, 0);
    }

    #[test]
    fn track_end_without_repeat_advances() {
        let mut app = test_app();
        app.playlist.replace_tracks(tracks(3));

        app.handle_track_ended().unwrap();
        assert_eq!(app.playlist.current, Some(1));

        app.handle_track_ended().unwrap();
        app.handle_track_ended().unwrap();
        assert_eq!(app.playlist.current, Some(0));
    }

    #[test]
    fn track_end_on_empty_list_stops() {
        let mut app = test_app();
        app.now_playing.state = PlayerState::Playing;

        app.handle_track_ended().unwrap();

        assert_eq!(app.now_playing.state, PlayerState::Stopped);
        assert_eq!(app.playlist.current, None);
    }

    #[tokio::test]
    async fn empty_results_stop_playback() {
        let mut app = test_app();
        app.playlist.replace_tracks(tracks(3));
        app.now_playing.set_track(app.playlist.current_track().cloned().unwrap());
        app.now_playing.state = PlayerState::Playing;

        app.handle_action(Action::TracksLoaded(Vec::new()))
            .await
            .unwrap();

        assert_eq!(app.now_playing.state, PlayerState::Stopped);
        assert!(app.now_playing.current_track.is_none());
        assert_eq!(app.playlist.current, None);
    }

    #[test]
    fn playlist_click_accounts_for_scroll_offset() {
        let mut app = test_app();
        app.playlist.replace_tracks(tracks(10));
        *app.playlist.list_state.offset_mut() = 4;
        app.layout.playlist = Rect {
            x: 0,
            y: 0,
            width: 30,
            height: 8,
        };

        // Row 3 inside the border is the second visible two-line entry
        app.handle_mouse_click(5, 3).unwrap();

        assert_eq!(app.playlist.current, Some(5));
    }

    #[test]
    fn seek_while_paused_keeps_paused_state() {
        let mut app = test_app();
        app.now_playing.duration = 30;
        app.now_playing.state = PlayerState::Paused;

        app.seek_relative(5).unwrap();

        assert_eq!(app.now_playing.state, PlayerState::Paused);
        assert_eq!(app.now_playing.position, 5);
    }

    #[test]
    fn volume_is_clamped() {
        let mut app = test_app();
        app.set_volume(250).unwrap();
        assert_eq!(app.now_playing.volume, 100);
    }

    #[test]
    fn seek_without_duration_is_noop() {
        let mut app = test_app();
        app.now_playing.duration = 0;
        app.now_playing.position = 0;

        app.seek_relative(5).unwrap();
        assert_eq!(app.now_playing.position, 0);

        app.now_playing.duration = 30;
        app.seek_relative(5).unwrap();
        assert_eq!(app.now_playing.position, 5);
        app.seek_relative(100).unwrap();
        assert_eq!(app.now_playing.position, 30);
        app.seek_relative(-100).unwrap();
        assert_eq!(app.now_playing.position, 0);
    }

    #[test]
    fn contains_checks_bounds() {
        let rect = Rect {
            x: 2,
            y: 3,
            width: 4,
            height: 2,
        };
        assert!(contains(rect, 2, 3));
        assert!(contains(rect, 5, 4));
        assert!(!contains(rect, 6, 4));
        assert!(!contains(rect, 2, 5));
        assert!(!contains(rect, 1, 3));
    }
}
