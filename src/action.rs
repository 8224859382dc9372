//! Application actions/events that drive state changes.

use crate::client::models::Track;

/// Actions that can be dispatched to update application state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Application lifecycle
    Quit,
    Tick,
    Resize(u16, u16),

    // Navigation
    NavigateUp,
    NavigateDown,
    NavigateLeft,
    NavigateRight,
    Select,
    SwitchFocus,

    // Mouse
    MouseClick(u16, u16),
    MouseScroll(i16, u16, u16), // delta (positive = down), column, row

    // Search
    OpenSearch,
    CloseSearch,
    SearchInput(char),
    SearchBackspace,
    SearchSubmit,
    TracksLoaded(Vec<Track>),

    // Playback controls
    PlayPause,
    NextTrack,
    PreviousTrack,
    SeekForward,
    SeekBackward,
    VolumeUp,
    VolumeDown,
    ToggleShuffle,
    ToggleRepeat,

    // Artwork
    LoadArtwork(String),
    ArtworkLoaded(String, Vec<u8>),

    // Overlays
    ShowHelp,
    HideHelp,

    // No-op
    None,
}

/// Current playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlayerState {
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Which panel keyboard input is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Playlist,
    Equalizer,
}

impl Focus {
    /// Cycle to the other panel.
    pub fn toggle(self) -> Self {
        match self {
            Self::Playlist => Self::Equalizer,
            Self::Equalizer => Self::Playlist,
        }
    }
}
