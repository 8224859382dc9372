//! UI components module.

pub mod now_playing;
pub mod playlist;
pub mod search;
pub mod visualizer;

pub use now_playing::{render_now_playing, NowPlayingState};
pub use playlist::{render_playlist, PlaylistState};
pub use search::{render_search, SearchState};
pub use visualizer::{render_equalizer, render_waveform, EqualizerState, Visualizer};
