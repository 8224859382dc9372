//! Now playing bar component.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use ratatui_image::{picker::Picker, protocol::StatefulProtocol};

use crate::action::PlayerState;
use crate::client::models::Track;

/// Now playing state.
pub struct NowPlayingState {
    /// Currently playing track
    pub current_track: Option<Track>,

    /// Player state
    pub state: PlayerState,

    /// Current position in seconds
    pub position: u32,

    /// Total duration in seconds (0 when unknown)
    pub duration: u32,

    /// Volume (0-100)
    pub volume: u8,

    /// Artwork image protocol (for Sixel/Kitty/etc.)
    pub artwork: Option<StatefulProtocol>,

    /// Artwork URL currently loaded
    pub artwork_url: Option<String>,

    /// Image picker for terminal graphics
    pub picker: Option<Picker>,
}

impl NowPlayingState {
    pub fn new(volume: u8, show_artwork: bool) -> Self {
        let picker = if show_artwork {
            Picker::from_query_stdio().ok()
        } else {
            None
        };

        Self {
            current_track: None,
            state: PlayerState::default(),
            position: 0,
            duration: 0,
            volume: volume.min(100),
            artwork: None,
            artwork_url: None,
            picker,
        }
    }

    /// Get progress as a ratio (0.0 to 1.0); 0.0 when the duration is
    /// unknown.
    pub fn progress(&self) -> f64 {
        if self.duration == 0 {
            0.0
        } else {
            (f64::from(self.position) / f64::from(self.duration)).min(1.0)
        }
    }

    /// Map a click ratio on the progress bar to a target position in
    /// seconds. Returns `None` when the duration is unknown, in which case
    /// seeking is a no-op.
    pub fn seek_target(&self, ratio: f64) -> Option<u32> {
        if self.duration == 0 {
            return None;
        }
        let ratio = ratio.clamp(0.0, 1.0);
        Some((ratio * f64::from(self.duration)) as u32)
    }

    /// Set the current track, resetting position and artwork as needed.
    pub fn set_track(&mut self, track: Track) {
        self.duration = track.duration_secs().unwrap_or(0);
        self.position = 0;
        let new_url = track.artwork_url100.clone();
        if self.artwork_url != new_url {
            self.artwork = None;
            self.artwork_url = new_url;
        }
        self.current_track = Some(track);
    }

    /// Drop the current track and reset the transport.
    pub fn clear(&mut self) {
        self.current_track = None;
        self.state = PlayerState::Stopped;
        self.position = 0;
        self.duration = 0;
        self.artwork = None;
        self.artwork_url = None;
    }

    /// Decode fetched artwork bytes into a terminal image protocol.
    pub fn set_artwork(&mut self, image_data: &[u8]) {
        if let Some(picker) = &self.picker {
            if let Ok(dyn_image) = image::load_from_memory(image_data) {
                self.artwork = Some(picker.new_resize_protocol(dyn_image));
            }
        }
    }

    /// Get play/pause symbol.
    pub fn state_symbol(&self) -> &'static str {
        match self.state {
            PlayerState::Playing => "▶",
            PlayerState::Paused => "⏸",
            PlayerState::Stopped => "■",
        }
    }
}

/// Width of the right-aligned volume section: "[██████████] 100%".
pub const VOLUME_SECTION_WIDTH: u16 = 17;

/// Format seconds as M:SS. Unknown and zero both render "0:00", matching
/// what an unstarted player shows.
pub fn format_time(seconds: Option<u32>) -> String {
    let secs = seconds.unwrap_or(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Render the now playing bar.
pub fn render_now_playing(
    frame: &mut Frame,
    area: Rect,
    state: &NowPlayingState,
    shuffle: bool,
    repeat: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 3 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Track info
            Constraint::Length(1), // Controls + volume
            Constraint::Length(1), // Progress bar
        ])
        .split(inner);

    // Track info line
    if let Some(track) = &state.current_track {
        let info = Line::from(vec![
            Span::styled(
                state.state_symbol(),
                Style::default().fg(Color::Green),
            ),
            Span::raw(" "),
            Span::styled(
                track.display_title(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" - ", Style::default().fg(Color::DarkGray)),
            Span::styled(track.display_artist(), Style::default().fg(Color::Cyan)),
        ]);
        frame.render_widget(Paragraph::new(info), chunks[0]);
    } else {
        frame.render_widget(
            Paragraph::new("Nothing playing").style(Style::default().fg(Color::DarkGray)),
            chunks[0],
        );
    }

    // Controls line: times and mode flags on the left, volume on the right.
    // The volume section keeps a fixed width so mouse clicks can be mapped
    // back to a level.
    let control_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(VOLUME_SECTION_WIDTH),
        ])
        .split(chunks[1]);

    let shuffle_flag = if shuffle { " [shuffle]" } else { "" };
    let repeat_flag = if repeat { " [repeat]" } else { "" };
    let times = format!(
        "{} / {}{}{}",
        format_time(Some(state.position)),
        format_time(Some(state.duration)),
        shuffle_flag,
        repeat_flag,
    );
    frame.render_widget(
        Paragraph::new(times).style(Style::default().fg(Color::DarkGray)),
        control_chunks[0],
    );

    let volume = format!("{} {:>3}%", volume_bar(state.volume), state.volume);
    frame.render_widget(
        Paragraph::new(volume).style(Style::default().fg(Color::DarkGray)),
        control_chunks[1],
    );

    // Progress bar
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::DarkGray))
        .percent((state.progress() * 100.0) as u16)
        .label("");
    frame.render_widget(gauge, chunks[2]);
}

/// Render a small volume bar.
fn volume_bar(volume: u8) -> String {
    let filled = (volume as usize).min(100) / 10;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(10 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_duration(duration: u32) -> NowPlayingState {
        let mut state = NowPlayingState {
            current_track: None,
            state: PlayerState::Stopped,
            position: 0,
            duration: 0,
            volume: 70,
            artwork: None,
            artwork_url: None,
            picker: None,
        };
        state.duration = duration;
        state
    }

    #[test]
    fn format_time_unknown_and_zero() {
        assert_eq!(format_time(None), "0:00");
        assert_eq!(format_time(Some(0)), "0:00");
    }

    #[test]
    fn format_time_pads_seconds() {
        assert_eq!(format_time(Some(125)), "2:05");
        assert_eq!(format_time(Some(59)), "0:59");
        assert_eq!(format_time(Some(600)), "10:00");
    }

    #[test]
    fn progress_guards_unknown_duration() {
        let mut state = state_with_duration(0);
        state.position = 10;
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn progress_is_clamped() {
        let mut state = state_with_duration(30);
        state.position = 15;
        assert!((state.progress() - 0.5).abs() < 1e-9);
        state.position = 45;
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn seek_target_is_noop_without_duration() {
        let state = state_with_duration(0);
        assert_eq!(state.seek_target(0.5), None);
    }

    #[test]
    fn seek_target_maps_ratio() {
        let state = state_with_duration(30);
        assert_eq!(state.seek_target(0.5), Some(15));
        assert_eq!(state.seek_target(-1.0), Some(0));
        assert_eq!(state.seek_target(2.0), Some(30));
    }

    #[test]
    fn volume_bar_levels() {
        assert_eq!(volume_bar(0), "[░░░░░░░░░░]");
        assert_eq!(volume_bar(100), "[██████████]");
        assert_eq!(volume_bar(55), "[█████░░░░░]");
    }
}
