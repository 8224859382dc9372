//! Search-result playlist component.
//!
//! Holds the fetched track list and the playback-selection logic: circular
//! next/previous, uniform-random shuffle, repeat-on-end.

use rand::Rng;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::client::models::Track;

/// Playlist state.
#[derive(Debug, Default)]
pub struct PlaylistState {
    /// Tracks from the last successful search
    pub tracks: Vec<Track>,

    /// Currently playing index, always valid when set
    pub current: Option<usize>,

    /// Shuffle enabled: next picks a uniformly random index, which may
    /// repeat the current track
    pub shuffle: bool,

    /// Repeat enabled: end of track restarts the same track
    pub repeat: bool,

    /// Selection state for UI
    pub list_state: ListState,
}

impl PlaylistState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the track list wholesale. Selects index 0 when the new list
    /// is non-empty, otherwise leaves the current index unset.
    pub fn replace_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        if self.tracks.is_empty() {
            self.current = None;
            self.list_state.select(None);
        } else {
            self.current = Some(0);
            self.list_state.select(Some(0));
        }
    }

    /// Get the current track.
    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Advance to the next track and return its index. Shuffle picks a
    /// uniformly random index; otherwise advances circularly. No-op on an
    /// empty list.
    pub fn advance(&mut self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }

        let next = if self.shuffle {
            rand::thread_rng().gen_range(0..self.tracks.len())
        } else {
            match self.current {
                Some(i) => (i + 1) % self.tracks.len(),
                None => 0,
            }
        };

        self.current = Some(next);
        Some(next)
    }

    /// Step back to the previous track, wrapping to the last index at 0.
    /// No-op on an empty list.
    pub fn go_back(&mut self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }

        let prev = match self.current {
            Some(0) | None => self.tracks.len() - 1,
            Some(i) => i - 1,
        };

        self.current = Some(prev);
        Some(prev)
    }

    /// Select a specific track for playback.
    pub fn play_index(&mut self, index: usize) -> Option<&Track> {
        if index < self.tracks.len() {
            self.current = Some(index);
            self.list_state.select(Some(index));
            self.current_track()
        } else {
            None
        }
    }

    /// Get playlist length.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the playlist is empty.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Move selection up.
    pub fn select_previous(&mut self) {
        if self.tracks.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) | None => self.tracks.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Move selection down.
    pub fn select_next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.tracks.len() => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Get selected index.
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }
}

/// Render the playlist sidebar.
pub fn render_playlist(frame: &mut Frame, area: Rect, state: &mut PlaylistState, focused: bool) {
    let title = format!("Playlist ({})", state.tracks.len());

    let border_color = if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border_color));

    // Leave room for borders, the marker, and the duration column
    let title_width = area.width.saturating_sub(12) as usize;

    let items: Vec<ListItem> = state
        .tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let is_current = state.current == Some(i);

            let marker = if is_current { "▶ " } else { "  " };
            let style = if is_current {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let name = truncate_to_width(track.display_title(), title_width);

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(name, style),
                    Span::styled(
                        format!(" {}", track.duration_string()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("  {}", truncate_to_width(track.display_artist(), title_width)),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut state.list_state);
}

/// Truncate a string to a display width, appending an ellipsis when cut.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width.saturating_sub(1) {
            out.push('…');
            return out;
        }
        width += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str) -> Track {
        serde_json::from_str(&format!(r#"{{"trackName": "{name}"}}"#)).unwrap()
    }

    fn playlist(n: usize) -> PlaylistState {
        let mut state = PlaylistState::new();
        state.replace_tracks((0..n).map(|i| track(&format!("t{i}"))).collect());
        state
    }

    #[test]
    fn replace_selects_first_track() {
        let state = playlist(3);
        assert_eq!(state.current, Some(0));
        assert_eq!(state.current_track().unwrap().display_title(), "t0");
    }

    #[test]
    fn replace_with_empty_unsets_current() {
        let mut state = playlist(3);
        state.replace_tracks(Vec::new());
        assert_eq!(state.current, None);
        assert!(state.current_track().is_none());
    }

    #[test]
    fn advance_cycles_back_to_start() {
        let mut state = playlist(4);
        for _ in 0..4 {
            state.advance();
        }
        assert_eq!(state.current, Some(0));
    }

    #[test]
    fn go_back_wraps_to_last() {
        let mut state = playlist(5);
        assert_eq!(state.go_back(), Some(4));
    }

    #[test]
    fn empty_list_transitions_are_noops() {
        let mut state = PlaylistState::new();
        assert_eq!(state.advance(), None);
        assert_eq!(state.go_back(), None);
        assert_eq!(state.current, None);
    }

    #[test]
    fn shuffle_picks_valid_indices() {
        let mut state = playlist(3);
        state.shuffle = true;
        for _ in 0..50 {
            let i = state.advance().unwrap();
            assert!(i < 3);
        }
    }

    #[test]
    fn shuffle_on_single_track_repeats_it() {
        let mut state = playlist(1);
        state.shuffle = true;
        assert_eq!(state.advance(), Some(0));
        assert_eq!(state.advance(), Some(0));
    }

    #[test]
    fn play_index_rejects_out_of_range() {
        let mut state = playlist(2);
        assert!(state.play_index(2).is_none());
        assert_eq!(state.current, Some(0));
    }

    #[test]
    fn truncation_respects_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a very long track name", 8), "a very …");
    }
}
