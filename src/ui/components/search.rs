//! Search input component.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Search input state. The query is only sent to the catalog on explicit
/// submit; there is no incremental search.
#[derive(Debug, Default)]
pub struct SearchState {
    /// Whether the input line has keyboard focus
    pub active: bool,

    /// Current query text
    pub query: String,

    /// Is a search request outstanding
    pub searching: bool,
}

impl SearchState {
    pub fn new(initial_query: impl Into<String>) -> Self {
        Self {
            active: false,
            query: initial_query.into(),
            searching: false,
        }
    }

    /// Focus the input for editing.
    pub fn open(&mut self) {
        self.active = true;
    }

    /// Drop focus, keeping the query text.
    pub fn close(&mut self) {
        self.active = false;
    }

    /// Append a character to the query.
    pub fn input(&mut self, c: char) {
        self.query.push(c);
    }

    /// Remove the last character from the query.
    pub fn backspace(&mut self) {
        self.query.pop();
    }

    /// Take the query for submission, if it is non-empty.
    pub fn submit(&mut self) -> Option<String> {
        let term = self.query.trim();
        if term.is_empty() {
            return None;
        }
        self.searching = true;
        self.active = false;
        Some(term.to_string())
    }

    /// Mark the outstanding search as finished.
    pub fn finish(&mut self) {
        self.searching = false;
    }
}

/// Render the search input line above the playlist.
pub fn render_search(frame: &mut Frame, area: Rect, state: &SearchState) {
    let border_color = if state.active {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Search")
        .border_style(Style::default().fg(border_color));

    let suffix = if state.searching {
        "…"
    } else if state.active {
        "_"
    } else {
        ""
    };
    let input = Paragraph::new(format!("{}{}", state.query, suffix))
        .style(Style::default().fg(Color::White))
        .block(block);

    frame.render_widget(input, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_trims_and_takes_query() {
        let mut state = SearchState::new("  daft punk  ");
        state.open();
        assert_eq!(state.submit(), Some(String::from("daft punk")));
        assert!(state.searching);
        assert!(!state.active);
    }

    #[test]
    fn empty_query_does_not_submit() {
        let mut state = SearchState::new("");
        assert_eq!(state.submit(), None);
        assert!(!state.searching);
    }

    #[test]
    fn editing_round_trip() {
        let mut state = SearchState::new("ab");
        state.input('c');
        state.backspace();
        state.backspace();
        assert_eq!(state.query, "a");
    }
}
