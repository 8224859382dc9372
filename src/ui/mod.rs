//! Main UI layout and rendering.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use ratatui_image::StatefulImage;

use crate::action::Focus;
use crate::app::App;
use crate::ui::components::now_playing::VOLUME_SECTION_WIDTH;

pub mod components;

pub use components::*;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Main layout: [sidebar] [main panel]
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(40)])
        .split(area);

    // Sidebar: [search input] [playlist]
    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(columns[0]);

    app.layout.search = sidebar[0];
    app.layout.playlist = sidebar[1];

    render_search(frame, sidebar[0], &app.search);
    render_playlist(
        frame,
        sidebar[1],
        &mut app.playlist,
        app.focus == Focus::Playlist && !app.search.active,
    );

    // Main panel: [artwork] [waveform] [equalizer] [now playing]
    let show_visualizer = app.config.ui.show_visualizer;
    let main_chunks = if show_visualizer {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),    // Artwork
                Constraint::Length(8), // Waveform
                Constraint::Length(5), // Equalizer
                Constraint::Length(5), // Now playing
            ])
            .split(columns[1])
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(5)])
            .split(columns[1])
    };

    let now_playing_area = *main_chunks.last().expect("layout has chunks");
    app.layout.now_playing = now_playing_area;

    // Rects used for mouse hit-testing, mirroring render_now_playing's rows:
    // row 0 = info, row 1 = controls (volume on the right), row 2 = progress.
    app.layout.progress_bar = Rect {
        x: now_playing_area.x + 1,
        y: now_playing_area.y + 3,
        width: now_playing_area.width.saturating_sub(2),
        height: 1,
    };
    let controls_width = now_playing_area.width.saturating_sub(2);
    let volume_x = now_playing_area.x + 1 + controls_width.saturating_sub(VOLUME_SECTION_WIDTH);
    app.layout.volume_bar = Rect {
        // Inside the brackets of "[██████████]"
        x: volume_x + 1,
        y: now_playing_area.y + 2,
        width: 10,
        height: 1,
    };

    render_artwork_panel(frame, main_chunks[0], app);

    if show_visualizer {
        render_waveform(frame, main_chunks[1], &app.visualizer);
        app.layout.equalizer = Some(main_chunks[2]);
        render_equalizer(
            frame,
            main_chunks[2],
            &app.equalizer,
            app.focus == Focus::Equalizer && !app.search.active,
        );
    } else {
        app.layout.equalizer = None;
    }

    render_now_playing(
        frame,
        now_playing_area,
        &app.now_playing,
        app.playlist.shuffle,
        app.playlist.repeat,
    );

    if app.show_help {
        render_help(frame, area);
    }
}

/// Render the artwork panel. Shows the fetched cover when the terminal
/// supports images, a text placeholder otherwise. The rotation glyph and the
/// equalizer-derived scale live in the title; both are decorative.
fn render_artwork_panel(frame: &mut Frame, area: Rect, app: &mut App) {
    let title = if app.now_playing.state.is_playing() {
        format!(
            " {} Now Playing (x{:.2}) ",
            app.visualizer.spin_symbol(),
            app.equalizer.art_scale()
        )
    } else {
        String::from(" Now Playing ")
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(ref mut protocol) = app.now_playing.artwork {
        let image = StatefulImage::default();
        frame.render_stateful_widget(image, inner, protocol);
        return;
    }

    let lines = if let Some(track) = &app.now_playing.current_track {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                track.display_title(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                track.display_artist(),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(Span::styled(
                track
                    .collection_name
                    .as_deref()
                    .unwrap_or("")
                    .to_string(),
                Style::default().fg(Color::DarkGray),
            )),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Search the catalog and pick a track",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    };

    frame.render_widget(Paragraph::new(lines).centered(), inner);
}

/// Render the help overlay.
fn render_help(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Playback",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("  Space         Play/Pause"),
        Line::from("  n/p           Next/Previous track"),
        Line::from("  ,/.           Seek backward/forward (5s)"),
        Line::from("  +/-           Volume up/down"),
        Line::from("  s             Toggle shuffle"),
        Line::from("  r             Toggle repeat"),
        Line::from(""),
        Line::from(Span::styled(
            "Navigation",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("  j/k or ↑/↓    Move selection / adjust band"),
        Line::from("  h/l or ←/→    Select equalizer band"),
        Line::from("  Tab           Switch playlist/equalizer focus"),
        Line::from("  Enter         Play selected track"),
        Line::from("  /             Edit search query"),
        Line::from(""),
        Line::from(Span::styled(
            "Mouse",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("  Click track   Play it"),
        Line::from("  Click prog    Seek in track"),
        Line::from("  Click vol     Set volume"),
        Line::from("  Scroll vol    Adjust volume"),
        Line::from(""),
        Line::from("  ?             Show this help"),
        Line::from("  q             Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Help")
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
