//! Cosmetic visualizer: waveform bars, album rotation, visual equalizer.
//!
//! None of this touches the audio signal. The equalizer sliders only feed the
//! on-screen bar heights and the artwork scale indicator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

/// Number of waveform bars.
const BAR_COUNT: usize = 30;

/// Random jitter range added to each bar, matching the 0..20 base band.
const JITTER_MAX: f64 = 20.0;

/// Rotation frames for the "spinning" artwork indicator.
const SPIN_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Equalizer band names, fixed.
pub const BAND_NAMES: [&str; 5] = ["bass", "low-mid", "mid", "high-mid", "treble"];

/// Band gain bounds.
pub const BAND_MIN: i8 = -10;
pub const BAND_MAX: i8 = 10;

/// Visual equalizer state: 5 fixed bands in [-10, 10].
#[derive(Debug, Default)]
pub struct EqualizerState {
    /// Band gains, in BAND_NAMES order
    pub bands: [i8; 5],

    /// Band with keyboard focus
    pub selected: usize,
}

impl EqualizerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjust the selected band, clamped to the valid range.
    pub fn adjust(&mut self, delta: i8) {
        let band = &mut self.bands[self.selected];
        *band = band.saturating_add(delta).clamp(BAND_MIN, BAND_MAX);
    }

    /// Move band focus left, stopping at the first band.
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move band focus right, stopping at the last band.
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1).min(self.bands.len() - 1);
    }

    /// Naive sum of all band gains; drives the cosmetic scaling.
    pub fn total(&self) -> i32 {
        self.bands.iter().map(|&b| i32::from(b)).sum()
    }

    /// Artwork scale factor derived from the slider sum.
    pub fn art_scale(&self) -> f64 {
        1.0 + f64::from(self.total()) / 50.0
    }
}

/// Waveform/rotation animation state, driven by the tick loop.
pub struct Visualizer {
    rng: StdRng,
    heights: [u16; BAR_COUNT],
    spin_frame: usize,
}

impl Visualizer {
    /// Create a visualizer from a seed so tests can pin the jitter.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            heights: [0; BAR_COUNT],
            spin_frame: 0,
        }
    }

    /// Advance one animation step. While playing, the rotation frame moves
    /// and the bars pick up fresh jitter; otherwise everything freezes.
    pub fn tick(&mut self, playing: bool, eq_total: i32) {
        if !playing {
            return;
        }

        self.spin_frame = (self.spin_frame + 1) % SPIN_FRAMES.len();
        let base = f64::from(eq_total) / 2.0;
        for h in &mut self.heights {
            let jitter: f64 = self.rng.gen_range(0.0..JITTER_MAX);
            *h = (jitter + base).max(0.0) as u16;
        }
    }

    /// Current rotation glyph.
    pub fn spin_symbol(&self) -> &'static str {
        SPIN_FRAMES[self.spin_frame]
    }

    /// Current bar heights.
    pub fn heights(&self) -> &[u16; BAR_COUNT] {
        &self.heights
    }
}

/// Render the waveform bar chart.
pub fn render_waveform(frame: &mut Frame, area: Rect, visualizer: &Visualizer) {
    let bars: Vec<Bar> = visualizer
        .heights()
        .iter()
        .map(|&h| {
            Bar::default()
                .value(u64::from(h))
                .text_value(String::new())
                .style(Style::default().fg(Color::Green))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Waveform")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(1)
        .max(45);

    frame.render_widget(chart, area);
}

/// Render the visual equalizer sliders.
pub fn render_equalizer(
    frame: &mut Frame,
    area: Rect,
    state: &EqualizerState,
    focused: bool,
) {
    let border_color = if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Equalizer (visual)")
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(inner);

    for (i, column) in columns.iter().enumerate() {
        let gain = state.bands[i];
        let selected = focused && state.selected == i;

        let name_style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let lines = vec![
            Line::from(Span::styled(slider_line(gain), name_style)),
            Line::from(Span::styled(format!("{:+}", gain), name_style)),
            Line::from(Span::styled(BAND_NAMES[i], name_style)),
        ];

        frame.render_widget(Paragraph::new(lines).centered(), *column);
    }
}

/// Draw a horizontal slider for a band gain in [-10, 10].
fn slider_line(gain: i8) -> String {
    let pos = (gain - BAND_MIN) as usize; // 0..=20
    let mut line = String::new();
    for i in 0..=(BAND_MAX - BAND_MIN) as usize {
        line.push(if i == pos { '●' } else { '─' });
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_clamps_to_bounds() {
        let mut eq = EqualizerState::new();
        for _ in 0..30 {
            eq.adjust(1);
        }
        assert_eq!(eq.bands[0], BAND_MAX);
        for _ in 0..60 {
            eq.adjust(-1);
        }
        assert_eq!(eq.bands[0], BAND_MIN);
    }

    #[test]
    fn band_focus_does_not_wrap() {
        let mut eq = EqualizerState::new();
        eq.select_previous();
        assert_eq!(eq.selected, 0);
        for _ in 0..10 {
            eq.select_next();
        }
        assert_eq!(eq.selected, 4);
    }

    #[test]
    fn total_and_scale() {
        let mut eq = EqualizerState::new();
        eq.bands = [10, 10, 10, 10, 10];
        assert_eq!(eq.total(), 50);
        assert!((eq.art_scale() - 2.0).abs() < 1e-9);

        eq.bands = [-10; 5];
        assert_eq!(eq.total(), -50);
        assert!((eq.art_scale() - 0.0).abs() < 1e-9);
    }

    #[test]
    fn seeded_heights_stay_in_range() {
        let mut vis = Visualizer::new(42);
        for _ in 0..20 {
            vis.tick(true, 50);
            for &h in vis.heights() {
                // jitter < 20 plus total/2 = 25
                assert!(h <= 45);
            }
        }
    }

    #[test]
    fn negative_eq_total_floors_at_zero() {
        let mut vis = Visualizer::new(7);
        vis.tick(true, -50);
        for &h in vis.heights() {
            assert!(h <= 20);
        }
    }

    #[test]
    fn animation_freezes_when_not_playing() {
        let mut vis = Visualizer::new(1);
        vis.tick(true, 0);
        let frame = vis.spin_frame;
        let heights = *vis.heights();
        vis.tick(false, 0);
        assert_eq!(vis.spin_frame, frame);
        assert_eq!(*vis.heights(), heights);
    }

    #[test]
    fn same_seed_same_jitter() {
        let mut a = Visualizer::new(99);
        let mut b = Visualizer::new(99);
        a.tick(true, 10);
        b.tick(true, 10);
        assert_eq!(a.heights(), b.heights());
    }
}
