//! Terminal lifecycle: raw-mode setup, teardown, and crash hooks.

use std::io::{stdout, Stdout};

use color_eyre::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Put the terminal into raw mode on the alternate screen, with mouse
/// reporting enabled and the cursor hidden.
pub fn init() -> Result<Tui> {
    terminal::enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    Ok(terminal)
}

/// Undo everything `init` did. Safe to call more than once.
pub fn restore() -> Result<()> {
    execute!(stdout(), Show, DisableMouseCapture, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    Ok(())
}

/// Route panics and eyre reports through a terminal restore first, so a
/// crash never leaves the shell in raw mode.
pub fn install_hooks() -> Result<()> {
    let builder = color_eyre::config::HookBuilder::default().panic_section(concat!(
        "This is a bug, please report it at ",
        env!("CARGO_PKG_REPOSITORY")
    ));
    let (panic_hook, eyre_hook) = builder.into_hooks();

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        panic_hook(info);
    }));

    let eyre_hook = eyre_hook.into_eyre_hook();
    color_eyre::eyre::set_hook(Box::new(move |error| {
        let _ = restore();
        eyre_hook(error)
    }))?;

    Ok(())
}
