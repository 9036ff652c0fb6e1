//! Interactive terminal front end (Ratatui + Crossterm).
//! - Sets up the terminal
//! - Draws the two sections and the add modal
//! - Feeds key presses to `App` until it asks to quit

use std::time::Duration;

use crossterm::cursor::Show;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;
use tracing::subscriber::NoSubscriber;

use crate::kv::KeyValue;
use crate::Result;

mod app;
mod draw;

pub use app::{App, FormField, FormState};

type Term = Terminal<CrosstermBackend<std::io::Stdout>>;

/// Raw mode plus the alternate screen. Dropping it puts the terminal back, also while unwinding
/// from a panic.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        crossterm::execute!(std::io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            Show
        );
    }
}

/// Takes over the terminal, runs `app` until the user quits and hands it back. The terminal is
/// restored on every return path and on panic.
///
/// Log output is muted while the screen is up; save failures are reported in the status bar.
pub fn run<K: KeyValue>(mut app: App<K>) -> Result<App<K>> {
    let guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stdout()))?;

    let result = tracing::subscriber::with_default(NoSubscriber::default(), || {
        event_loop(&mut terminal, &mut app)
    });

    drop(terminal);
    drop(guard);
    debug!("Left the interactive screen");
    result.map(|()| app)
}

fn event_loop<K: KeyValue>(terminal: &mut Term, app: &mut App<K>) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    loop {
        terminal.draw(|f| draw::draw(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.quit {
            return Ok(());
        }
    }
}
