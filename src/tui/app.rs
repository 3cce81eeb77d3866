//! Terminal lifecycle for the viewer
//!
//! Sets up raw mode and the alternate screen, and restores the terminal on
//! drop (including on early return through `?`).

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::event::{Event, EventHandler};

/// TUI Application wrapper
///
/// Manages terminal setup/teardown and provides the main event loop.
pub struct App {
    /// Terminal instance
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Event handler
    events: EventHandler,
}

impl App {
    /// Create a new App instance.
    ///
    /// Sets up the terminal for TUI mode (raw mode, alternate screen, mouse
    /// capture). Uses explicit rollback to ensure the terminal is restored on
    /// error.
    pub fn new(tick_rate: Duration) -> Result<Self> {
        enable_raw_mode()?;

        // If alternate screen fails, restore raw mode
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        // If terminal creation fails, restore alternate screen and raw mode
        let backend = CrosstermBackend::new(stdout);
        let terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(e) => {
                let mut stdout = io::stdout();
                let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
                let _ = disable_raw_mode();
                return Err(e.into());
            }
        };

        let events = EventHandler::new(tick_rate);

        Ok(Self { terminal, events })
    }

    /// Get the next event from the event handler.
    pub fn next_event(&self) -> Result<Event> {
        self.events.next()
    }

    /// Draw a frame using the provided closure.
    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}
