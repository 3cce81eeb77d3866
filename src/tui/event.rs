//! Event handling for TUI
//!
//! Reads terminal input on a separate thread and forwards it, together with
//! periodic ticks, over a channel.

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Terminal was resized
    Resize(u16, u16),
    /// Key was pressed
    Key(KeyEvent),
    /// Mouse input (used for drag rotation)
    Mouse(MouseEvent),
    /// Tick event for periodic updates
    Tick,
    /// Quit event
    Quit,
}

/// Whether `key` asks the application to quit (q, Esc or Ctrl+C).
pub fn is_quit_key(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('q')
        || key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Event handler that runs in a separate thread
pub struct EventHandler {
    /// Receiver for events
    rx: mpsc::Receiver<Event>,
    /// Handle to the event thread (kept for cleanup)
    _handle: thread::JoinHandle<()>,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate.
    ///
    /// The tick rate determines how often Tick events are generated.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || loop {
            let event = match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(CrosstermEvent::Key(key)) if is_quit_key(&key) => {
                        let _ = tx.send(Event::Quit);
                        break;
                    }
                    Ok(CrosstermEvent::Key(key)) => Event::Key(key),
                    Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
                    Ok(CrosstermEvent::Resize(width, height)) => Event::Resize(width, height),
                    Ok(_) => continue,
                    Err(_) => break,
                },
                Ok(false) => Event::Tick,
                // Polling error - exit the event loop
                Err(_) => break,
            };
            if tx.send(event).is_err() {
                break;
            }
        });

        Self {
            rx,
            _handle: handle,
        }
    }

    /// Get the next event, blocking until one is available.
    pub fn next(&self) -> Result<Event> {
        self.rx
            .recv()
            .map_err(|e| anyhow::anyhow!("Event channel closed: {}", e))
    }
}
