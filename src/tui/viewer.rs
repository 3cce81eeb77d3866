//! Interactive viewer
//!
//! Maps keys and mouse drags onto navigator operations and renders the
//! focused image's metadata. Pixels are not drawn; the terminal shows where
//! you are, how the image is rotated and how much of the window is cached.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use humansize::{format_size, DECIMAL};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Gauge, Paragraph};
use ratatui::Frame;

use super::app::App;
use super::event::Event;
use crate::cache::PrefetchEvent;
use crate::config::Config;
use crate::navigator::{NavState, Navigator};
use crate::rotation::RotationOp;

/// Help line shown at the bottom of the screen.
pub const HELP: &str =
    "f/d next/prev  PgDn/PgUp jump  r +90  R +180  0 reset  [ ] fine  e export  q quit";

/// Viewer state on top of a [`Navigator`].
pub struct Viewer {
    navigator: Navigator,
    config: Config,
    status: String,
    drag_origin: Option<(u16, u16)>,
}

impl Viewer {
    pub fn new(navigator: Navigator, config: Config) -> Self {
        let status = match navigator.state() {
            NavState::Ready => format!("{} images", navigator.len()),
            NavState::Idle => "No images found".to_string(),
        };
        Self {
            navigator,
            config,
            status,
            drag_origin: None,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Last status message.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let group = self.navigator.scheduler().group_size();
        let focus = self.navigator.focus().unwrap_or(0);
        let step = self.config.rotation.step_pixels;
        let sensitivity = self.config.rotation.sensitivity;

        match key.code {
            KeyCode::Char('f') | KeyCode::Right => self.navigator.step_forward(),
            KeyCode::Char('d') | KeyCode::Left => self.navigator.step_back(),
            KeyCode::Home => self.navigator.seek(0),
            KeyCode::End => self.navigator.seek(usize::MAX),
            KeyCode::PageDown => self.navigator.seek(focus.saturating_add(group)),
            KeyCode::PageUp => self.navigator.seek(focus.saturating_sub(group)),
            KeyCode::Char('r') => self.rotate(RotationOp::Quarter),
            KeyCode::Char('R') => self.rotate(RotationOp::Half),
            KeyCode::Char('0') => self.rotate(RotationOp::Reset),
            KeyCode::Char('[') => {
                let angle = self.navigator.rotate_drag(-step, 0.0, sensitivity);
                self.show_angle(angle);
            }
            KeyCode::Char(']') => {
                let angle = self.navigator.rotate_drag(step, 0.0, sensitivity);
                self.show_angle(angle);
            }
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
    }

    /// Left-button drags rotate the focused image. Each terminal cell counts
    /// as `step_pixels` pixels of pointer motion.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let position = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.drag_origin = Some(position),
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((x, y)) = self.drag_origin {
                    let step = self.config.rotation.step_pixels;
                    let dx = (f64::from(position.0) - f64::from(x)) * step;
                    let dy = (f64::from(position.1) - f64::from(y)) * step;
                    let angle = self
                        .navigator
                        .rotate_drag(dx, dy, self.config.rotation.sensitivity);
                    self.show_angle(angle);
                }
                self.drag_origin = Some(position);
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag_origin = None,
            _ => {}
        }
    }

    /// Drain prefetch events; failures of the focused image are surfaced.
    pub fn on_tick(&mut self) {
        let focus = self.navigator.focus();
        for event in self.navigator.poll() {
            if let PrefetchEvent::Failed { index, .. } = event {
                if Some(index) == focus {
                    self.status = "Could not decode this image".to_string();
                }
            }
        }
    }

    fn rotate(&mut self, op: RotationOp) {
        let angle = self.navigator.rotate(op);
        self.show_angle(angle);
    }

    fn show_angle(&mut self, angle: Option<f64>) {
        if let Some(angle) = angle {
            self.status = format!("Rotation {}°", format_angle(angle));
        }
    }

    fn export(&mut self) {
        let dest = self.config.export_file();
        self.status = match self.navigator.export(&dest) {
            Ok(()) => format!(
                "Exported {} rows to {}",
                self.navigator.annotations().len(),
                dest.display()
            ),
            Err(e) => e.to_string(),
        };
    }

    /// Render the current state.
    pub fn draw(&self, frame: &mut Frame) {
        let [header, body, gauge, status, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " imgrot ",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ))),
            header,
        );

        frame.render_widget(
            Paragraph::new(self.detail_lines()).block(Block::bordered().title("Image")),
            body,
        );

        let len = self.navigator.len();
        let (ratio, label) = match self.navigator.focus() {
            Some(focus) => (
                ((focus + 1) as f64 / len as f64).clamp(0.0, 1.0),
                format!("{} / {}", focus + 1, len),
            ),
            None => (0.0, "0 / 0".to_string()),
        };
        frame.render_widget(
            Gauge::default()
                .block(Block::bordered().title("Position"))
                .gauge_style(Style::default().fg(Color::Green))
                .ratio(ratio)
                .label(label),
            gauge,
        );

        frame.render_widget(Paragraph::new(self.status.as_str()), status);
        frame.render_widget(
            Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
            help,
        );
    }

    fn detail_lines(&self) -> Vec<Line<'static>> {
        let path = self.navigator.current_path();
        let (Some(path), Some(slot)) = (path, self.navigator.current_slot()) else {
            return vec![Line::from("No images found")];
        };

        let size = match &slot.image {
            Some(image) => format!("{} x {}", image.width(), image.height()),
            None => "not loaded".to_string(),
        };
        let (resident, bytes) = self
            .navigator
            .session()
            .map(|session| (session.store().resident_count(), session.store().resident_bytes()))
            .unwrap_or((0, 0));

        vec![
            Line::from(format!("File:     {}", path.display())),
            Line::from(format!("Rotation: {}°", format_angle(slot.rotation_angle))),
            Line::from(format!("Size:     {}", size)),
            Line::from(format!(
                "Cached:   {} images ({})",
                resident,
                format_size(bytes, DECIMAL)
            )),
        ]
    }
}

// One decimal is enough for on-screen display.
fn format_angle(angle: f64) -> String {
    let rounded = (angle * 10.0).round() / 10.0;
    rounded.to_string()
}

/// Run the viewer until the user quits.
#[cfg(not(tarpaulin_include))]
pub fn run(mut viewer: Viewer) -> Result<()> {
    let mut app = App::new(Duration::from_millis(100))?;

    loop {
        app.draw(|frame| viewer.draw(frame))?;
        match app.next_event()? {
            Event::Quit => break,
            Event::Key(key) => viewer.handle_key(key),
            Event::Mouse(mouse) => viewer.handle_mouse(mouse),
            Event::Tick => viewer.on_tick(),
            Event::Resize(_, _) => {}
        }
    }

    Ok(())
}
