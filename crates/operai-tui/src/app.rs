//! Application state and main event loop.

use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use operai_core::Resolution;

use crate::event::{BackendCommand, ServerStatus, UiEvent};
use crate::state::UiState;
use crate::ui;

/// Lines moved by PageUp/PageDown.
const PAGE_LINES: usize = 10;

/// Main application with UI state and channel handles.
pub struct App {
    /// Current UI state snapshot for rendering.
    state: UiState,

    /// Receiver for events from the backend.
    ui_rx: mpsc::Receiver<UiEvent>,

    /// Sender for commands to the backend.
    cmd_tx: mpsc::Sender<BackendCommand>,
}

impl App {
    pub fn new(
        state: UiState,
        ui_rx: mpsc::Receiver<UiEvent>,
        cmd_tx: mpsc::Sender<BackendCommand>,
    ) -> Self {
        Self {
            state,
            ui_rx,
            cmd_tx,
        }
    }

    /// Run the main event loop.
    ///
    /// This runs on the main thread and handles:
    /// - Drawing the UI
    /// - Processing keyboard input
    /// - Receiving replies from the backend
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> std::io::Result<()> {
        loop {
            terminal.draw(|frame| ui::render(frame, &mut self.state))?;

            // Poll terminal events (non-blocking with short timeout)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            // Process backend events (non-blocking)
            while let Ok(event) = self.ui_rx.try_recv() {
                self.apply_event(event);
            }

            if self.state.should_quit {
                break;
            }
        }

        // Send quit command to backend
        let _ = self.cmd_tx.blocking_send(BackendCommand::Quit);

        Ok(())
    }

    /// Apply an event from the backend to the UI state.
    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::ReplyReceived(outcome) => match self.state.session.resolve(outcome) {
                Ok(Resolution::Replied { actions, failed }) => {
                    info!(actions, failed, "Reply received");
                }
                Ok(Resolution::Failed { notice, cause }) => {
                    warn!(error = %cause, "Command failed");
                    self.state.raise_notice(notice);
                }
                Err(e) => {
                    warn!(error = %e, "Dropping reply with no command outstanding");
                }
            },
            UiEvent::ServerStatusChanged(status) => {
                if let ServerStatus::Unreachable(reason) = &status {
                    debug!(reason = %reason, "Server unreachable");
                }
                self.state.server_status = status;
            }
        }
    }

    /// Handle a key press.
    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.state.should_quit = true,
            KeyCode::Char('c') | KeyCode::Char('d') if ctrl => self.state.should_quit = true,

            // Clear the command line
            KeyCode::Char('u') if ctrl => self.state.clear_input(),

            // Recheck the server
            KeyCode::Char('r') if ctrl => {
                self.state.server_status = ServerStatus::Checking;
                let _ = self.cmd_tx.blocking_send(BackendCommand::CheckServer);
            }

            KeyCode::Enter => self.submit(),

            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => self.state.insert_char(c),
            KeyCode::Backspace => self.state.delete_before_cursor(),
            KeyCode::Delete => self.state.delete_at_cursor(),
            KeyCode::Left => self.state.move_cursor_left(),
            KeyCode::Right => self.state.move_cursor_right(),
            KeyCode::Home if ctrl => self.state.scroll_to_top(),
            KeyCode::End if ctrl => self.state.follow(),
            KeyCode::Home => self.state.move_cursor_home(),
            KeyCode::End => self.state.move_cursor_end(),

            KeyCode::Up => self.state.scroll_up(1),
            KeyCode::Down => self.state.scroll_down(1),
            KeyCode::PageUp => self.state.scroll_up(PAGE_LINES),
            KeyCode::PageDown => self.state.scroll_down(PAGE_LINES),

            _ => {}
        }
    }

    /// Submit the command line.
    ///
    /// Empty input or input while a command is outstanding is ignored and
    /// the line is left as typed.
    fn submit(&mut self) {
        let request = match self.state.session.submit(&self.state.input) {
            Ok(request) => request,
            Err(reason) => {
                debug!(reason = %reason, "Command not submitted");
                return;
            }
        };

        info!(session_id = %request.session_id, "Submitting command");
        self.state.clear_input();
        self.state.follow();

        if let Err(e) = self.cmd_tx.blocking_send(BackendCommand::Execute(request)) {
            // The backend is gone; settle the command here so the session
            // does not stay busy.
            self.apply_event(UiEvent::ReplyReceived(Err(format!(
                "backend unavailable: {}",
                e
            ))));
        }
    }
}
