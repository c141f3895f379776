//! Main render function for the TUI.

use chrono::Utc;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use operai_ui::utils::truncate;
use operai_ui::{ChatWidget, InputWidget, Theme};

use crate::event::ServerStatus;
use crate::state::UiState;

/// Render the entire UI.
///
/// Takes the state mutably only to record how far the chat can scroll.
pub fn render(frame: &mut Frame, state: &mut UiState) {
    let area = frame.area();
    let theme = Theme::default();

    // Create main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area, state, &theme);

    let now = Utc::now();
    let pending = state.pending_label(now);
    state.chat_max_scroll = ChatWidget::new(state.session.messages())
        .pending(pending.as_deref())
        .scroll(state.scroll_offset())
        .theme(theme.clone())
        .render(frame, chat_area);

    InputWidget::new(&state.input, state.cursor_byte())
        .busy(state.session.is_busy())
        .theme(theme.clone())
        .render(frame, input_area);

    render_footer(frame, footer_area, state, &theme);
}

/// Render the header with server, mode and session.
fn render_header(frame: &mut Frame, area: Rect, state: &UiState, theme: &Theme) {
    let (status_text, status_style) = match &state.server_status {
        ServerStatus::Checking => ("checking".to_string(), theme.muted_style()),
        ServerStatus::Reachable => ("connected".to_string(), theme.success_style()),
        ServerStatus::Unreachable(reason) => (
            format!("unreachable ({})", truncate(reason, 40)),
            theme.error_style(),
        ),
    };

    let line = Line::from(vec![
        Span::styled("● ", status_style),
        Span::raw(truncate(&state.server_url, 40)),
        Span::styled(format!(" {}", status_text), status_style),
        Span::styled("  │  mode: ", theme.muted_style()),
        Span::raw(state.mode.name()),
        Span::styled("  │  session: ", theme.muted_style()),
        Span::raw(state.session.session_id().short().to_string()),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" OperAI Assistant ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    );

    frame.render_widget(header, area);
}

/// Render the footer with the active notice or key help.
fn render_footer(frame: &mut Frame, area: Rect, state: &UiState, theme: &Theme) {
    let footer = match state.active_notice(Utc::now()) {
        Some(notice) => Line::from(Span::styled(
            format!(" {} ", notice),
            theme.error_style().add_modifier(Modifier::BOLD),
        )),
        None => {
            let follow = if state.chat_scroll.is_none() {
                Span::styled("following", theme.success_style())
            } else {
                Span::styled("scrolled", theme.warning_style())
            };
            Line::from(vec![
                Span::raw(" "),
                follow,
                Span::raw(" | "),
                Span::styled(
                    "Enter: send | ↑/↓ PgUp/PgDn: scroll | Ctrl+End: latest | Ctrl+R: recheck | Esc: quit",
                    theme.muted_style(),
                ),
            ])
        }
    };

    frame.render_widget(Paragraph::new(footer), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use operai_client::AssistantMode;
    use operai_core::{AssistantReply, ChatSession, SessionId};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(state: &mut UiState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn state() -> UiState {
        let session = ChatSession::with_id(SessionId::new("session_0123456789abcdef"));
        UiState::new(session, "http://localhost:8001", AssistantMode::Execute)
    }

    #[test]
    fn test_layout_shows_header_input_and_help() {
        let mut state = state();
        let out = screen(&mut state, 120, 20);

        assert!(out.contains("OperAI Assistant"));
        assert!(out.contains("http://localhost:8001"));
        assert!(out.contains("mode: actions"));
        assert!(out.contains("session: 01234567"));
        assert!(out.contains("Command"));
        assert!(out.contains("Esc: quit"));
    }

    #[test]
    fn test_pending_command_and_notice() {
        let mut state = state();
        state.session.submit("approve Ana's leave").unwrap();

        let out = screen(&mut state, 120, 20);
        assert!(out.contains("Processing your request..."));
        assert!(out.contains("waiting for reply"));

        state
            .session
            .resolve(Err::<AssistantReply, _>("timed out"))
            .unwrap();
        state.raise_notice("Failed to get AI response");

        let out = screen(&mut state, 120, 20);
        assert!(out.contains("Failed to get AI response"));
        assert!(out.contains("Sorry, I encountered an error. Please try again."));
        assert!(!out.contains("Processing your request..."));
    }

    #[test]
    fn test_render_records_max_scroll() {
        let mut state = state();
        for i in 0..20 {
            state.session.submit(&format!("command {}", i)).unwrap();
            state
                .session
                .resolve::<String>(Ok(AssistantReply::plain("ok")))
                .unwrap();
        }

        screen(&mut state, 80, 20);
        // 40 messages x 3 lines, 11 visible chat rows.
        assert_eq!(state.chat_max_scroll, 120 - 11);
    }
}
