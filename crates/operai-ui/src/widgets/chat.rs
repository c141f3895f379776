//! Chat widget for displaying the conversation and executed actions.

use operai_core::{ActionResult, ChatMessage, ChatRole, DetailValue};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;
use crate::utils::wrap_text_indented;

const CONTENT_INDENT: &str = "  ";
const DETAIL_INDENT: &str = "    ";
const ITEM_INDENT: &str = "        ";
const ITEM_BULLET: &str = "      • ";

/// Scrollable conversation view.
#[derive(Debug, Clone)]
pub struct ChatWidget<'a> {
    /// Messages to display.
    messages: &'a [ChatMessage],
    /// Indicator shown below the last message while a reply is outstanding.
    pending: Option<&'a str>,
    /// Scroll offset (usize::MAX = auto-scroll to bottom).
    scroll: usize,
    /// Theme for styling.
    theme: Theme,
}

impl<'a> ChatWidget<'a> {
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self {
            messages,
            pending: None,
            scroll: usize::MAX,
            theme: Theme::default(),
        }
    }

    /// Show `label` as an in-progress assistant turn.
    pub fn pending(mut self, label: Option<&'a str>) -> Self {
        self.pending = label;
        self
    }

    /// Set the scroll offset.
    pub fn scroll(mut self, offset: usize) -> Self {
        self.scroll = offset;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Render the widget and return the largest valid scroll offset for
    /// this area, so callers can leave follow mode from the current bottom.
    pub fn render(self, frame: &mut Frame, area: Rect) -> usize {
        let visible_height = area.height.saturating_sub(2) as usize;
        let text_width = area.width.saturating_sub(2) as usize;

        let mut all_lines: Vec<Line<'static>> = Vec::new();

        if self.messages.is_empty() && self.pending.is_none() {
            all_lines.extend(placeholder_lines(&self.theme));
        }

        for msg in self.messages {
            all_lines.extend(message_lines(msg, text_width, &self.theme));
        }

        if let Some(label) = self.pending {
            all_lines.push(Line::from(vec![
                Span::styled("AI: ", self.theme.role_style(ChatRole::Assistant)),
                Span::styled(label.to_string(), self.theme.warning_style()),
            ]));
        }

        let total_lines = all_lines.len();

        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll_offset = if self.scroll == usize::MAX {
            max_scroll
        } else {
            self.scroll.min(max_scroll)
        };

        let lines: Vec<Line> = all_lines
            .into_iter()
            .skip(scroll_offset)
            .take(visible_height)
            .collect();

        let title = if total_lines == 0 {
            " Chat ".to_string()
        } else {
            let first_line = scroll_offset + 1;
            let last_line = (scroll_offset + visible_height).min(total_lines);
            format!(" Chat [{}-{}/{}] ", first_line, last_line, total_lines)
        };

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.border(false))
                .title(title),
        );

        frame.render_widget(paragraph, area);
        max_scroll
    }
}

/// Lines for one message: header, wrapped content, its actions, then a
/// blank separator.
pub fn message_lines(msg: &ChatMessage, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let prefix = match msg.role {
        ChatRole::User => "You: ",
        ChatRole::Assistant => "AI: ",
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(prefix, theme.role_style(msg.role)),
        Span::styled(
            msg.timestamp.format("%H:%M:%S").to_string(),
            theme.muted_style(),
        ),
    ])];

    if !msg.content.is_empty() {
        for wrapped in wrap_text_indented(&msg.content, width, CONTENT_INDENT) {
            lines.push(Line::from(wrapped));
        }
    }

    for action in &msg.actions {
        lines.extend(action_lines(action, width, theme));
    }

    lines.push(Line::from(""));
    lines
}

/// Lines for one executed action: label with badge, error text, then the
/// details listing.
pub fn action_lines(action: &ActionResult, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let status = action.status();
    let mut lines = vec![Line::from(vec![
        Span::raw(CONTENT_INDENT),
        Span::styled(format!("▸ {} ", action.label()), theme.bold()),
        Span::styled(format!(" {} ", status.label()), theme.badge_style(status)),
    ])];

    if let Some(error) = &action.error {
        for wrapped in wrap_text_indented(error, width, DETAIL_INDENT) {
            lines.push(Line::styled(wrapped, theme.error_style()));
        }
    }

    for entry in action.detail_entries() {
        match entry.value {
            DetailValue::Text(text) => {
                let row = format!("{}: {}", entry.key, text);
                let wrapped = wrap_text_indented(&row, width, DETAIL_INDENT);
                let key_prefix = format!("{}{}:", DETAIL_INDENT, entry.key);
                for (i, line) in wrapped.into_iter().enumerate() {
                    if i == 0 && line.starts_with(&key_prefix) {
                        let value = line[key_prefix.len()..].to_string();
                        lines.push(Line::from(vec![
                            Span::styled(key_prefix.clone(), theme.muted_style()),
                            Span::raw(value),
                        ]));
                    } else {
                        lines.push(Line::from(line));
                    }
                }
            }
            DetailValue::List(items) => {
                let mut header = vec![Span::styled(
                    format!("{}{}:", DETAIL_INDENT, entry.key),
                    theme.muted_style(),
                )];
                if items.is_empty() {
                    header.push(Span::styled(" none", theme.muted_style()));
                }
                lines.push(Line::from(header));

                for item in items {
                    for (i, line) in wrap_text_indented(&item, width, ITEM_INDENT)
                        .into_iter()
                        .enumerate()
                    {
                        if i == 0 {
                            let body = line[ITEM_INDENT.len()..].to_string();
                            lines.push(Line::from(format!("{}{}", ITEM_BULLET, body)));
                        } else {
                            lines.push(Line::from(line));
                        }
                    }
                }
            }
        }
    }

    lines
}

fn placeholder_lines(theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::styled("  Start a conversation with the AI assistant", theme.bold()),
        Line::from(""),
        Line::styled(
            "  Ask it to create tasks, apply for or approve leave, mark attendance,",
            theme.muted_style(),
        ),
        Line::styled(
            "  or summarize reports. Executed actions are listed under each reply.",
            theme.muted_style(),
        ),
    ]
}
