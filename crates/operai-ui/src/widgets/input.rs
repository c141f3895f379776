//! Single-line command input.

use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::theme::Theme;
use crate::utils::display_width;

/// Command line with a cursor.
///
/// Text wider than the box scrolls horizontally so the cursor stays
/// visible.
#[derive(Debug, Clone)]
pub struct InputWidget<'a> {
    text: &'a str,
    /// Cursor as a byte offset into `text`.
    cursor: usize,
    busy: bool,
    theme: Theme,
}

impl<'a> InputWidget<'a> {
    pub fn new(text: &'a str, cursor: usize) -> Self {
        Self {
            text,
            cursor: cursor.min(text.len()),
            busy: false,
            theme: Theme::default(),
        }
    }

    /// Mark a command as outstanding; the title says so and the border
    /// dims until the reply arrives.
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2) as usize;

        let (title, title_style) = if self.busy {
            (" Command (waiting for reply) ", self.theme.warning_style())
        } else {
            (" Command ", self.theme.bold())
        };
        let border_style = self.theme.border(!self.busy);

        let (visible, cursor_col) = visible_window(self.text, self.cursor, inner_width);

        let body = if self.text.is_empty() {
            Line::from(Span::styled(
                "Type a command and press Enter",
                self.theme.muted_style(),
            ))
        } else {
            Line::from(visible.to_string())
        };

        let paragraph = Paragraph::new(body).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(title, title_style)),
        );
        frame.render_widget(paragraph, area);

        if inner_width > 0 {
            frame.set_cursor_position(Position::new(
                area.x + 1 + cursor_col as u16,
                area.y + 1,
            ));
        }
    }
}

/// Slice of `text` to show in `width` columns and the cursor column within
/// it.
fn visible_window(text: &str, cursor: usize, width: usize) -> (&str, usize) {
    if width == 0 {
        return ("", 0);
    }

    let before = display_width(&text[..cursor]);
    // Keep one column free for the cursor itself.
    if before < width {
        return (text, before);
    }

    let mut start = 0;
    let mut skipped = 0;
    for (idx, ch) in text.char_indices() {
        if before - skipped < width {
            break;
        }
        skipped += UnicodeWidthChar::width(ch).unwrap_or(1);
        start = idx + ch.len_utf8();
    }
    (&text[start..], before - skipped)
}
