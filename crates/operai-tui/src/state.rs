//! UI state for rendering.

use chrono::{DateTime, Duration, Utc};

use operai_client::AssistantMode;
use operai_core::{ChatSession, SessionState};
use operai_ui::utils::format_duration;

use crate::event::ServerStatus;

/// How long a notice stays in the footer.
const NOTICE_TTL_SECS: i64 = 5;

/// A transient message shown in the footer.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub until: DateTime<Utc>,
}

/// Everything the interactive view renders from.
pub struct UiState {
    /// The conversation. Its busy flag is the only in-flight guard.
    pub session: ChatSession,

    /// Command being edited.
    pub input: String,

    /// Cursor position in `input`, in chars.
    pub input_cursor: usize,

    /// First visible chat line, or `None` to follow the newest message.
    pub chat_scroll: Option<usize>,

    /// Bottom-most scroll offset as of the last render.
    pub chat_max_scroll: usize,

    /// Footer notice, if one was raised recently.
    pub notice: Option<Notice>,

    pub server_status: ServerStatus,

    /// Server root, for the header.
    pub server_url: String,

    pub mode: AssistantMode,

    pub should_quit: bool,
}

impl UiState {
    pub fn new(session: ChatSession, server_url: impl Into<String>, mode: AssistantMode) -> Self {
        Self {
            session,
            input: String::new(),
            input_cursor: 0,
            chat_scroll: None,
            chat_max_scroll: 0,
            notice: None,
            server_status: ServerStatus::default(),
            server_url: server_url.into(),
            mode,
            should_quit: false,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.cursor_byte();
        self.input.insert(byte_idx, c);
        self.input_cursor += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        self.input_cursor -= 1;
        let byte_idx = self.cursor_byte();
        self.input.remove(byte_idx);
    }

    pub fn delete_at_cursor(&mut self) {
        if self.input_cursor < self.input.chars().count() {
            let byte_idx = self.cursor_byte();
            self.input.remove(byte_idx);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.input_cursor < self.input.chars().count() {
            self.input_cursor += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.input_cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.input_cursor = self.input.chars().count();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
    }

    /// Byte offset of the cursor in `input`.
    pub fn cursor_byte(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.input_cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    /// Scroll towards older messages, leaving follow mode.
    pub fn scroll_up(&mut self, lines: usize) {
        let current = self.chat_scroll.unwrap_or(self.chat_max_scroll);
        self.chat_scroll = Some(current.saturating_sub(lines));
    }

    /// Scroll towards newer messages. Reaching the bottom resumes follow
    /// mode.
    pub fn scroll_down(&mut self, lines: usize) {
        if let Some(current) = self.chat_scroll {
            let next = current.saturating_add(lines);
            self.chat_scroll = if next >= self.chat_max_scroll {
                None
            } else {
                Some(next)
            };
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.chat_scroll = Some(0);
    }

    pub fn follow(&mut self) {
        self.chat_scroll = None;
    }

    /// Offset handed to the chat widget.
    pub fn scroll_offset(&self) -> usize {
        self.chat_scroll.unwrap_or(usize::MAX)
    }

    pub fn raise_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            until: Utc::now() + Duration::seconds(NOTICE_TTL_SECS),
        });
    }

    /// Notice text if it has not expired at `now`.
    pub fn active_notice(&self, now: DateTime<Utc>) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|notice| notice.until > now)
            .map(|notice| notice.text.as_str())
    }

    /// Indicator for the outstanding command, with its elapsed time.
    pub fn pending_label(&self, now: DateTime<Utc>) -> Option<String> {
        match self.session.state() {
            SessionState::Idle => None,
            SessionState::Sending { since } => Some(format!(
                "Processing your request... {}",
                format_duration((now - since).num_seconds())
            )),
        }
    }
}
