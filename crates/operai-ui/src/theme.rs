//! Colors and the styles the assistant views derive from them.

use operai_core::{ActionStatus, ChatRole};
use ratatui::style::{Color, Modifier, Style};

/// Colors used by the assistant views.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Border of the command line while it accepts input
    pub accent: Color,
    /// Succeeded actions, connected server
    pub success: Color,
    /// Outstanding request indicator
    pub warning: Color,
    /// Failed actions, notices
    pub error: Color,
    /// Timestamps, detail keys, hints, idle borders
    pub muted: Color,
    /// Operator messages
    pub user: Color,
    /// Assistant messages
    pub assistant: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Yellow,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::DarkGray,
            user: Color::Cyan,
            assistant: Color::Magenta,
        }
    }
}

impl Theme {
    /// Border of a box; `active` boxes take keyboard input right now.
    pub fn border(&self, active: bool) -> Style {
        Style::default().fg(if active { self.accent } else { self.muted })
    }

    /// Speaker prefix of a message.
    pub fn role_style(&self, role: ChatRole) -> Style {
        let color = match role {
            ChatRole::User => self.user,
            ChatRole::Assistant => self.assistant,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Reverse-video badge for an action outcome.
    pub fn badge_style(&self, status: ActionStatus) -> Style {
        let color = match status {
            ActionStatus::Success => self.success,
            ActionStatus::Failed => self.error,
        };
        Style::default()
            .fg(Color::Black)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn bold(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }
}
