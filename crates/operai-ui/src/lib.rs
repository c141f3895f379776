//! Terminal rendering for the OperAI command assistant.
//!
//! The crate is organized into:
//! - `widgets` - ratatui widgets for the conversation and the command line
//! - `theme` - Colors, styles, and visual constants
//! - `utils` - Text wrapping, formatting utilities
//!
//! Widgets take `operai_core` types directly and never talk to the network.

pub mod theme;
pub mod utils;
pub mod widgets;

pub use theme::Theme;
pub use widgets::chat::{action_lines, message_lines, ChatWidget};
pub use widgets::input::InputWidget;
