//! Widgets for the assistant views.

pub mod chat;
pub mod input;
