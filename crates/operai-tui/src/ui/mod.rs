//! Rendering of the interactive view.

mod render;

pub use render::render;
