//! Collection of reusable TUI components.

pub mod command_palette;
pub mod editor;
pub mod modal;
pub mod tab_bar;
