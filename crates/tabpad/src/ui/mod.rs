//! Terminal front end: the host surface for sessions and dialogs.

pub mod app;
pub mod components;
pub mod dialogs;
