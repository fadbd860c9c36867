//! Application layer: document sessions, windows, and the dialogs they rely on.

pub mod dialogs;
pub mod naming;
pub mod session;
pub mod workspace;
