//! Core domain types: documents, formatting, and errors.

pub mod errors;
pub mod format;
pub mod model;
