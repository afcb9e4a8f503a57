//! Command-line input adapter.

pub mod args;
pub mod commands;
