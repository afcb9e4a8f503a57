//! Input adapters that turn external requests into render configurations.

pub mod cli;
