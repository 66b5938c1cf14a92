//! Library half of the `homeboard` admin CLI.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;
pub mod summary;
