//! Boundaries with the outside world: argv, config documents and the terminal.

pub mod args;
pub mod config;
pub mod renderer;
