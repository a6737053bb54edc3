//! CLI module for the interval timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Argument definitions using clap derive
//! - `display`: Usage, summary, and error output

pub mod commands;
pub mod display;

pub use commands::{Cli, PauseArg};
pub use display::Display;
