//! Command-line interface components
//!
//! This module contains CLI-specific code for the Extract Fetcher application,
//! including argument parsing, table output, confirmation prompts and
//! progress display.

pub mod args;
pub mod commands;
pub mod display;
pub mod progress;
pub mod prompt;

pub use args::{Cli, Commands, DownloadArgs, GlobalArgs};
pub use commands::{handle_download, handle_list};
pub use display::render_table;
pub use progress::{DownloadProgress, FileCounts};
pub use prompt::{confirm_download, Confirmation};
