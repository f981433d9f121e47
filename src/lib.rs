//! Spopify library
//!
//! Genre enrichment and duplicate cleanup for Spotify playlists. Tracks are
//! tagged with normalized main genres gathered from Spotify, a curated local
//! list and Last.fm; duplicates are found and removed by position.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the local server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `dedup` - Duplicate detection and removal planning
//! - `enrichment` - Genre normalization and the enrichment pipeline
//! - `error` - Error types shared across modules
//! - `lastfm` - Last.fm tag source
//! - `management` - Token, fallback genre and user tag persistence
//! - `playlist` - Playlist provider seam and playlist creation
//! - `server` - Router and state of the local HTTP server
//! - `spotify` - Spotify Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod enrichment;
pub mod error;
pub mod lastfm;
pub mod management;
pub mod playlist;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the binary entry points where any error ends the command.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a status line with a blue `o`. Takes `println!` arguments.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a completion line with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red error line to stderr and exits with status 1.
///
/// Only for the command entry points. Library code returns errors instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow warning line to stderr. Degraded lookups and skipped
/// items are reported this way.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
