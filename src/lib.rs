//! Spotify currently-playing watcher.
//!
//! Authorizes against Spotify with OAuth 2.0 PKCE, keeps the credential in
//! the user's config directory and prints a line whenever the playing track
//! changes.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local callback listener
//! - `cli` - Command implementations
//! - `config` - Settings, defaults and `.env` loading
//! - `error` - Error types
//! - `management` - Credential file persistence
//! - `poller` - Change detection and the poll loop
//! - `server` - Local HTTP listener for OAuth callbacks
//! - `spotify` - Spotify accounts service and Web API calls
//! - `types` - Data structures
//! - `utils` - PKCE helpers
//!
//! The console macros below write to stderr. Stdout carries only the track
//! lines.
//!
//! # Example
//!
//! ```
//! use spotify_current_playing::{cli, config::{self, Settings}, poller::OutputOptions};
//!
//! config::load_env().await?;
//! let settings = Settings::from_env();
//! cli::watch(settings, OutputOptions { oneshot: true, ..Default::default() }).await;
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod poller;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the command layer, which mixes authorization, file and HTTP
/// errors. Lower layers return the typed errors from [`error`].
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Waiting for {} seconds", secs);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Arguments
///
/// * Format string and arguments, as for `format!`
///
/// # Example
///
/// ```
/// success!("Authentication successful!");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors: the process terminates with exit code 1 right
/// after the message.
///
/// # Example
///
/// ```
/// error!("Authorization failed: {}", e);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems, such as a failed poll, that leave the
/// program running.
///
/// # Example
///
/// ```
/// warning!("Failed to fetch currently playing track: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
