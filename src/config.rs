//! Configuration management for spotify-current-playing.
//!
//! All runtime parameters live in [`Settings`], which is built once in
//! `main` and passed down explicitly. Values are resolved in this order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the config directory
//! 3. Built-in defaults

use std::{env, path::PathBuf, time::Duration};

/// Directory name under the platform config dir.
pub const APP_DIR: &str = "spotify-current-playing";

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:3000/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

pub const DEFAULT_SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-currently-playing",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-library-modify",
    "user-library-read",
];

/// Runtime configuration shared by the authorization flow and the poller.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Authorization endpoint the browser is sent to (`SPOTIFY_API_AUTH_URL`).
    pub auth_url: String,
    /// Token endpoint for code exchange and refresh (`SPOTIFY_API_TOKEN_URL`).
    pub token_url: String,
    /// Web API base URL without trailing slash (`SPOTIFY_API_URL`).
    pub api_url: String,
    /// Redirect URI registered for the app (`SPOTIFY_API_REDIRECT_URI`).
    pub redirect_uri: String,
    /// Address the callback listener binds to. Must agree with `redirect_uri`.
    pub server_address: String,
    /// Space separated OAuth scopes.
    pub scope: String,
    /// Client id from the environment, used when the credential file has none.
    pub client_id: Option<String>,
    /// Location of the credential file. Always `config.json` in [`config_dir`].
    pub config_file: PathBuf,
    /// Delay between two polls (`POLL_INTERVAL_SECS`, default 10 s).
    pub poll_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            scope: DEFAULT_SCOPES.join(" "),
            client_id: None,
            config_file: config_dir().join("config.json"),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Settings {
    /// Builds settings from the process environment on top of the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings using `lookup` to resolve each variable.
    ///
    /// Empty values count as unset. An unparsable or zero
    /// `POLL_INTERVAL_SECS` keeps the default.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the raw value of an environment variable, if any
    ///
    /// # Returns
    ///
    /// The defaults with every set variable applied on top.
    ///
    /// # Example
    ///
    /// ```
    /// let settings = Settings::from_lookup(|key| match key {
    ///     "POLL_INTERVAL_SECS" => Some("5".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(settings.poll_interval, Duration::from_secs(5));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let poll_interval = get("POLL_INTERVAL_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval);

        Self {
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or(defaults.auth_url),
            token_url: get("SPOTIFY_API_TOKEN_URL").unwrap_or(defaults.token_url),
            api_url: get("SPOTIFY_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            redirect_uri: get("SPOTIFY_API_REDIRECT_URI").unwrap_or(defaults.redirect_uri),
            server_address: get("SERVER_ADDRESS").unwrap_or(defaults.server_address),
            scope: get("SPOTIFY_API_AUTH_SCOPE").unwrap_or(defaults.scope),
            client_id: get("SPOTIFY_API_AUTH_CLIENT_ID").map(|id| id.trim().to_string()),
            config_file: defaults.config_file,
            poll_interval,
        }
    }
}

/// Per-user directory holding `config.json` and the optional `.env`.
///
/// - Linux: `~/.config/spotify-current-playing`
/// - macOS: `~/Library/Application Support/spotify-current-playing`
/// - Windows: `%APPDATA%/spotify-current-playing`
pub fn config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Loads environment variables from `.env` in the config directory.
///
/// A missing file is not an error; the defaults and the real environment
/// still apply. Variables already present in the environment win.
pub async fn load_env() -> Result<(), String> {
    let path = config_dir().join(".env");
    if !async_fs::metadata(&path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}
