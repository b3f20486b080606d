use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, oneshot};

use crate::{config::Settings, error::AuthError};

/// Seconds before `expiry` at which a token already counts as invalid.
pub const EXPIRY_DELTA_SECS: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub refresh_token: String,
    pub expiry: DateTime<Utc>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    /// Builds a token from a token endpoint response received at `now`.
    ///
    /// Refresh responses may omit `refresh_token`; `previous_refresh` is kept
    /// in that case.
    pub fn from_response(
        res: TokenResponse,
        previous_refresh: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let refresh_token = res
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default();

        Token {
            access_token: res.access_token,
            token_type: res.token_type.unwrap_or_else(default_token_type),
            refresh_token,
            expiry: now + Duration::seconds(res.expires_in),
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && self.expiry - Duration::seconds(EXPIRY_DELTA_SECS) > now
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn can_refresh(&self) -> bool {
        !self.refresh_token.is_empty()
    }
}

/// Contents of the credential file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub token: Option<Token>,
}

impl Credential {
    pub fn has_valid_token(&self) -> bool {
        !self.client_id.is_empty() && self.token.as_ref().is_some_and(Token::is_valid)
    }

    pub fn access_token(&self) -> &str {
        self.token
            .as_ref()
            .map(|t| t.access_token.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub item: Option<PlayingItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayingItem {
    pub name: String,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

/// What is playing right now, compared by field equality only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub artist: String,
    pub album: String,
    pub title: String,
}

impl NowPlaying {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&PlayingItem> for NowPlaying {
    fn from(item: &PlayingItem) -> Self {
        NowPlaying {
            artist: item
                .artists
                .first()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            album: item
                .album
                .as_ref()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            title: item.name.clone(),
        }
    }
}

impl fmt::Display for NowPlaying {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

/// State shared with the callback handler for one authorization attempt.
///
/// The sender is taken by the first callback that reaches a verdict, so the
/// waiting flow receives exactly one result.
#[derive(Debug)]
pub struct PkceSession {
    pub settings: Settings,
    pub client_id: String,
    pub code_verifier: String,
    pub state: String,
    sender: Mutex<Option<oneshot::Sender<Result<Token, AuthError>>>>,
}

impl PkceSession {
    pub fn new(
        settings: Settings,
        client_id: String,
        code_verifier: String,
        state: String,
    ) -> (Self, oneshot::Receiver<Result<Token, AuthError>>) {
        let (tx, rx) = oneshot::channel();
        let session = Self {
            settings,
            client_id,
            code_verifier,
            state,
            sender: Mutex::new(Some(tx)),
        };
        (session, rx)
    }

    /// Hands `result` to the waiting flow. Returns false if a result was
    /// already delivered.
    pub async fn complete(&self, result: Result<Token, AuthError>) -> bool {
        match self.sender.lock().await.take() {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }

    pub async fn is_complete(&self) -> bool {
        self.sender.lock().await.is_none()
    }
}
