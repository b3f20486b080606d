use std::io;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Failures of the PKCE authorization flow and the token endpoint.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("state mismatch on callback: expected {expected:?}, received {received:?}")]
    StateMismatch { expected: String, received: String },

    #[error("authorization denied: {0}")]
    Denied(String),

    #[error("token endpoint returned {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("callback listener failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid authorization url: {0}")]
    Url(#[from] url::ParseError),

    #[error("no refresh token stored")]
    MissingRefreshToken,

    #[error("authorization flow ended before a token was received")]
    Aborted,

    #[error("canceled")]
    Canceled,
}

/// Failures of Web API requests made while polling.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("the access token expired")]
    TokenExpired,

    #[error("spotify returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

impl ApiError {
    /// Classifies a non-success Web API response.
    ///
    /// Spotify reports an expired bearer token as a 401 whose message
    /// mentions expiry; that case maps to [`ApiError::TokenExpired`].
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        if status == StatusCode::UNAUTHORIZED && message.to_lowercase().contains("expired") {
            return ApiError::TokenExpired;
        }

        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

/// Failures reading or writing the credential file.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential file i/o: {0}")]
    Io(#[from] io::Error),

    #[error("credential file is not valid json: {0}")]
    Serde(#[from] serde_json::Error),
}
