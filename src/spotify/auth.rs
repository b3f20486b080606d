use std::{sync::Arc, time::Duration};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tokio::{net::TcpListener, sync::oneshot};
use url::Url;

use crate::{
    config::Settings,
    error::AuthError,
    server,
    types::{PkceSession, Token, TokenResponse},
    utils, warning,
};

/// Runs the OAuth 2.0 authorization-code flow with PKCE for `client_id`.
///
/// 1. Generates the code verifier, its S256 challenge and a state value
///    that stays fixed for this attempt
/// 2. Binds the callback listener on `settings.server_address`
/// 3. Opens the authorization URL in the default browser
/// 4. Waits for the callback handler to hand over the exchanged token
/// 5. Shuts the listener down
///
/// Browser launch failures only print the URL so it can be opened by hand.
///
/// # Arguments
///
/// * `settings` - Endpoints, redirect URI, scopes and listener address
/// * `client_id` - Spotify application id the token is issued to
///
/// # Returns
///
/// The token obtained through the callback, with its expiry computed from
/// `expires_in`.
///
/// # Errors
///
/// Binding the listener or building the URL can fail up front. Afterwards
/// the callback delivers [`AuthError::StateMismatch`], [`AuthError::Denied`]
/// or a failed exchange. [`AuthError::Aborted`] means the listener went away
/// without a result. All of them are meant to be fatal for the caller.
///
/// # Example
///
/// ```
/// let settings = Settings::from_env();
/// let token = authorize(&settings, "0123456789abcdef").await?;
/// println!("expires at {}", token.expiry);
/// ```
pub async fn authorize(settings: &Settings, client_id: &str) -> Result<Token, AuthError> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let state = utils::generate_state();

    let listener = TcpListener::bind(&settings.server_address).await?;

    let auth_url = authorize_url(settings, client_id, &code_challenge, &state)?;

    let (session, token_rx) = PkceSession::new(
        settings.clone(),
        client_id.to_string(),
        code_verifier,
        state,
    );
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let server = tokio::spawn(server::start_api_server(
        listener,
        Arc::new(session),
        shutdown_rx,
    ));

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        );
    }

    let pb = waiting_spinner();
    let result = token_rx.await.unwrap_or(Err(AuthError::Aborted));
    pb.finish_and_clear();

    let _ = shutdown_tx.send(());
    match server.await {
        Ok(Err(e)) => warning!("Callback listener stopped with error: {}", e),
        Err(e) => warning!("Callback listener task failed: {}", e),
        Ok(Ok(())) => {}
    }

    result
}

/// Builds the provider's authorization URL carrying the PKCE challenge.
///
/// # Arguments
///
/// * `settings` - Supplies the base URL, redirect URI and scopes
/// * `client_id` - Spotify application id
/// * `code_challenge` - Base64url S256 digest of the code verifier
/// * `state` - Value the callback must echo back unchanged
///
/// # Returns
///
/// `auth_url` with `client_id`, `response_type=code`, `redirect_uri`,
/// `code_challenge_method=S256`, `code_challenge`, `state` and `scope`
/// appended as query parameters. The verifier itself is never included.
pub fn authorize_url(
    settings: &Settings,
    client_id: &str,
    code_challenge: &str,
    state: &str,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&settings.auth_url)?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", settings.redirect_uri.as_str())
        .append_pair("code_challenge_method", "S256")
        .append_pair("code_challenge", code_challenge)
        .append_pair("state", state)
        .append_pair("scope", &settings.scope);
    Ok(url)
}

/// Exchanges an authorization code and its PKCE verifier for a token.
///
/// # Errors
///
/// [`AuthError::TokenEndpoint`] for a non-2xx reply, carrying status and
/// body. [`AuthError::Http`] for transport and decoding failures.
pub async fn exchange_code_pkce(
    client: &Client,
    settings: &Settings,
    client_id: &str,
    code: &str,
    verifier: &str,
) -> Result<Token, AuthError> {
    let res = request_token(
        client,
        settings,
        &[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", settings.redirect_uri.as_str()),
        ],
    )
    .await?;

    Ok(Token::from_response(res, None, Utc::now()))
}

/// Trades the refresh token of `token` for a fresh access token.
///
/// Spotify may rotate the refresh token; when the response carries none the
/// old one is kept.
///
/// # Errors
///
/// [`AuthError::MissingRefreshToken`] without sending anything when `token`
/// has no refresh token. Otherwise the same errors as
/// [`exchange_code_pkce`].
///
/// # Example
///
/// ```
/// let client = Client::new();
/// let fresh = refresh_token(&client, &settings, &credential.client_id, &old).await?;
/// assert!(fresh.is_valid());
/// ```
pub async fn refresh_token(
    client: &Client,
    settings: &Settings,
    client_id: &str,
    token: &Token,
) -> Result<Token, AuthError> {
    if !token.can_refresh() {
        return Err(AuthError::MissingRefreshToken);
    }

    let res = request_token(
        client,
        settings,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", token.refresh_token.as_str()),
            ("client_id", client_id),
        ],
    )
    .await?;

    Ok(Token::from_response(
        res,
        Some(token.refresh_token.as_str()),
        Utc::now(),
    ))
}

async fn request_token(
    client: &Client,
    settings: &Settings,
    form: &[(&str, &str)],
) -> Result<TokenResponse, AuthError> {
    let response = client.post(&settings.token_url).form(form).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::TokenEndpoint {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json::<TokenResponse>().await?)
}

fn waiting_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message("Waiting for authorization in the browser...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
