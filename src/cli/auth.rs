use reqwest::Client;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::{
    Res,
    config::Settings,
    error::AuthError,
    info,
    management::CredentialStore,
    spotify, success,
    types::{Credential, Token},
    warning,
};

/// `auth` subcommand: runs the authorization flow even if a valid token is
/// stored, then saves the new credential.
pub async fn auth(settings: &Settings) -> Res<()> {
    let store = CredentialStore::new(settings.config_file.clone());
    let stored = store.load_or_default().await;

    let client_id = resolve_client_id(&stored, settings).await?;
    authorize_and_persist(settings, &store, client_id).await?;

    success!("Authentication successful!");
    Ok(())
}

/// Outcome of inspecting the credential file at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredCredential {
    /// Holds a token that can be used right away, either as stored or
    /// freshly refreshed and saved.
    Ready(Credential),
    /// No usable token. Carries whatever was stored so a known client id
    /// is reused by the authorization.
    NeedsAuthorization(Credential),
}

/// Returns a credential holding a usable token.
///
/// Consults [`check_stored_credential`] and, when it reports
/// [`StoredCredential::NeedsAuthorization`], runs the browser authorization
/// and saves the result.
///
/// # Arguments
///
/// * `settings` - Endpoints, redirect URI and the optional client id override
/// * `store` - Location of the credential file
///
/// # Errors
///
/// Fails when the authorization flow fails (state mismatch, denial, token
/// exchange error, canceled client id prompt) or the new credential cannot
/// be written. The caller treats this as fatal.
pub async fn ensure_credential(settings: &Settings, store: &CredentialStore) -> Res<Credential> {
    let stored = match check_stored_credential(settings, store).await {
        StoredCredential::Ready(credential) => return Ok(credential),
        StoredCredential::NeedsAuthorization(stored) => stored,
    };

    let client_id = resolve_client_id(&stored, settings).await?;
    let credential = authorize_and_persist(settings, store, client_id).await?;
    success!("Authentication successful!");
    Ok(credential)
}

/// Decides whether the stored credential can be used without a browser.
///
/// - a valid token with a client id is returned untouched, the file is not
///   rewritten
/// - an expired token with a refresh token and a client id is refreshed and
///   the result persisted
/// - anything else, including a missing or corrupt file and a failed
///   refresh, needs authorization
///
/// Never fails: unreadable files and refresh errors are logged as warnings.
pub async fn check_stored_credential(
    settings: &Settings,
    store: &CredentialStore,
) -> StoredCredential {
    let stored = match store.load().await {
        Ok(credential) => credential,
        Err(e) => {
            if async_fs::metadata(store.path()).await.is_ok() {
                warning!(
                    "Ignoring unreadable credential file {}: {}",
                    store.path().display(),
                    e
                );
            }
            Credential::default()
        }
    };

    if stored.has_valid_token() {
        return StoredCredential::Ready(stored);
    }

    match try_refresh(settings, store, &stored).await {
        Some(credential) => StoredCredential::Ready(credential),
        None => StoredCredential::NeedsAuthorization(stored),
    }
}

async fn try_refresh(
    settings: &Settings,
    store: &CredentialStore,
    stored: &Credential,
) -> Option<Credential> {
    let token = stored.token.as_ref().filter(|t| t.can_refresh())?;
    if stored.client_id.is_empty() {
        return None;
    }

    let client = Client::new();
    match spotify::auth::refresh_token(&client, settings, &stored.client_id, token).await {
        Ok(token) => {
            let credential = Credential {
                client_id: stored.client_id.clone(),
                token: Some(token),
            };
            if let Err(e) = store.persist(&credential).await {
                warning!("Failed to save refreshed token: {}", e);
            }
            Some(credential)
        }
        Err(e) => {
            warning!("Stored token could not be refreshed, authorizing again: {}", e);
            None
        }
    }
}

async fn authorize_and_persist(
    settings: &Settings,
    store: &CredentialStore,
    client_id: String,
) -> Res<Credential> {
    let token: Token = spotify::auth::authorize(settings, &client_id).await?;
    let credential = Credential {
        client_id,
        token: Some(token),
    };

    store.persist(&credential).await.map_err(|e| {
        format!(
            "Failed to save credential to {}: {}",
            store.path().display(),
            e
        )
    })?;

    Ok(credential)
}

/// Stored client id first, then `SPOTIFY_API_AUTH_CLIENT_ID`, then an
/// interactive prompt.
async fn resolve_client_id(stored: &Credential, settings: &Settings) -> Result<String, AuthError> {
    if !stored.client_id.is_empty() {
        return Ok(stored.client_id.clone());
    }
    if let Some(id) = settings.client_id.as_ref().filter(|id| !id.is_empty()) {
        return Ok(id.clone());
    }

    info!(
        "No client id stored. Create an app at https://developer.spotify.com/dashboard with redirect URI {}",
        settings.redirect_uri
    );
    prompt_client_id().await
}

async fn prompt_client_id() -> Result<String, AuthError> {
    let mut stderr = io::stderr();
    stderr.write_all(b"ClientID: ").await?;
    stderr.flush().await?;

    let mut line = String::new();
    let read = BufReader::new(io::stdin()).read_line(&mut line).await?;
    let client_id = line.trim();
    if read == 0 || client_id.is_empty() {
        return Err(AuthError::Canceled);
    }

    Ok(client_id.to_string())
}
