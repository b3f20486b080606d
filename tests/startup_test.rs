mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{MockSpotify, token_body};
use spotify_current_playing::{
    cli::{StoredCredential, check_stored_credential},
    config::Settings,
    management::CredentialStore,
    types::{Credential, Token},
};
use tempfile::TempDir;

fn token(access: &str, refresh: &str, expires_in_secs: i64) -> Token {
    Token {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: refresh.to_string(),
        expiry: Utc::now() + chrono::Duration::seconds(expires_in_secs),
    }
}

fn setup(mock: &MockSpotify, dir: &TempDir) -> (Settings, CredentialStore) {
    let mut settings = mock.settings();
    settings.config_file = dir.path().join("config.json");
    let store = CredentialStore::new(settings.config_file.clone());
    (settings, store)
}

#[tokio::test]
async fn test_valid_credential_is_used_as_stored() {
    let mock = MockSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let (settings, store) = setup(&mock, &dir);

    let credential = Credential {
        client_id: "client-id".to_string(),
        token: Some(token("a1", "r1", 3600)),
    };
    // compact on purpose: a rewrite would come out pretty-printed
    let raw = serde_json::to_string(&credential).unwrap();
    std::fs::write(store.path(), &raw).unwrap();

    let outcome = check_stored_credential(&settings, &store).await;

    assert_eq!(outcome, StoredCredential::Ready(credential));
    assert!(mock.state.token_requests().is_empty());
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), raw);
}

#[tokio::test]
async fn test_expired_credential_is_refreshed_and_persisted() {
    let mock = MockSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let (settings, store) = setup(&mock, &dir);

    store
        .persist(&Credential {
            client_id: "client-id".to_string(),
            token: Some(token("a1", "r1", -60)),
        })
        .await
        .unwrap();
    mock.state.push_token(StatusCode::OK, token_body("new", None));

    let StoredCredential::Ready(credential) = check_stored_credential(&settings, &store).await
    else {
        panic!("expired credential with a refresh token should be refreshed");
    };

    let token = credential.token.clone().unwrap();
    assert_eq!(credential.client_id, "client-id");
    assert_eq!(token.access_token, "new");
    // the reply carried no refresh token, the old one is kept
    assert_eq!(token.refresh_token, "r1");
    assert!(token.is_valid());

    let requests = mock.state.token_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["grant_type"], "refresh_token");
    assert_eq!(requests[0]["refresh_token"], "r1");
    assert_eq!(requests[0]["client_id"], "client-id");

    assert_eq!(store.load().await.unwrap(), credential);
}

#[tokio::test]
async fn test_failed_refresh_needs_authorization() {
    let mock = MockSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let (settings, store) = setup(&mock, &dir);

    let stored = Credential {
        client_id: "client-id".to_string(),
        token: Some(token("a1", "r1", -60)),
    };
    store.persist(&stored).await.unwrap();
    mock.state.push_token(
        StatusCode::BAD_REQUEST,
        r#"{"error":"invalid_grant","error_description":"Refresh token revoked"}"#,
    );

    let outcome = check_stored_credential(&settings, &store).await;

    // the stored client id travels on to the authorization
    assert_eq!(outcome, StoredCredential::NeedsAuthorization(stored.clone()));
    assert_eq!(mock.state.token_requests().len(), 1);
    assert_eq!(store.load().await.unwrap(), stored);
}

#[tokio::test]
async fn test_corrupt_file_needs_authorization() {
    let mock = MockSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let (settings, store) = setup(&mock, &dir);
    std::fs::write(store.path(), "{ \"client_id\": ").unwrap();

    let outcome = check_stored_credential(&settings, &store).await;

    assert_eq!(
        outcome,
        StoredCredential::NeedsAuthorization(Credential::default())
    );
    assert!(mock.state.token_requests().is_empty());
}

#[tokio::test]
async fn test_missing_file_needs_authorization() {
    let mock = MockSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let (settings, store) = setup(&mock, &dir);

    let outcome = check_stored_credential(&settings, &store).await;

    assert_eq!(
        outcome,
        StoredCredential::NeedsAuthorization(Credential::default())
    );
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_empty_client_id_is_never_used_or_refreshed() {
    let mock = MockSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let (settings, store) = setup(&mock, &dir);

    let valid = Credential {
        client_id: String::new(),
        token: Some(token("a1", "r1", 3600)),
    };
    store.persist(&valid).await.unwrap();
    assert_eq!(
        check_stored_credential(&settings, &store).await,
        StoredCredential::NeedsAuthorization(valid)
    );

    let expired = Credential {
        client_id: String::new(),
        token: Some(token("a1", "r1", -60)),
    };
    store.persist(&expired).await.unwrap();
    mock.state.push_token(StatusCode::OK, token_body("new", None));
    assert_eq!(
        check_stored_credential(&settings, &store).await,
        StoredCredential::NeedsAuthorization(expired)
    );

    assert!(mock.state.token_requests().is_empty());
}

#[tokio::test]
async fn test_expired_credential_without_refresh_token_needs_authorization() {
    let mock = MockSpotify::start().await;
    let dir = TempDir::new().unwrap();
    let (settings, store) = setup(&mock, &dir);

    let stored = Credential {
        client_id: "client-id".to_string(),
        token: Some(token("a1", "", -60)),
    };
    store.persist(&stored).await.unwrap();

    assert_eq!(
        check_stored_credential(&settings, &store).await,
        StoredCredential::NeedsAuthorization(stored)
    );
    assert!(mock.state.token_requests().is_empty());
}
