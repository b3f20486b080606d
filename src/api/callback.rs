use std::sync::Arc;

use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use reqwest::Client;
use serde::Deserialize;

use crate::{error::AuthError, spotify, types::PkceSession, warning};

const CLOSE_WINDOW: &str = "<h2>Authentication successful.</h2>\
<script>window.open(\"about:blank\",\"_self\").close();</script>";

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Redirect target of the authorization server.
///
/// The state is checked first, before a provider `error` is honoured or any
/// exchange is attempted, so a forged request always ends as a state
/// mismatch. A request with the right state but no code leaves the flow
/// waiting. Every other outcome is handed to the waiting flow exactly once.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(session): Extension<Arc<PkceSession>>,
) -> (StatusCode, Html<&'static str>) {
    if session.is_complete().await {
        return (
            StatusCode::GONE,
            Html("<h4>Authorization already finished.</h4>"),
        );
    }

    let received = params.state.unwrap_or_default();
    if received != session.state {
        session
            .complete(Err(AuthError::StateMismatch {
                expected: session.state.clone(),
                received,
            }))
            .await;
        return (StatusCode::FORBIDDEN, Html("<h4>State mismatch.</h4>"));
    }

    if let Some(reason) = params.error {
        session.complete(Err(AuthError::Denied(reason))).await;
        return (StatusCode::FORBIDDEN, Html("<h4>Login failed.</h4>"));
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return (StatusCode::BAD_REQUEST, Html("Missing Parameters!"));
    };

    let client = Client::new();
    match spotify::auth::exchange_code_pkce(
        &client,
        &session.settings,
        &session.client_id,
        &code,
        &session.code_verifier,
    )
    .await
    {
        Ok(token) => {
            session.complete(Ok(token)).await;
            (StatusCode::OK, Html(CLOSE_WINDOW))
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            session.complete(Err(e)).await;
            (StatusCode::FORBIDDEN, Html("<h4>Couldn't get token.</h4>"))
        }
    }
}
