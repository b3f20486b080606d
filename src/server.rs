use std::{io, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::oneshot};

use crate::{api, types::PkceSession};

pub fn router(session: Arc<PkceSession>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(session)))
}

/// Serves the callback endpoints on `listener` until `shutdown` fires or its
/// sender is dropped.
pub async fn start_api_server(
    listener: TcpListener,
    session: Arc<PkceSession>,
    shutdown: oneshot::Receiver<()>,
) -> io::Result<()> {
    axum::serve(listener, router(session))
        .with_graceful_shutdown(async {
            let _ = shutdown.await;
        })
        .await
}
