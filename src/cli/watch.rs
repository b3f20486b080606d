use crate::{
    cli::ensure_credential,
    config::Settings,
    error,
    management::CredentialStore,
    poller::{OutputOptions, Poller},
};

/// Default command: make sure a token is available, then poll forever (or
/// once, with `--oneshot`).
pub async fn watch(settings: Settings, options: OutputOptions) {
    let store = CredentialStore::new(settings.config_file.clone());

    let credential = match ensure_credential(&settings, &store).await {
        Ok(c) => c,
        Err(e) => error!("Authorization failed: {}", e),
    };

    Poller::new(settings, store, credential, options).run().await;
}
