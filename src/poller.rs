//! Currently-playing poll loop.
//!
//! [`Poller`] asks Spotify what is playing once per interval and prints a
//! line to stdout whenever the track changes. Expired access tokens are
//! refreshed and written back to the credential file; every other failure
//! is logged and the loop keeps going.

use reqwest::Client;
use tokio::time::{self, MissedTickBehavior};

use crate::{
    config::Settings,
    error::ApiError,
    info,
    management::CredentialStore,
    spotify,
    types::{Credential, NowPlaying},
    warning,
};

/// Output switches from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Print JSON objects instead of `Artist - Title`.
    pub json: bool,
    /// Stop after the first printed change.
    pub oneshot: bool,
    /// Log every poll, not just changes.
    pub verbose: bool,
}

/// Remembers the last seen snapshot.
#[derive(Debug, Default)]
pub struct Tracker {
    last: Option<NowPlaying>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `current` and reports whether it differs from the previous
    /// snapshot in artist, album or title. The first snapshot always counts
    /// as a change.
    pub fn observe(&mut self, current: NowPlaying) -> bool {
        let changed = self.last.as_ref() != Some(&current);
        self.last = Some(current);
        changed
    }

    pub fn last(&self) -> Option<&NowPlaying> {
        self.last.as_ref()
    }
}

/// Renders a snapshot the way it is printed on stdout.
pub fn render(now: &NowPlaying, json: bool) -> Result<String, serde_json::Error> {
    if json {
        now.to_json()
    } else {
        Ok(now.to_string())
    }
}

/// Polls the currently playing endpoint and owns the live credential.
pub struct Poller {
    settings: Settings,
    store: CredentialStore,
    credential: Credential,
    client: Client,
    options: OutputOptions,
    tracker: Tracker,
}

impl Poller {
    /// Creates a poller that has not seen any track yet.
    ///
    /// # Arguments
    ///
    /// * `settings` - API base URL, token endpoint and poll interval
    /// * `store` - Where refreshed credentials are written back
    /// * `credential` - Client id and token to start with
    /// * `options` - JSON, one-shot and verbose switches
    ///
    /// # Example
    ///
    /// ```
    /// let store = CredentialStore::new(settings.config_file.clone());
    /// let mut poller = Poller::new(settings, store, credential, OutputOptions::default());
    /// poller.run().await;
    /// ```
    pub fn new(
        settings: Settings,
        store: CredentialStore,
        credential: Credential,
        options: OutputOptions,
    ) -> Self {
        Self {
            settings,
            store,
            credential,
            client: Client::new(),
            options,
            tracker: Tracker::new(),
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn last(&self) -> Option<&NowPlaying> {
        self.tracker.last()
    }

    /// Polls until the process is terminated, or until the first change when
    /// `oneshot` is set. The first poll happens immediately.
    pub async fn run(&mut self) {
        let mut ticker = time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Some(line) = self.tick().await {
                println!("{}", line);
                if self.options.oneshot {
                    break;
                }
            }
        }
    }

    /// Performs one poll and returns the line to print if the track changed.
    ///
    /// Idle and paused players, API errors and an expired token all yield
    /// `None`. An expired token is refreshed before returning, so the next
    /// poll uses the new one. With `verbose` every snapshot is logged, but
    /// the return value is the same.
    pub async fn tick(&mut self) -> Option<String> {
        let result = spotify::player::currently_playing(
            &self.client,
            &self.settings,
            self.credential.access_token(),
        )
        .await;

        match result {
            Ok(Some(current)) => {
                if self.options.verbose {
                    match current.to_json() {
                        Ok(json) => info!("{}", json),
                        Err(e) => warning!("Cannot encode snapshot: {}", e),
                    }
                }

                if !self.tracker.observe(current.clone()) {
                    return None;
                }

                match render(&current, self.options.json) {
                    Ok(line) => Some(line),
                    Err(e) => {
                        warning!("Cannot encode snapshot: {}", e);
                        None
                    }
                }
            }
            Ok(None) => {
                if self.options.verbose {
                    info!("Nothing playing");
                }
                None
            }
            Err(ApiError::TokenExpired) => {
                self.refresh().await;
                None
            }
            Err(e) => {
                warning!("Failed to fetch currently playing track: {}", e);
                None
            }
        }
    }

    async fn refresh(&mut self) {
        let Some(token) = self.credential.token.as_ref() else {
            warning!("Access token expired and no token is stored to refresh");
            return;
        };

        let refreshed = match spotify::auth::refresh_token(
            &self.client,
            &self.settings,
            &self.credential.client_id,
            token,
        )
        .await
        {
            Ok(t) => t,
            Err(e) => {
                warning!("Failed to refresh access token: {}", e);
                return;
            }
        };

        self.credential.token = Some(refreshed);
        if let Err(e) = self.store.persist(&self.credential).await {
            warning!(
                "Failed to save refreshed token to {}: {}",
                self.store.path().display(),
                e
            );
        } else if self.options.verbose {
            info!("Access token refreshed");
        }
    }
}
