//! # CLI Module
//!
//! User-facing commands. Each one receives the [`Settings`](crate::config::Settings)
//! built in `main` and delegates to the authorization flow, the credential
//! store and the poller.
//!
//! - [`watch`] - default command; loads or obtains a token and prints every
//!   track change
//! - [`auth`] - forces a fresh browser authorization and stores the result
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotify-current-playing                     # Artist - Title per change
//! spotify-current-playing --json --oneshot    # one JSON line, then exit
//! spotify-current-playing auth                # authorize again
//! ```
//!
//! Everything except the track lines goes to stderr, so stdout can be piped
//! into status bars and scripts.

mod auth;
mod watch;

pub use auth::auth;
pub use auth::StoredCredential;
pub use auth::check_stored_credential;
pub use auth::ensure_credential;
pub use watch::watch;
