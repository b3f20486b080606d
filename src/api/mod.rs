//! # API Module
//!
//! HTTP endpoints served by the short-lived local listener that exists only
//! while an authorization is in progress.
//!
//! - [`callback`] - OAuth redirect target. Validates the `state` parameter,
//!   exchanges the authorization code plus PKCE verifier for a token and
//!   hands the outcome to the waiting authorization flow.
//! - [`health`] - Reports that the listener is up, with the crate version.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spotify_current_playing::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::CallbackParams;
pub use callback::callback;
pub use health::health;
