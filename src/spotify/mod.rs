//! # Spotify Integration Module
//!
//! The two corners of the Spotify Web API this program touches.
//!
//! ## Authentication
//!
//! [`auth`] implements OAuth 2.0 authorization-code with PKCE:
//! 1. **Code Verifier Generation**: random 128 character verifier
//! 2. **Challenge Creation**: S256 challenge derived from the verifier
//! 3. **Authorization Request**: the browser is sent to Spotify with the challenge
//! 4. **Local Callback**: the authorization code arrives at the temporary listener
//! 5. **Token Exchange**: code and verifier are traded for a token
//! 6. **Refresh**: expired access tokens are renewed with the refresh token
//!
//! ## Playback
//!
//! [`player`] reads `GET /me/player/currently-playing` and reduces the
//! response to a [`NowPlaying`](crate::types::NowPlaying) snapshot.
//!
//! ## Errors
//!
//! - [`AuthError`](crate::error::AuthError) for everything on the accounts service
//! - [`ApiError`](crate::error::ApiError) for Web API requests, with a
//!   dedicated variant for expired tokens

pub mod auth;
pub mod player;
