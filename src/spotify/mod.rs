//! # Spotify Integration Module
//!
//! Interface to the Spotify Web API: the authorization-code OAuth flow and
//! the thin catalog/library clients the playlist commands consume. It is the
//! integration layer between the CLI and Spotify's services, handling HTTP
//! communication, the two token-endpoint exchanges, and rate-limit quirks.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 authorization-code grant)
//!     ├── Artist Operations (followed artists)
//!     ├── Track Operations (top tracks)
//!     └── Playlist Operations (create, add tracks)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Authentication
//!
//! [`auth`] drives both legs of the grant: the browser-facing authorize
//! redirect (caught by the local callback server) and the token-endpoint
//! exchanges, authenticated with HTTP Basic client credentials. Refreshing
//! an expired token is not handled here — that is the job of
//! [`crate::management::TokenStore`], which calls back into
//! [`auth::OAuthClient::refresh`] behind its gate.
//!
//! ## Consumer contract
//!
//! The [`artists`], [`tracks`], and [`playlist`] functions are stateless
//! request builders: each takes a valid access token as a parameter and
//! attaches it as `Authorization: Bearer <token>`. None of them manage
//! refresh on their own; callers obtain the token from the token store
//! immediately before the request.
//!
//! ## Error handling
//!
//! HTTP and API failures propagate as `reqwest::Error`; the token-lifecycle
//! paths return the richer [`crate::error::AuthError`]. Rate limiting (429
//! with `Retry-After`) and transient 502 responses are retried in place,
//! matching Spotify's documented behavior.

pub mod artists;
pub mod auth;
pub mod playlist;
pub mod tracks;
