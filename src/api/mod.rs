//! HTTP API endpoints for the local callback server.
//!
//! Three routes back the OAuth redirect leg:
//!
//! - [`callback`] - handles the provider's redirect back, classifying the
//!   query parameters and driving the code-for-token exchange
//! - [`landing`] - the landing page out-of-flow visitors are sent to
//! - [`health`] - liveness endpoint returning status and version
//!
//! Built on [Axum](https://docs.rs/axum); the callback route receives its
//! shared state (token store + outcome slot) via an `Extension` layer.

mod callback;
mod health;
mod landing;

pub use callback::RedirectLeg;
pub use callback::callback;
pub use callback::classify_redirect;
pub use health::health;
pub use landing::landing;
