//! # CLI Module
//!
//! User-facing command implementations. Each command coordinates between
//! the token store, the Spotify integration layer, and terminal output:
//!
//! - [`auth`] - runs the OAuth authorization-code flow and persists the
//!   resulting credential record
//! - [`list_artists`] - lists the user's followed artists, optionally
//!   filtered by a search term
//! - [`playlist`] - builds a personalized playlist from the user's top
//!   tracks
//!
//! Every command that talks to the Web API asks the token store for a valid
//! access token immediately before each batch of requests; none of them
//! manage refresh themselves. A missing credential record is reported with
//! a pointer to `mixcli auth` and terminates the command.
//!
//! Long-running fetches display an `indicatif` spinner; list output is
//! rendered with `tabled`; status lines go through the crate's colored
//! logging macros.

mod artists;
mod auth;
mod playlist;

pub use artists::list_artists;
pub use auth::auth;
pub use playlist::playlist;

use crate::{error, management::TokenStore, spotify::auth::OAuthClient};

/// Opens the default token store, terminating with guidance when the
/// credential cache is unreadable.
pub(crate) async fn open_store() -> TokenStore {
    match TokenStore::open_default(OAuthClient::from_env()).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open credential store: {}", e);
        }
    }
}
