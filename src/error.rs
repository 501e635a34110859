//! Error taxonomy for the authentication core.
//!
//! Every failure of the token lifecycle surfaces as an [`AuthError`]; nothing
//! in the core swallows an error silently. The three named variants map to
//! the recovery paths the CLI offers: `NotAuthenticated` and `TokenExchange`
//! are resolved by running `mixcli auth` again, `RefreshFailed` means the
//! refresh token was revoked or the client credentials are wrong and the
//! user has to re-login as well — the previously stored credential record
//! is left untouched in that case.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential record exists where one was required. Always
    /// recoverable by initiating the login flow.
    #[error("not authenticated; run `mixcli auth` first")]
    NotAuthenticated,

    /// The authorization-code-for-token exchange failed: non-success status
    /// from the token endpoint, or a response body lacking the expected
    /// fields. Not retried automatically.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// The refresh-token exchange failed. Not retried; the caller decides
    /// the recovery policy (re-login). The stale record stays in place.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("credential storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("malformed credential cache: {0}")]
    Malformed(#[from] serde_json::Error),
}
