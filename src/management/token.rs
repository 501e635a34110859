use std::path::PathBuf;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    error::AuthError,
    spotify::auth::OAuthClient,
    types::{Credential, TokenResponse},
};

/// Single source of truth for "what access token should I use right now".
///
/// The store exclusively owns the persisted credential record; consumers go
/// through [`TokenStore::get_valid_access_token`] and never read the cache
/// file themselves. Refresh is lazy and on-demand: there is no background
/// timer, the freshness check happens only when a consumer asks for a token,
/// immediately before use.
///
/// The record lives behind an async mutex that is held across a refresh
/// exchange. Concurrent callers that hit an expired token therefore
/// serialize on one in-flight refresh instead of racing their own; whoever
/// acquires the lock after the refresh sees the fresh record and returns it
/// without a second exchange.
pub struct TokenStore {
    path: PathBuf,
    oauth: OAuthClient,
    credential: Mutex<Option<Credential>>,
}

impl TokenStore {
    /// Opens the store at `path`, loading the credential record if one was
    /// persisted by an earlier run. A missing cache file is the
    /// unauthenticated state, not an error.
    pub async fn open(path: PathBuf, oauth: OAuthClient) -> Result<Self, AuthError> {
        let credential = match async_fs::read_to_string(&path).await {
            Ok(content) => Some(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(AuthError::Storage(e)),
        };

        Ok(Self {
            path,
            oauth,
            credential: Mutex::new(credential),
        })
    }

    /// Opens the store at the default cache location in the platform's
    /// local data directory.
    pub async fn open_default(oauth: OAuthClient) -> Result<Self, AuthError> {
        Self::open(Self::default_path(), oauth).await
    }

    fn default_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("mixcli/cache/credentials.json");
        path
    }

    pub fn oauth(&self) -> &OAuthClient {
        &self.oauth
    }

    /// Exchanges an authorization code and stores the resulting record.
    ///
    /// This is the redirect leg's entry point into the store, so the store
    /// stays the sole writer of the credential cache. A code-grant response
    /// must carry all three fields; one without a refresh token cannot form
    /// a valid record and fails the exchange.
    pub async fn authorize_with_code(&self, code: &str) -> Result<(), AuthError> {
        let response = self.oauth.exchange_code(code).await?;
        let refresh_token = response.refresh_token.clone().ok_or_else(|| {
            AuthError::TokenExchange("token response missing refresh_token".to_string())
        })?;

        let mut slot = self.credential.lock().await;
        self.replace(&mut slot, response.access_token, refresh_token, response.expires_in)
            .await
    }

    /// Computes `expires_at = now + expires_in` and writes the full record,
    /// overwriting any prior one. Partial updates are not expressible
    /// through this API.
    pub async fn store_credential(
        &self,
        access_token: String,
        refresh_token: String,
        expires_in: u64,
    ) -> Result<(), AuthError> {
        let mut slot = self.credential.lock().await;
        self.replace(&mut slot, access_token, refresh_token, expires_in)
            .await
    }

    /// Returns a fresh access token, refreshing first when the stored one
    /// is at or past its expiry.
    ///
    /// Fails with [`AuthError::NotAuthenticated`] when no record exists
    /// (without any network call) and with [`AuthError::RefreshFailed`]
    /// when the refresh exchange is rejected — in which case the stale
    /// record is left untouched for the caller's recovery policy.
    pub async fn get_valid_access_token(&self) -> Result<String, AuthError> {
        let mut slot = self.credential.lock().await;
        let Some(credential) = slot.as_ref() else {
            return Err(AuthError::NotAuthenticated);
        };

        let now = Utc::now().timestamp() as u64;
        // Non-strict comparison on purpose: a token with a few seconds left
        // buys nothing against a mid-flight expiry in the caller's request.
        if now >= credential.expires_at {
            let refresh_token = credential.refresh_token.clone();
            let response = self.oauth.refresh(&refresh_token).await?;
            let retained = Self::retained_refresh_token(&response, refresh_token);
            self.replace(&mut slot, response.access_token, retained, response.expires_in)
                .await?;
        }

        match slot.as_ref() {
            Some(credential) => Ok(credential.access_token.clone()),
            None => Err(AuthError::NotAuthenticated),
        }
    }

    /// Returns a copy of the current record, if any.
    pub async fn current_credential(&self) -> Option<Credential> {
        self.credential.lock().await.clone()
    }

    /// The provider may omit a new refresh token on refresh; the prior one
    /// stays valid and must be kept, never nulled out.
    fn retained_refresh_token(response: &TokenResponse, previous: String) -> String {
        match &response.refresh_token {
            Some(rotated) if !rotated.is_empty() => rotated.clone(),
            _ => previous,
        }
    }

    /// Replaces the record wholesale, persisting before the in-memory slot
    /// is updated so a failed write never leaves a record the cache file
    /// does not back.
    async fn replace(
        &self,
        slot: &mut Option<Credential>,
        access_token: String,
        refresh_token: String,
        expires_in: u64,
    ) -> Result<(), AuthError> {
        let credential = Credential {
            access_token,
            refresh_token,
            expires_at: Utc::now().timestamp() as u64 + expires_in,
        };

        self.persist(&credential).await?;
        *slot = Some(credential);
        Ok(())
    }

    async fn persist(&self, credential: &Credential) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(credential)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}
