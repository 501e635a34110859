use std::{sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, header::AUTHORIZATION};
use tokio::sync::Mutex;

use crate::{
    config, error,
    error::AuthError,
    management::TokenStore,
    server::start_api_server,
    success,
    types::{AuthOutcome, TokenResponse},
    warning,
};

/// HTTP-level client for the two legs of the OAuth2 authorization-code grant.
///
/// Owns the endpoint URLs and the client identifier/secret pair. Both
/// token-endpoint exchanges authenticate with an
/// `Authorization: Basic base64(client_id:client_secret)` header.
pub struct OAuthClient {
    http: Client,
    auth_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl OAuthClient {
    pub fn new(
        auth_url: String,
        token_url: String,
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    ) -> Self {
        Self {
            http: Client::new(),
            auth_url,
            token_url,
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    /// Builds the client from the application environment.
    pub fn from_env() -> Self {
        Self::new(
            config::spotify_auth_url(),
            config::spotify_token_url(),
            config::spotify_client_id(),
            config::spotify_client_secret(),
            config::spotify_redirect_uri(),
        )
    }

    /// Constructs the authorize-endpoint URL the user's browser is sent to.
    ///
    /// Carries the fixed client identifier, `response_type=code`, the
    /// URL-encoded redirect target, and the URL-encoded space-joined scope
    /// set from [`config::SCOPES`]. `show_dialog=true` forces the consent
    /// screen so a login can be retried with a different account.
    pub fn authorize_url(&self) -> String {
        format!(
            "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}&show_dialog=true",
            auth_url = self.auth_url,
            client_id = self.client_id,
            redirect_uri = urlencoding::encode(&self.redirect_uri),
            scope = urlencoding::encode(&config::scope()),
        )
    }

    fn basic_auth(&self) -> String {
        let pair = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(pair))
    }

    /// Exchanges a one-time authorization code for a token pair.
    ///
    /// Performs a token-endpoint POST with `grant_type=authorization_code`,
    /// the code, and the fixed redirect target. A non-success status or a
    /// body lacking the expected fields fails with
    /// [`AuthError::TokenExchange`]; nothing is retried.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AuthError> {
        let res = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, self.basic_auth())
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(AuthError::TokenExchange(format!(
                "token endpoint returned {}",
                res.status()
            )));
        }

        res.json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::TokenExchange(format!("unexpected token response: {}", e)))
    }

    /// Mints a new access token from a stored refresh token.
    ///
    /// Performs a token-endpoint POST with `grant_type=refresh_token`, the
    /// refresh token, and the client identifier. A failed exchange surfaces
    /// as [`AuthError::RefreshFailed`] and is never retried; recovery policy
    /// (re-login) is left to the caller.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        let res = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, self.basic_auth())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.client_id.as_str()),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(AuthError::RefreshFailed(format!(
                "token endpoint returned {}",
                res.status()
            )));
        }

        res.json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::RefreshFailed(format!("unexpected token response: {}", e)))
    }
}

/// Runs the login leg of the authorization-code flow end to end.
///
/// 1. Starts the local callback server that will receive the redirect.
/// 2. Opens the authorize URL in the user's default browser (with manual
///    URL instructions as the fallback).
/// 3. Waits for the redirect leg to land an outcome in the shared state:
///    the callback handler exchanges the code and hands the triple to the
///    token store before flagging success.
///
/// Browser launch failures degrade to a warning; a timeout or a failed
/// exchange terminates with an error message telling the user to retry.
pub async fn authorize(store: Arc<TokenStore>, shared_state: Arc<Mutex<Option<AuthOutcome>>>) {
    let auth_url = store.oauth().authorize_url();

    // start the callback server
    let server_store = Arc::clone(&store);
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_api_server(server_store, server_state).await;
    });

    // Open the authorization URL in the default browser
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    // wait for the callback to be hit
    match wait_for_outcome(shared_state).await {
        Some(AuthOutcome::Authenticated) => {
            success!("Authentication successful!");
        }
        Some(AuthOutcome::LoginFailed(reason)) => {
            error!("Login failed: {}. Run `mixcli auth` to retry.", reason);
        }
        None => {
            error!("Authentication failed or timed out.");
        }
    }
}

/// Polls the shared state for a terminal outcome of the redirect leg.
///
/// Runs concurrently with the HTTP callback handler, checking once per
/// second with a 60-second timeout. Returns `None` when the timeout is
/// reached without the callback being hit.
async fn wait_for_outcome(
    shared_state: Arc<Mutex<Option<AuthOutcome>>>,
) -> Option<AuthOutcome> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(outcome) = lock.as_ref() {
            return Some(outcome.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
