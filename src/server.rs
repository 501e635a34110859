use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config, error, management::TokenStore, types::AuthOutcome};

/// Shared state for the OAuth callback route: the token store that owns the
/// credential record, and the outcome slot the CLI polls while waiting for
/// the redirect leg to finish.
#[derive(Clone)]
pub struct CallbackState {
    pub store: Arc<TokenStore>,
    pub outcome: Arc<Mutex<Option<AuthOutcome>>>,
}

pub async fn start_api_server(
    store: Arc<TokenStore>,
    outcome: Arc<Mutex<Option<AuthOutcome>>>,
) {
    let state = CallbackState { store, outcome };

    let app = Router::new()
        .route("/", get(api::landing))
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)));

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind callback server on {}: {}", addr, e),
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!("Callback server error: {}", e);
    }
}
