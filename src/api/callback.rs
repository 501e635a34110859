use std::collections::HashMap;

use axum::{
    Extension,
    extract::Query,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{server::CallbackState, types::AuthOutcome, warning};

/// How a visit to the redirect endpoint is handled, based on the query
/// parameters the provider sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectLeg {
    /// Provider granted a one-time authorization code to exchange.
    Code(String),
    /// Provider reported an error (e.g. `access_denied`). Recoverable;
    /// the user may retry the login.
    Denied(String),
    /// Neither `code` nor `error` present: an out-of-flow visit that gets
    /// redirected to the landing page.
    OutOfFlow,
}

/// Classifies the redirect query. The `error` parameter takes precedence
/// over `code`: a denial is a denial even if a code tags along.
pub fn classify_redirect(params: &HashMap<String, String>) -> RedirectLeg {
    if let Some(error) = params.get("error") {
        RedirectLeg::Denied(error.clone())
    } else if let Some(code) = params.get("code") {
        RedirectLeg::Code(code.clone())
    } else {
        RedirectLeg::OutOfFlow
    }
}

/// OAuth callback handler: the redirect leg of the authorization-code flow.
///
/// On a granted code, the token store performs the exchange and persists
/// the credential record before the success page is served; the waiting CLI
/// observes the outcome through the shared state. Denials and failed
/// exchanges surface the reason verbatim and leave the flow retryable.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<CallbackState>,
) -> Response {
    match classify_redirect(&params) {
        RedirectLeg::Denied(reason) => {
            warning!("Login failed: {}", reason);
            let mut outcome = state.outcome.lock().await;
            *outcome = Some(AuthOutcome::LoginFailed(reason.clone()));
            Html(format!(
                "<h4>Login failed: {}.</h4><p>Close this window and retry with <code>mixcli auth</code>.</p>",
                reason
            ))
            .into_response()
        }
        RedirectLeg::Code(code) => match state.store.authorize_with_code(&code).await {
            Ok(()) => {
                let mut outcome = state.outcome.lock().await;
                *outcome = Some(AuthOutcome::Authenticated);
                Html(
                    "<h2>Authentication successful.</h2><p>Close this browser window.</p>"
                        .to_string(),
                )
                .into_response()
            }
            Err(e) => {
                warning!("Token exchange failed: {}", e);
                let mut outcome = state.outcome.lock().await;
                *outcome = Some(AuthOutcome::LoginFailed(e.to_string()));
                Html("<h4>Login failed.</h4>".to_string()).into_response()
            }
        },
        RedirectLeg::OutOfFlow => Redirect::to("/").into_response(),
    }
}
