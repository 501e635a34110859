use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::STANDARD};
use mixcli::api::{RedirectLeg, classify_redirect};
use mixcli::error::AuthError;
use mixcli::management::TokenStore;
use mixcli::spotify::auth::OAuthClient;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_oauth(token_url: String) -> OAuthClient {
    OAuthClient::new(
        "https://accounts.example.com/authorize".to_string(),
        token_url,
        "client-id".to_string(),
        "client-secret".to_string(),
        "http://127.0.0.1:8080/callback".to_string(),
    )
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn classify_redirect_dispatches_on_code() {
    let leg = classify_redirect(&params(&[("code", "abc123")]));
    assert_eq!(leg, RedirectLeg::Code("abc123".to_string()));
}

#[test]
fn classify_redirect_surfaces_provider_error() {
    let leg = classify_redirect(&params(&[("error", "access_denied")]));
    assert_eq!(leg, RedirectLeg::Denied("access_denied".to_string()));
}

#[test]
fn classify_redirect_error_takes_precedence_over_code() {
    let leg = classify_redirect(&params(&[("code", "abc123"), ("error", "access_denied")]));
    assert_eq!(leg, RedirectLeg::Denied("access_denied".to_string()));
}

#[test]
fn classify_redirect_treats_bare_visit_as_out_of_flow() {
    let leg = classify_redirect(&params(&[("foo", "bar")]));
    assert_eq!(leg, RedirectLeg::OutOfFlow);

    let leg = classify_redirect(&HashMap::new());
    assert_eq!(leg, RedirectLeg::OutOfFlow);
}

#[test]
fn authorize_url_carries_required_parameters() {
    let oauth = test_oauth("https://accounts.example.com/api/token".to_string());
    let url = oauth.authorize_url();

    assert!(url.starts_with("https://accounts.example.com/authorize?"));
    assert!(url.contains("client_id=client-id"));
    assert!(url.contains("response_type=code"));
    // redirect target and scope list are URL-encoded
    assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8080%2Fcallback"));
    assert!(url.contains("scope="));
    assert!(url.contains("user-top-read%20"));
    assert!(!url.contains("scope=user-top-read "));
    assert!(url.contains("show_dialog=true"));
}

#[tokio::test]
async fn exchange_code_posts_once_with_basic_auth() {
    let server = MockServer::start().await;
    let expected_header = format!("Basic {}", STANDARD.encode("client-id:client-secret"));

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header("authorization", expected_header.as_str()))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc123"))
        .and(body_string_contains("redirect_uri="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "expires_in": 3600,
            "token_type": "Bearer",
            "scope": "user-top-read",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let oauth = test_oauth(format!("{}/api/token", server.uri()));
    let response = oauth.exchange_code("abc123").await.unwrap();

    assert_eq!(response.access_token, "access-1");
    assert_eq!(response.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(response.expires_in, 3600);
}

#[tokio::test]
async fn exchange_code_non_success_status_is_token_exchange_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let oauth = test_oauth(format!("{}/api/token", server.uri()));
    let result = oauth.exchange_code("stale-code").await;

    assert!(matches!(result, Err(AuthError::TokenExchange(_))));
}

#[tokio::test]
async fn exchange_code_body_missing_fields_is_token_exchange_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let oauth = test_oauth(format!("{}/api/token", server.uri()));
    let result = oauth.exchange_code("abc123").await;

    assert!(matches!(result, Err(AuthError::TokenExchange(_))));
}

#[tokio::test]
async fn authorize_with_code_stores_full_credential_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "expires_in": 3600,
            "token_type": "Bearer",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = TokenStore::open(
        dir.path().join("credentials.json"),
        test_oauth(format!("{}/api/token", server.uri())),
    )
    .await
    .unwrap();

    store.authorize_with_code("abc123").await.unwrap();

    let credential = store.current_credential().await.unwrap();
    assert_eq!(credential.access_token, "access-1");
    assert_eq!(credential.refresh_token, "refresh-1");
    assert!(credential.expires_at > 0);
}

#[tokio::test]
async fn authorize_with_code_rejects_response_without_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "expires_in": 3600,
            "token_type": "Bearer",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = TokenStore::open(
        dir.path().join("credentials.json"),
        test_oauth(format!("{}/api/token", server.uri())),
    )
    .await
    .unwrap();

    let result = store.authorize_with_code("abc123").await;
    assert!(matches!(result, Err(AuthError::TokenExchange(_))));

    // a partial triple never becomes a credential record
    assert!(store.current_credential().await.is_none());
}
