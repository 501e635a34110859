use std::sync::Arc;
use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use mixcli::error::AuthError;
use mixcli::management::TokenStore;
use mixcli::spotify::auth::OAuthClient;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Helper to build an OAuth client pointed at a mock token endpoint
fn test_oauth(token_url: String) -> OAuthClient {
    OAuthClient::new(
        "https://accounts.example.com/authorize".to_string(),
        token_url,
        "client-id".to_string(),
        "client-secret".to_string(),
        "http://127.0.0.1:8080/callback".to_string(),
    )
}

async fn open_store(dir: &TempDir, token_url: String) -> TokenStore {
    TokenStore::open(dir.path().join("credentials.json"), test_oauth(token_url))
        .await
        .expect("store should open")
}

fn expected_basic_header() -> String {
    format!("Basic {}", STANDARD.encode("client-id:client-secret"))
}

#[tokio::test]
async fn round_trip_returns_stored_token_without_refresh() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, format!("{}/api/token", server.uri())).await;

    store
        .store_credential("access-1".to_string(), "refresh-1".to_string(), 3600)
        .await
        .unwrap();

    let token = store.get_valid_access_token().await.unwrap();
    assert_eq!(token, "access-1");

    // no refresh call was performed
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_record_fails_without_network_call() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, format!("{}/api/token", server.uri())).await;

    let result = store.get_valid_access_token().await;
    assert!(matches!(result, Err(AuthError::NotAuthenticated)));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn expired_token_triggers_exactly_one_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header("authorization", expected_basic_header().as_str()))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .and(body_string_contains("client_id=client-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "refresh_token": "refresh-2",
            "expires_in": 3600,
            "token_type": "Bearer",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, format!("{}/api/token", server.uri())).await;

    // expires_in = 0 puts expires_at exactly at "now"; the gate treats
    // at-expiry the same as past-expiry
    store
        .store_credential("access-1".to_string(), "refresh-1".to_string(), 0)
        .await
        .unwrap();

    let token = store.get_valid_access_token().await.unwrap();
    assert_eq!(token, "access-2");

    // the fresh token is handed out without another exchange
    let token = store.get_valid_access_token().await.unwrap();
    assert_eq!(token, "access-2");

    let credential = store.current_credential().await.unwrap();
    assert_eq!(credential.access_token, "access-2");
    assert_eq!(credential.refresh_token, "refresh-2");
}

#[tokio::test]
async fn refresh_token_retained_when_response_omits_it() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "expires_in": 3600,
            "token_type": "Bearer",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, format!("{}/api/token", server.uri())).await;

    store
        .store_credential("access-1".to_string(), "refresh-1".to_string(), 0)
        .await
        .unwrap();

    let token = store.get_valid_access_token().await.unwrap();
    assert_eq!(token, "access-2");

    // the prior refresh token survives the update, never nulled out
    let credential = store.current_credential().await.unwrap();
    assert_eq!(credential.refresh_token, "refresh-1");
}

#[tokio::test]
async fn refresh_failure_leaves_prior_record_intact() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, format!("{}/api/token", server.uri())).await;

    store
        .store_credential("access-1".to_string(), "refresh-1".to_string(), 0)
        .await
        .unwrap();
    let before = store.current_credential().await.unwrap();

    let result = store.get_valid_access_token().await;
    assert!(matches!(result, Err(AuthError::RefreshFailed(_))));

    // not cleared, not partially overwritten
    let after = store.current_credential().await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn store_credential_replaces_all_fields_atomically() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, format!("{}/api/token", server.uri())).await;

    store
        .store_credential("access-1".to_string(), "refresh-1".to_string(), 3600)
        .await
        .unwrap();
    let first = store.current_credential().await.unwrap();

    store
        .store_credential("access-2".to_string(), "refresh-2".to_string(), 7200)
        .await
        .unwrap();
    let second = store.current_credential().await.unwrap();

    // no mixed old/new state observable
    assert_eq!(second.access_token, "access-2");
    assert_eq!(second.refresh_token, "refresh-2");
    assert!(second.expires_at >= first.expires_at + 3600);
}

#[tokio::test]
async fn credential_record_survives_reopen() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let token_url = format!("{}/api/token", server.uri());

    {
        let store = open_store(&dir, token_url.clone()).await;
        store
            .store_credential("access-1".to_string(), "refresh-1".to_string(), 3600)
            .await
            .unwrap();
    }

    // a new process ("page load") sees the persisted record
    let store = open_store(&dir, token_url).await;
    let token = store.get_valid_access_token().await.unwrap();
    assert_eq!(token, "access-1");

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_callers_share_a_single_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(200))
                .set_body_json(json!({
                    "access_token": "access-2",
                    "refresh_token": "refresh-2",
                    "expires_in": 3600,
                    "token_type": "Bearer",
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = Arc::new(open_store(&dir, format!("{}/api/token", server.uri())).await);

    store
        .store_credential("access-1".to_string(), "refresh-1".to_string(), 0)
        .await
        .unwrap();

    let a = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.get_valid_access_token().await }
    });
    let b = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.get_valid_access_token().await }
    });

    // both callers get the fresh token; the mock's expect(1) verifies only
    // one exchange went out
    assert_eq!(a.await.unwrap().unwrap(), "access-2");
    assert_eq!(b.await.unwrap().unwrap(), "access-2");
}
