//! Integration tests for request authorization and the 401 retry

use serde_json::json;
use turnstile_core::{MemoryStore, StoreKey, TokenStore};
use turnstile_http::{ApiRequest, AuthServiceClient, ClientError, UserProfile};
use turnstile_session::{AuthorizedClient, Session, SessionError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FUTURE: &str = "2999-01-01T00:00:00Z";

fn authorized(server: &MockServer, store: &MemoryStore) -> AuthorizedClient<MemoryStore> {
    let client = AuthServiceClient::new(server.uri()).unwrap();
    Session::new(store.clone(), client).authorized_client()
}

fn signed_in() -> MemoryStore {
    MemoryStore::with_entries([
        (StoreKey::AccessToken, "a1"),
        (StoreKey::RefreshToken, "r1"),
        (StoreKey::ExpiresAt, FUTURE),
    ])
}

async fn mount_refresh(server: &MockServer, body: serde_json::Value, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

fn profile() -> serde_json::Value {
    json!({"email": "user@example.com"})
}

#[tokio::test]
async fn test_attaches_bearer_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = authorized(&mock_server, &signed_in());
    let user = client.fetch_profile().await.unwrap();
    assert_eq!(user.email, "user@example.com");
}

#[tokio::test]
async fn test_missing_token_sends_no_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile()))
        .mount(&mock_server)
        .await;

    let client = authorized(&mock_server, &MemoryStore::new());
    client.fetch_profile().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_retries_once_after_refresh() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("authorization", "Bearer a2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile()))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_refresh(
        &mock_server,
        json!({"accessToken": "a2", "refreshToken": "r2", "expiresAt": FUTURE}),
        1,
    )
    .await;

    let store = signed_in();
    let client = authorized(&mock_server, &store);

    let user: UserProfile = client.execute(&ApiRequest::get(client.url("/user"))).await.unwrap();
    assert_eq!(user.email, "user@example.com");
    assert_eq!(store.get(StoreKey::RefreshToken).unwrap().as_deref(), Some("r2"));
}

#[tokio::test]
async fn test_second_unauthorized_is_returned() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token revoked"))
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_refresh(
        &mock_server,
        json!({"accessToken": "a2", "refreshToken": "r2", "expiresAt": FUTURE}),
        1,
    )
    .await;

    let client = authorized(&mock_server, &signed_in());

    let response = client
        .send(&ApiRequest::get(client.url("/user")))
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let requests = mock_server.received_requests().await.unwrap();
    let bearers: Vec<_> = requests
        .iter()
        .filter(|request| request.url.path() == "/user")
        .map(|request| request.headers.get("authorization").unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(bearers, ["Bearer a1", "Bearer a2"]);
}

#[tokio::test]
async fn test_second_unauthorized_decodes_to_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token revoked"))
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_refresh(
        &mock_server,
        json!({"accessToken": "a2", "refreshToken": "r2", "expiresAt": FUTURE}),
        1,
    )
    .await;

    let client = authorized(&mock_server, &signed_in());
    let err = client.fetch_profile().await.unwrap_err();
    assert!(matches!(
        err.transport(),
        Some(ClientError::AuthenticationFailed(_))
    ));
}

#[tokio::test]
async fn test_refresh_without_tokens_is_unauthorized() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_refresh(&mock_server, json!({"message": "ok"}), 1).await;

    let client = authorized(&mock_server, &signed_in());
    let err = client.fetch_profile().await.unwrap_err();
    assert!(matches!(err, SessionError::Unauthorized));
}

#[tokio::test]
async fn test_failed_refresh_propagates() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/refresh"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = signed_in();
    let client = authorized(&mock_server, &store);
    let err = client.fetch_profile().await.unwrap_err();
    assert!(matches!(err.transport(), Some(ClientError::Forbidden(_))));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_other_status_passes_through() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/sessions/7"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_refresh(&mock_server, json!({}), 0).await;

    let client = authorized(&mock_server, &signed_in());
    let response = client
        .send(&ApiRequest::delete(client.url("/sessions/7")))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_other_origins_are_left_alone() {
    let auth_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assets/config.json"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&other_server)
        .await;
    mount_refresh(&auth_server, json!({}), 0).await;

    let client = authorized(&auth_server, &signed_in());
    let url = format!("{}/assets/config.json", other_server.uri());
    let response = client.send(&ApiRequest::get(url)).await.unwrap();
    assert_eq!(response.status(), 401);

    let requests = other_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_json_body_is_sent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/user"))
        .and(header("authorization", "Bearer a1"))
        .and(body_json(json!({"role": "viewer"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "user@example.com", "role": "viewer"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = authorized(&mock_server, &signed_in());
    let request = ApiRequest::put(client.url("/user"))
        .json(&json!({"role": "viewer"}))
        .unwrap();
    let user: UserProfile = client.execute(&request).await.unwrap();
    assert_eq!(user.role.as_deref(), Some("viewer"));
}
