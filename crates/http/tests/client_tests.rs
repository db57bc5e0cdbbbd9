//! Integration tests for the Calltrack HTTP client

use calltrack_http::client::error::ClientError;
use calltrack_http::types::PageQuery;
use calltrack_http::TrackClient;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_client_builder() {
    let client = TrackClient::builder()
        .base_url("http://localhost:8080/")
        .build();

    assert!(client.is_ok());
    let client = client.unwrap();
    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = TrackClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));

    let result = TrackClient::builder().base_url("  ").build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_login_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"username": "admin", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": "u1", "username": "admin", "role": "admin"},
            "accessToken": "access-1",
            "refreshToken": "refresh-1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TrackClient::new(mock_server.uri()).unwrap();
    let response = client.login("admin", "secret").await.unwrap();

    assert_eq!(response.user.unwrap().username, "admin");
    assert_eq!(response.access_token.as_deref(), Some("access-1"));
    assert_eq!(response.refresh_token.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn test_refresh_sends_camel_case_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refreshToken": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "access-2"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TrackClient::new(mock_server.uri()).unwrap();
    let refreshed = client.refresh("refresh-1").await.unwrap();
    assert_eq!(refreshed.access_token, "access-2");
}

#[tokio::test]
async fn test_bearer_token_and_page_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/calllogs"))
        .and(header("authorization", "Bearer access-1"))
        .and(query_param("limit", "12"))
        .and(query_param("skip", "24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logs": [{
                "_id": "c1",
                "timestamp": "1700000000000",
                "name": "Alice",
                "phoneNumber": "+15550100",
                "duration": "65",
                "type": "OUTGOING"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TrackClient::new(mock_server.uri())
        .unwrap()
        .authenticate("access-1");
    let page = client
        .call_logs(PageQuery { limit: 12, skip: 24 })
        .await
        .unwrap();

    assert_eq!(page.logs.len(), 1);
    assert_eq!(page.logs[0].formatted_duration(), "1m 5s");
    assert!(page.total.is_none());
}

#[tokio::test]
async fn test_notifications_report_total() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logs": [{"_id": "n1", "app": "com.whatsapp", "title": "t", "text": "x", "time": 1}],
            "total": 41
        })))
        .mount(&mock_server)
        .await;

    let client = TrackClient::new(mock_server.uri()).unwrap().authenticate("t");
    let page = client
        .notifications(PageQuery { limit: 12, skip: 0 })
        .await
        .unwrap();
    assert_eq!(page.total, Some(41));
    assert_eq!(page.logs[0].app, "com.whatsapp");
}

#[tokio::test]
async fn test_logout_ignores_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("authorization", "Bearer t"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TrackClient::new(mock_server.uri()).unwrap().authenticate("t");
    assert!(client.logout().await.is_ok());
}

#[tokio::test]
async fn test_catalog_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "title": "Lamp",
            "price": 10.0,
            "images": ["a.png"]
        })))
        .mount(&mock_server)
        .await;

    let client = TrackClient::new(mock_server.uri()).unwrap();
    let product = client.product(7).await.unwrap();
    assert_eq!(product.title, "Lamp");
    assert_eq!(product.primary_image(0), "a.png");

    let missing = client.customer(99).await;
    assert!(matches!(missing, Err(ClientError::NotFound(_))));
}

#[tokio::test]
async fn test_error_handling() {
    let mock_server = MockServer::start().await;

    // Test 401 Unauthorized
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "User exists"})),
        )
        .mount(&mock_server)
        .await;

    let client = TrackClient::new(mock_server.uri()).unwrap();

    let result = client.authenticate("stale").me().await;
    assert!(matches!(result, Err(ClientError::AuthenticationFailed(ref m)) if m == "jwt expired"));

    let result = client.signup("admin", "pw").await;
    match result {
        Err(ClientError::ServerError { status, message }) => {
            assert_eq!(status, 409);
            assert_eq!(message, "User exists");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
