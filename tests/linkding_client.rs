//! Integration tests for the Linkding REST client against a mock server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{
    body_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use linkding_mcp::linkding::{ApiError, BookmarkRequest, LinkdingApi, LinkdingClient};

const TOKEN: &str = "test-token";

fn client(server: &MockServer) -> LinkdingClient {
    LinkdingClient::new(&server.uri(), TOKEN).unwrap()
}

fn bookmark_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "url": format!("https://example.com/{id}"),
        "title": title,
        "description": null,
        "notes": "",
        "tag_names": ["rust"],
        "is_archived": false,
        "unread": false,
        "shared": false,
        "date_added": "2024-03-01T10:00:00.123456Z",
        "date_modified": "2024-03-02T10:00:00Z"
    })
}

#[tokio::test]
async fn list_bookmarks_sends_auth_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/bookmarks/"))
        .and(header("authorization", "Token test-token"))
        .and(header("accept", "application/json"))
        .and(query_param("limit", "5"))
        .and(query_param("q", "rust lang"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": [bookmark_json(1, "A"), bookmark_json(2, "B")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .list_bookmarks(5, 0, "rust lang")
        .await
        .unwrap();

    assert_eq!(page.count, 2);
    let titles: Vec<&str> = page.results.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["A", "B"]);
    assert_eq!(page.results[0].description, "");
    assert_eq!(page.results[0].tag_names, ["rust"]);
    assert!(page.results[0].date_added.is_some());
}

#[tokio::test]
async fn list_bookmarks_omits_default_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/bookmarks/"))
        .and(query_param_is_missing("limit"))
        .and(query_param_is_missing("offset"))
        .and(query_param_is_missing("q"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0,
            "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server).list_bookmarks(0, 0, "").await.unwrap();
    assert!(page.results.is_empty());
}

#[tokio::test]
async fn base_url_path_is_preserved() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/linkding/api/tags/"))
        .and(query_param("limit", "50"))
        .and(query_param("offset", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": 3, "name": "web", "date_added": "2024-01-01T00:00:00Z"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = LinkdingClient::new(&format!("{}/linkding/", server.uri()), TOKEN).unwrap();
    let page = client.list_tags(50, 10).await.unwrap();

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].name, "web");
    assert_eq!(page.results[0].id, 3);
}

#[tokio::test]
async fn create_bookmark_omits_empty_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/bookmarks/"))
        .and(header("authorization", "Token test-token"))
        .and(body_json(json!({
            "url": "https://x.test",
            "tag_names": ["a", "b"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7,
            "url": "https://x.test",
            "title": "",
            "tag_names": ["a", "b"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = BookmarkRequest {
        tag_names: vec!["a".to_string(), "b".to_string()],
        ..BookmarkRequest::new("https://x.test")
    };
    let created = client(&server).create_bookmark(&request).await.unwrap();

    assert_eq!(created.id, 7);
    assert_eq!(created.url, "https://x.test");
    assert_eq!(created.tag_names, ["a", "b"]);
}

#[tokio::test]
async fn create_bookmark_requires_created_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/bookmarks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bookmark_json(7, "T")))
        .mount(&server)
        .await;

    let err = client(&server)
        .create_bookmark(&BookmarkRequest::new("https://x.test"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(200));
    assert_eq!(err.to_string(), "API request failed with status 200");
}

#[tokio::test]
async fn update_bookmark_uses_identifier_path() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/bookmarks/42/"))
        .and(body_json(json!({"url": "https://x.test", "title": "New"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(bookmark_json(42, "New")))
        .expect(1)
        .mount(&server)
        .await;

    let request = BookmarkRequest {
        title: "New".to_string(),
        ..BookmarkRequest::new("https://x.test")
    };
    let updated = client(&server).update_bookmark(42, &request).await.unwrap();
    assert_eq!(updated.id, 42);
    assert_eq!(updated.title, "New");
}

#[tokio::test]
async fn delete_archive_unarchive_expect_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/bookmarks/5/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/bookmarks/5/archive/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/bookmarks/5/unarchive/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.archive_bookmark(5).await.unwrap();
    client.unarchive_bookmark(5).await.unwrap();
    client.delete_bookmark(5).await.unwrap();
}

#[tokio::test]
async fn unexpected_status_is_reported_with_code() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/bookmarks/9/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client(&server);

    let err = client.delete_bookmark(9).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404 }));

    let err = client.list_tags(0, 0).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/bookmarks/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).list_bookmarks(0, 0, "").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
    assert!(err.to_string().starts_with("failed to decode response"));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"count": 0, "results": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client =
        LinkdingClient::with_timeout(&server.uri(), TOKEN, Duration::from_millis(100)).unwrap();
    let err = client.list_tags(0, 0).await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout { .. }));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = LinkdingClient::new(&uri, TOKEN)
        .unwrap()
        .list_tags(0, 0)
        .await
        .unwrap_err();
    assert!(err.is_transport());
}

#[test]
fn rejects_unusable_configuration() {
    assert!(matches!(
        LinkdingClient::new("ftp://links.example.com", TOKEN),
        Err(ApiError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        LinkdingClient::new("https://links.example.com", "bad\ntoken"),
        Err(ApiError::InvalidToken)
    ));
}
