//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML adapter → page requests → vendor
//! HTTP calls → records and resumable cursors

use connector_paging::cursor::decode;
use connector_paging::{
    build_handler, load_adapter_from_str, CompositeCursor, Error, Page, PageHandler, PageRequest,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn adapter_yaml(base_url: &str) -> String {
    format!(
        r#"
name: directory
base_url: {base_url}
timeout_secs: 5
max_page_size: 50
headers:
  Authorization: Bearer test-token
entities:
  - id: Group
    request:
      path: /groups
      records_path: data
  - id: User
    pagination: token
    request:
      path: /users
      records_path: users
      next_token_path: next
      token_param: page_token
  - id: Members
    nested:
      outer:
        path: /teams
        records_path: teams
        has_more_path: more
    request:
      path: /teams/{{collection_id}}/members
      records_path: members
      has_more_path: more
    identity:
      fields: [teamId, userId]
      target: membershipId
"#
    )
}

async fn handler_for(server: &MockServer) -> PageHandler {
    let def = load_adapter_from_str(&adapter_yaml(&server.uri())).unwrap();
    build_handler(&def).unwrap()
}

fn ids(page: &Page) -> Vec<String> {
    page.objects
        .iter()
        .map(|o| o["id"].as_str().unwrap().to_string())
        .collect()
}

async fn mount_groups(server: &MockServer) {
    let groups: Vec<_> = (1..=5).map(|i| json!({"id": format!("group{i}")})).collect();

    Mock::given(method("GET"))
        .and(path("/groups"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "3"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": &groups[0..3]})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/groups"))
        .and(query_param("offset", "3"))
        .and(query_param("limit", "3"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": &groups[3..5]})))
        .mount(server)
        .await;
}

async fn mount_teams(server: &MockServer) {
    for (offset, team, more) in [("0", "team1", true), ("1", "team2", false)] {
        Mock::given(method("GET"))
            .and(path("/teams"))
            .and(query_param("offset", offset))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "teams": [{"id": team}],
                "more": more
            })))
            .mount(server)
            .await;

        for (member, more) in [(1, true), (2, false)] {
            let offset = (member - 1).to_string();
            Mock::given(method("GET"))
                .and(path(format!("/teams/{team}/members")))
                .and(query_param("offset", offset.as_str()))
                .and(query_param("limit", "1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "members": [{
                        "id": format!("{team}#{member}"),
                        "teamId": team,
                        "userId": format!("u{member}")
                    }],
                    "more": more
                })))
                .mount(server)
                .await;
        }
    }
}

// ============================================================================
// Flat Offset Pagination
// ============================================================================

#[tokio::test]
async fn test_flat_offset_sync() {
    let mock_server = MockServer::start().await;
    mount_groups(&mock_server).await;
    let handler = handler_for(&mock_server).await;

    let first = handler.handle(&PageRequest::first("Group", 3)).await.unwrap();
    assert_eq!(ids(&first), ["group1", "group2", "group3"]);
    assert_eq!(first.next_cursor, "eyJjdXJzb3IiOjN9");
    assert_eq!(
        decode::<i64>(&first.next_cursor).unwrap(),
        CompositeCursor::at(3)
    );

    let second = handler
        .handle(&PageRequest::first("Group", 3).after(&first))
        .await
        .unwrap();
    assert_eq!(ids(&second), ["group4", "group5"]);
    assert_eq!(second.next_cursor, "");
}

#[tokio::test]
async fn test_same_cursor_same_page() {
    let mock_server = MockServer::start().await;
    mount_groups(&mock_server).await;
    let handler = handler_for(&mock_server).await;

    let first = handler.handle(&PageRequest::first("Group", 3)).await.unwrap();
    let request = PageRequest::first("Group", 3).after(&first);

    let a = handler.handle(&request).await.unwrap();
    let b = handler.handle(&request).await.unwrap();
    assert_eq!(a, b);
}

// ============================================================================
// Token Pagination
// ============================================================================

#[tokio::test]
async fn test_token_sync() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param_is_missing("page_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"id": "u1"}, {"id": "u2"}],
            "next": "t2"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page_token", "t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"id": "u3"}],
            "next": null
        })))
        .mount(&mock_server)
        .await;

    let handler = handler_for(&mock_server).await;

    let first = handler.handle(&PageRequest::first("User", 2)).await.unwrap();
    assert_eq!(ids(&first), ["u1", "u2"]);
    assert_eq!(
        decode::<String>(&first.next_cursor).unwrap(),
        CompositeCursor::at("t2".to_string())
    );

    let second = handler
        .handle(&PageRequest::first("User", 2).after(&first))
        .await
        .unwrap();
    assert_eq!(ids(&second), ["u3"]);
    assert!(second.is_last());
}

// ============================================================================
// Nested Pagination
// ============================================================================

#[tokio::test]
async fn test_nested_sync() {
    let mock_server = MockServer::start().await;
    mount_teams(&mock_server).await;
    let handler = handler_for(&mock_server).await;

    let mut request = PageRequest::first("Members", 1);
    let mut seen = Vec::new();
    let mut cursors = Vec::new();
    for _ in 0..4 {
        let page = handler.handle(&request).await.unwrap();
        seen.extend(ids(&page));
        cursors.push(page.next_cursor.clone());
        request = request.after(&page);
    }

    assert_eq!(seen, ["team1#1", "team1#2", "team2#1", "team2#2"]);
    assert_eq!(
        decode::<i64>(&cursors[0]).unwrap(),
        CompositeCursor::nested(Some(1), "team1", Some(1))
    );
    assert_eq!(
        decode::<i64>(&cursors[1]).unwrap(),
        CompositeCursor::nested(None, "team1", Some(1))
    );
    assert_eq!(
        decode::<i64>(&cursors[2]).unwrap(),
        CompositeCursor::nested(Some(1), "team2", None)
    );
    assert_eq!(cursors[3], "");
}

#[tokio::test]
async fn test_nested_sync_applies_identity() {
    let mock_server = MockServer::start().await;
    mount_teams(&mock_server).await;
    let handler = handler_for(&mock_server).await;

    let page = handler
        .handle(&PageRequest::first("Members", 1))
        .await
        .unwrap();
    assert_eq!(page.objects[0]["membershipId"], "team1|u1");
}

#[tokio::test]
async fn test_drained_outer_item_is_not_refetched() {
    let mock_server = MockServer::start().await;
    mount_teams(&mock_server).await;
    let handler = handler_for(&mock_server).await;

    let mut request = PageRequest::first("Members", 1);
    loop {
        let page = handler.handle(&request).await.unwrap();
        if page.is_last() {
            break;
        }
        request = request.after(&page);
    }

    let outer_calls = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/teams")
        .count();
    assert_eq!(outer_calls, 2);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_retry_with_same_cursor_after_503() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups"))
        .respond_with(ResponseTemplate::new(503).insert_header("retry-after", "2"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_groups(&mock_server).await;

    let handler = handler_for(&mock_server).await;
    let request = PageRequest::first("Group", 3);

    let err = handler.handle(&request).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(2)));

    let page = handler.handle(&request).await.unwrap();
    assert_eq!(ids(&page), ["group1", "group2", "group3"]);
}

#[tokio::test]
async fn test_vendor_data_shape_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "teams": [{"name": "no id here"}]
        })))
        .mount(&mock_server)
        .await;

    let handler = handler_for(&mock_server).await;
    let err = handler
        .handle(&PageRequest::first("Members", 1))
        .await
        .unwrap_err();
    match err {
        Error::UpstreamDataShape { field, .. } => assert_eq!(field, "id"),
        other => panic!("Expected UpstreamDataShape, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_vendor_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let handler = handler_for(&mock_server).await;
    let err = handler
        .handle_with_timeout(&PageRequest::first("Group", 3), Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UpstreamTimeout { .. }));
}

#[tokio::test]
async fn test_request_rejections_make_no_vendor_calls() {
    let mock_server = MockServer::start().await;
    let handler = handler_for(&mock_server).await;

    let mut request = PageRequest::first("Group", 3);
    request.cursor = "eyJjdXJzb3IiOjB9".to_string();
    let err = handler.handle(&request).await.unwrap_err();
    assert!(matches!(err, Error::InvalidCursorState { .. }));

    let err = handler
        .handle(&PageRequest::first("Group", 51))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPageSize { .. }));

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
