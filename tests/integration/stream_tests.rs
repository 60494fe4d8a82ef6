//! Integration tests for stream traversal
//!
//! These tests use wiremock to serve feed pages and event documents over HTTP
//! and drive the real `HttpTransport` end-to-end.

use futures::TryStreamExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use sumi_stream::config::{parse_config, UserAgentConfig};
use sumi_stream::transport::{build_http_client, HttpTransport, Transport, CONTENT_TYPE_ATOM};
use sumi_stream::{EventStore, StreamError};
use url::Url;
use wiremock::matchers::{body_json, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_transport(base_url: &str) -> HttpTransport {
    let user_agent = UserAgentConfig {
        client_name: "TestClient".to_string(),
        client_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    };
    let client = build_http_client(&user_agent, Duration::from_secs(5), Duration::from_secs(1))
        .expect("Failed to build client");
    HttpTransport::new(client, Url::parse(base_url).expect("Failed to parse base URL"))
}

fn create_store(server: &MockServer) -> EventStore {
    EventStore::new(Arc::new(create_transport(&server.uri()))).with_concurrency(2)
}

/// Atom entry whose alternate link is absolute, as the service writes them
fn entry(base: &str, number: u64) -> Value {
    let uri = format!("{}/streams/orders/{}", base, number);
    json!({
        "title": format!("{}@orders", number),
        "id": uri,
        "updated": "2024-03-01T09:15:42.123456Z",
        "author": {"name": "EventStore"},
        "summary": "OrderPlaced",
        "links": [
            {"uri": uri, "relation": "edit"},
            {"uri": uri, "relation": "alternate"}
        ]
    })
}

fn page(base: &str, id: &str, links: &[(&str, &str)], numbers: &[u64]) -> Value {
    let links: Vec<Value> = links
        .iter()
        .map(|(relation, p)| json!({"uri": format!("{}{}", base, p), "relation": relation}))
        .collect();
    let entries: Vec<Value> = numbers.iter().map(|n| entry(base, *n)).collect();

    json!({
        "title": "Event stream 'orders'",
        "id": format!("{}{}", base, id),
        "updated": "2024-03-01T09:15:42.123456Z",
        "streamId": "orders",
        "author": {"name": "EventStore"},
        "headOfStream": true,
        "links": links,
        "entries": entries
    })
}

/// Event document wrapped in an Atom entry, as returned for the atom media type
fn event(number: u64) -> Value {
    json!({
        "title": format!("{}@orders", number),
        "id": format!("http://127.0.0.1:2113/streams/orders/{}", number),
        "updated": "2024-03-01T09:15:42.123456Z",
        "author": {"name": "EventStore"},
        "summary": "OrderPlaced",
        "content": {
            "eventStreamId": "orders",
            "eventNumber": number,
            "eventType": "OrderPlaced",
            "eventId": format!("00000000-0000-0000-0000-{:012}", number),
            "data": {"orderId": number},
            "metadata": ""
        },
        "links": []
    })
}

/// Mounts a two-page stream: root -> first/last, [0,1,2] <-> [3,4]
async fn mount_two_page_stream(server: &MockServer) {
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/streams/orders"))
        .and(header("accept", CONTENT_TYPE_ATOM))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            &base,
            "/streams/orders",
            &[
                ("self", "/streams/orders"),
                ("first", "/streams/orders/0/forward/3"),
                ("last", "/streams/orders/3/forward/3"),
            ],
            &[4, 3],
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/streams/orders/0/forward/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            &base,
            "/streams/orders/0/forward/3",
            &[("next", "/streams/orders/3/forward/3")],
            &[0, 1, 2],
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/streams/orders/3/forward/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            &base,
            "/streams/orders/3/forward/3",
            &[("previous", "/streams/orders/0/forward/3")],
            &[3, 4],
        )))
        .mount(server)
        .await;

    for n in 0..5u64 {
        Mock::given(method("GET"))
            .and(path(format!("/streams/orders/{}", n)))
            .and(header("accept", CONTENT_TYPE_ATOM))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(event(n))
                    .set_delay(Duration::from_millis(10 * (5 - n))),
            )
            .mount(server)
            .await;
    }
}

async fn collect_numbers(events: sumi_stream::EventStream) -> Result<Vec<u64>, StreamError> {
    events.map_ok(|e| e.event_number).try_collect().await
}

#[tokio::test]
async fn test_read_forwards_over_http() {
    let server = MockServer::start().await;
    mount_two_page_stream(&server).await;

    let store = create_store(&server);
    let numbers = collect_numbers(store.stream("orders").read_forwards())
        .await
        .expect("Forward read failed");

    assert_eq!(numbers, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_read_backwards_over_http() {
    let server = MockServer::start().await;
    mount_two_page_stream(&server).await;

    let store = create_store(&server);
    let numbers = collect_numbers(store.stream("orders").read_backwards())
        .await
        .expect("Backward read failed");

    assert_eq!(numbers, vec![4, 3, 2, 1, 0]);
}

#[tokio::test]
async fn test_user_agent_and_default_headers_are_sent() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/streams/orders"))
        .and(header("content-type", CONTENT_TYPE_ATOM))
        .and(header("accept", CONTENT_TYPE_ATOM))
        .and(header_regex("user-agent", r"^TestClient/1\.0\.0 "))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            &base,
            "/streams/orders",
            &[],
            &[],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let store = create_store(&server);
    let head = store.stream("orders").read().await.expect("Head read failed");

    assert!(head.is_empty());
    assert!(head.head_of_stream);
}

#[tokio::test]
async fn test_failed_enrichment_aborts_read() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/streams/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            &base,
            "/streams/orders",
            &[],
            &[1, 0],
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/streams/orders/0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event(0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/streams/orders/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = create_store(&server);
    let err = collect_numbers(store.stream("orders").read_backwards())
        .await
        .unwrap_err();

    assert!(err.is_transport());
    match err {
        StreamError::Batch { source, .. } => {
            assert!(matches!(*source, StreamError::Status { status: 500, .. }))
        }
        other => panic!("expected batch failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_stream_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/streams/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = create_store(&server);
    let err = store.stream("missing").read().await.unwrap_err();

    assert!(matches!(err, StreamError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_page_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/streams/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"title\": \"orders\""))
        .mount(&server)
        .await;

    let store = create_store(&server);
    let err = collect_numbers(store.stream("orders").read_forwards())
        .await
        .unwrap_err();

    assert!(err.is_parse());
}

#[tokio::test]
async fn test_read_event_unwraps_atom_content() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/streams/orders/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event(7)))
        .expect(1)
        .mount(&server)
        .await;

    let store = create_store(&server);
    let event = store
        .stream("orders")
        .read_event(7)
        .await
        .expect("Event read failed");

    assert_eq!(event.event_number, 7);
    assert_eq!(event.data["orderId"], 7);
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/streams/orders"))
        .and(header("content-type", CONTENT_TYPE_ATOM))
        .and(body_json(json!({"ping": true})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let transport = create_transport(&server.uri());
    let document = transport
        .post("streams/orders", Default::default(), json!({"ping": true}))
        .await
        .expect("POST failed");

    assert_eq!(document, Value::Null);
}

#[tokio::test]
async fn test_store_from_config() {
    let server = MockServer::start().await;
    mount_two_page_stream(&server).await;

    let config = parse_config(&format!(
        r#"
[server]
base-url = "{}"
request-timeout = 5000
connect-timeout = 1000

[reader]
concurrency = 1

[user-agent]
client-name = "TestClient"
client-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
"#,
        server.uri()
    ))
    .expect("Invalid config");

    let store = EventStore::from_config(&config).expect("Failed to build store");
    let numbers = collect_numbers(store.stream("orders").read_forwards())
        .await
        .expect("Forward read failed");

    assert_eq!(numbers, vec![0, 1, 2, 3, 4]);
}
