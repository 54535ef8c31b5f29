use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};

use stockroom_api::middleware::SESSION_HEADER;
use stockroom_api::session::SessionRegistry;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = stockroom_api::app::build_app(Arc::new(SessionRegistry::new()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn start_session(&self) -> String {
        let resp = self.client.post(self.url("/sessions")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.unwrap();
        assert!(body["started_at"].is_string());
        body["session_id"].as_str().unwrap().to_string()
    }

    async fn add(&self, session: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(self.url("/inventory/items"))
            .header(SESSION_HEADER, session)
            .json(&body)
            .send()
            .await
            .unwrap();
        (resp.status(), resp.json().await.unwrap())
    }

    async fn remove(&self, session: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .delete(self.url("/inventory/items"))
            .header(SESSION_HEADER, session)
            .json(&body)
            .send()
            .await
            .unwrap();
        (resp.status(), resp.json().await.unwrap())
    }

    async fn view(&self, session: &str) -> Value {
        let resp = self
            .client
            .get(self.url("/inventory"))
            .header(SESSION_HEADER, session)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_needs_no_session() {
    let server = TestServer::spawn().await;
    let resp = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn inventory_routes_require_session_header() {
    let server = TestServer::spawn().await;

    let resp = server.client.get(server.url("/inventory")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "missing_session");

    let resp = server
        .client
        .get(server.url("/inventory"))
        .header(SESSION_HEADER, "not-a-uuid")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "invalid_session");
}

#[tokio::test]
async fn new_session_renders_placeholder() {
    let server = TestServer::spawn().await;
    let session = server.start_session().await;

    let view = server.view(&session).await;
    assert_eq!(view["items"], json!([]));
    assert_eq!(view["state"], "empty");
    assert_eq!(view["placeholder"], "Inventory is empty. Add a new item above!");
}

#[tokio::test]
async fn add_twice_then_remove_all() {
    let server = TestServer::spawn().await;
    let session = server.start_session().await;

    let (status, view) = server.add(&session, json!({ "name": "Bolt", "quantity": 10 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["message"], "Added: 10x Bolt to inventory!");
    assert_eq!(view["items"], json!([{ "name": "Bolt", "quantity": 10 }]));
    assert!(view.get("placeholder").is_none());

    let (_, view) = server.add(&session, json!({ "name": "Bolt", "quantity": 5 })).await;
    assert_eq!(
        view["items"],
        json!([{ "name": "Bolt", "quantity": 10 }, { "name": "Bolt", "quantity": 5 }])
    );
    assert_eq!(view["total_quantity"], 15);

    let (status, view) = server.remove(&session, json!({ "name": "Bolt" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["message"], "Removed all entries for: Bolt");
    assert_eq!(view["items"], json!([]));
    assert_eq!(view["state"], "empty");
}

#[tokio::test]
async fn add_trims_and_defaults_quantity() {
    let server = TestServer::spawn().await;
    let session = server.start_session().await;

    let (status, view) = server.add(&session, json!({ "name": "  Nut  " })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["items"], json!([{ "name": "Nut", "quantity": 1 }]));
}

#[tokio::test]
async fn add_rejects_blank_name_and_bad_quantity() {
    let server = TestServer::spawn().await;
    let session = server.start_session().await;

    let (status, body) = server.add(&session, json!({ "name": "   ", "quantity": 2 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "Enter an item name to add it.");

    let (status, body) = server.add(&session, json!({ "name": "Nut", "quantity": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    assert_eq!(server.view(&session).await["items"], json!([]));
}

#[tokio::test]
async fn remove_without_selection_is_rejected() {
    let server = TestServer::spawn().await;
    let session = server.start_session().await;

    let (status, body) = server.remove(&session, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "not_selected");

    let (status, body) = server.remove(&session, json!({ "name": " " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "not_selected");
}

#[tokio::test]
async fn removing_unknown_name_leaves_inventory_unchanged() {
    let server = TestServer::spawn().await;
    let session = server.start_session().await;
    server.add(&session, json!({ "name": "Nut", "quantity": 2 })).await;

    let (status, view) = server.remove(&session, json!({ "name": "Screw" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["items"], json!([{ "name": "Nut", "quantity": 2 }]));
}

#[tokio::test]
async fn names_are_distinct_in_first_seen_order() {
    let server = TestServer::spawn().await;
    let session = server.start_session().await;
    for name in ["Nut", "Bolt", "Nut"] {
        server.add(&session, json!({ "name": name, "quantity": 1 })).await;
    }

    let resp = server
        .client
        .get(server.url("/inventory/names"))
        .header(SESSION_HEADER, session.as_str())
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["names"], json!(["Nut", "Bolt"]));
}

#[tokio::test]
async fn sessions_do_not_share_inventory() {
    let server = TestServer::spawn().await;
    let a = server.start_session().await;
    let b = server.start_session().await;

    server.add(&a, json!({ "name": "Bolt", "quantity": 3 })).await;

    assert_eq!(server.view(&a).await["items"].as_array().unwrap().len(), 1);
    assert_eq!(server.view(&b).await["items"], json!([]));
}

#[tokio::test]
async fn ending_session_discards_inventory() {
    let server = TestServer::spawn().await;
    let session = server.start_session().await;
    server.add(&session, json!({ "name": "Bolt", "quantity": 3 })).await;

    let resp = server
        .client
        .delete(server.url("/session"))
        .header(SESSION_HEADER, session.as_str())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert_eq!(server.view(&session).await["state"], "empty");
}

#[tokio::test]
async fn bodiless_remove_means_nothing_selected() {
    let server = TestServer::spawn().await;
    let session = server.start_session().await;
    server.add(&session, json!({ "name": "Nut", "quantity": 2 })).await;

    let resp = server
        .client
        .delete(server.url("/inventory/items"))
        .header(SESSION_HEADER, session.as_str())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "not_selected");
    assert_eq!(body["message"], "No item selected for removal.");

    assert_eq!(server.view(&session).await["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_add_form_asks_for_a_name() {
    let server = TestServer::spawn().await;
    let session = server.start_session().await;

    let (status, body) = server.add(&session, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "Enter an item name to add it.");
}

#[tokio::test]
async fn out_of_range_quantity_is_a_json_validation_error() {
    let server = TestServer::spawn().await;
    let session = server.start_session().await;

    let resp = server
        .client
        .post(server.url("/inventory/items"))
        .header(SESSION_HEADER, session.as_str())
        .header("content-type", "application/json")
        .body(r#"{ "name": "Nut", "quantity": 99999999999999999999 }"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let (status, body) = server
        .add(&session, json!({ "name": "Nut", "quantity": 5_000_000_000i64 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    assert_eq!(server.view(&session).await["items"], json!([]));
}

#[tokio::test]
async fn malformed_add_bodies_get_json_errors() {
    let server = TestServer::spawn().await;
    let session = server.start_session().await;

    let resp = server
        .client
        .post(server.url("/inventory/items"))
        .header(SESSION_HEADER, session.as_str())
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");

    let resp = server
        .client
        .post(server.url("/inventory/items"))
        .header(SESSION_HEADER, session.as_str())
        .body("name=Nut")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");
}
