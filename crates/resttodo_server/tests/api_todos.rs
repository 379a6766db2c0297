use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use resttodo_server::{build_router, AppState, ServerConfig};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const LANDING_HTML: &str = "<!doctype html><title>Todos</title>";

struct TestApp {
    _dir: TempDir,
    db_path: PathBuf,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let static_dir = dir.path().join("static");
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::write(static_dir.join("index.html"), LANDING_HTML).unwrap();
        std::fs::write(static_dir.join("app.js"), "fetchTodos();").unwrap();

        let db_path = dir.path().join("todos.db");
        let config = ServerConfig::builder()
            .db_path(db_path.clone())
            .static_dir(static_dir)
            .build();
        let state = Arc::new(AppState::new(config));
        state.storage.init().unwrap();

        Self {
            router: build_router(state),
            db_path,
            _dir: dir,
        }
    }

    async fn raw(&self, method: Method, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn json(&self, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let (status, bytes) = self.raw(method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(&self, body: Value) -> Value {
        let (status, todo) = self
            .json(Method::POST, "/api/todos", &body.to_string())
            .await;
        assert_eq!(status, StatusCode::CREATED);
        todo
    }

    async fn list(&self, uri: &str) -> Vec<Value> {
        let (status, todos) = self.json(Method::GET, uri, "").await;
        assert_eq!(status, StatusCode::OK);
        todos.as_array().unwrap().clone()
    }
}

#[tokio::test]
async fn end_to_end_lifecycle() {
    let app = TestApp::new();

    let created = app.create(json!({"title": "Buy milk"})).await;
    assert_eq!(created["title"], "Buy milk");
    assert_eq!(created["description"], "");
    assert_eq!(created["done"], false);
    assert_eq!(created["created_at"], created["updated_at"]);
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/todos/{id}");

    let (status, fetched) = app.json(Method::GET, &uri, "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, patched) = app.json(Method::PATCH, &uri, r#"{"done": true}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["done"], true);
    assert_eq!(patched["title"], "Buy milk");
    assert_eq!(patched["created_at"], created["created_at"]);
    assert!(patched["updated_at"].as_str().unwrap() >= created["updated_at"].as_str().unwrap());

    let (status, deleted) = app.json(Method::DELETE, &uri, "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({"deleted": id}));

    let (status, missing) = app.json(Method::GET, &uri, "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing, json!({"error": "Todo not found"}));

    let (status, again) = app.json(Method::DELETE, &uri, "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(again, json!({"error": "Todo not found"}));
}

#[tokio::test]
async fn create_accepts_description_and_done_without_content_type() {
    let app = TestApp::new();

    let created = app
        .create(json!({"title": "  Call mom  ", "description": "Sunday", "done": true}))
        .await;

    assert_eq!(created["title"], "Call mom");
    assert_eq!(created["description"], "Sunday");
    assert_eq!(created["done"], true);
}

#[tokio::test]
async fn create_rejects_blank_title_and_creates_nothing() {
    let app = TestApp::new();

    let (status, body) = app
        .json(Method::POST, "/api/todos", r#"{"title": "  "}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Title is required"}));

    let (status, body) = app
        .json(Method::POST, "/api/todos", r#"{"description": "no title"}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Title is required"}));

    assert!(app.list("/api/todos").await.is_empty());
}

#[tokio::test]
async fn create_rejects_malformed_bodies() {
    let app = TestApp::new();

    for body in ["", "{not json", "[1, 2]", r#"{"title": 42}"#] {
        let (status, error) = app.json(Method::POST, "/api/todos", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(error, json!({"error": "Invalid JSON body"}));
    }

    assert!(app.list("/api/todos").await.is_empty());
}

#[tokio::test]
async fn update_validates_body_and_leaves_record_unchanged() {
    let app = TestApp::new();
    let created = app.create(json!({"title": "Keep me"})).await;
    let uri = format!("/api/todos/{}", created["id"]);

    let (status, body) = app.json(Method::PATCH, &uri, "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No updatable fields provided"}));

    let (status, body) = app.json(Method::PUT, &uri, r#"{"title": " "}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Title cannot be empty"}));

    let (status, body) = app.json(Method::PUT, &uri, "nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid JSON body"}));

    let (_, current) = app.json(Method::GET, &uri, "").await;
    assert_eq!(current, created);
}

#[tokio::test]
async fn put_is_partial_like_patch() {
    let app = TestApp::new();
    let created = app
        .create(json!({"title": "Write report", "description": "Q3"}))
        .await;
    let uri = format!("/api/todos/{}", created["id"]);

    let (status, updated) = app
        .json(Method::PUT, &uri, r#"{"description": "Q4", "ignored": true}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "Q4");
    assert_eq!(updated["title"], "Write report");
    assert_eq!(updated["done"], false);

    let (status, updated) = app
        .json(Method::PUT, &uri, r#"{"title": "  Write final report ", "done": true}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Write final report");
    assert_eq!(updated["description"], "Q4");
    assert_eq!(updated["done"], true);

    let (status, updated) = app.json(Method::PATCH, &uri, r#"{"done": false}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["done"], false);
}

#[tokio::test]
async fn update_missing_todo_returns_not_found() {
    let app = TestApp::new();

    let (status, body) = app
        .json(Method::PATCH, "/api/todos/999", r#"{"done": true}"#)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Todo not found"}));
}

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    let app = TestApp::new();

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = app.json(method, "/api/todos/abc", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Todo not found"}));
    }
}

#[tokio::test]
async fn list_filters_by_done_and_search() {
    let app = TestApp::new();
    let milk = app.create(json!({"title": "Buy milk"})).await;
    let report = app
        .create(json!({"title": "Report", "description": "buy paper", "done": true}))
        .await;
    let walk = app.create(json!({"title": "Walk dog", "done": true})).await;

    let all = app.list("/api/todos").await;
    let ids: Vec<_> = all.iter().map(|todo| todo["id"].clone()).collect();
    assert_eq!(ids, vec![walk["id"].clone(), report["id"].clone(), milk["id"].clone()]);

    for uri in ["/api/todos?done=true", "/api/todos?done=1", "/api/todos?done=TRUE"] {
        let done = app.list(uri).await;
        assert_eq!(done.len(), 2, "{uri}");
        assert!(done.iter().all(|todo| todo["done"] == true));
    }

    for uri in ["/api/todos?done=false", "/api/todos?done=0"] {
        let pending = app.list(uri).await;
        assert_eq!(pending.len(), 1, "{uri}");
        assert_eq!(pending[0]["id"], milk["id"]);
    }

    assert_eq!(app.list("/api/todos?done=maybe").await.len(), 3);

    let search = app.list("/api/todos?q=buy").await;
    let ids: Vec<_> = search.iter().map(|todo| todo["id"].clone()).collect();
    assert_eq!(ids, vec![report["id"].clone(), milk["id"].clone()]);

    let combined = app.list("/api/todos?q=buy&done=false").await;
    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0]["id"], milk["id"]);

    assert!(app.list("/api/todos?q=nothing-matches").await.is_empty());
}

#[tokio::test]
async fn landing_page_and_assets_are_served() {
    let app = TestApp::new();

    let (status, body) = app.raw(Method::GET, "/", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), LANDING_HTML);

    let (status, body) = app.raw(Method::GET, "/app.js", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"fetchTodos();");
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/todos")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn unsupported_method_is_rejected() {
    let app = TestApp::new();

    let (status, _) = app.raw(Method::DELETE, "/api/todos", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn repeated_query_keys_use_first_value() {
    let app = TestApp::new();
    let milk = app.create(json!({"title": "Buy milk", "done": true})).await;
    app.create(json!({"title": "Buy bread"})).await;

    let done = app.list("/api/todos?done=true&done=false").await;
    assert_eq!(done.len(), 1);
    assert_eq!(done[0]["id"], milk["id"]);

    let search = app.list("/api/todos?q=milk&q=bread").await;
    assert_eq!(search.len(), 1);
    assert_eq!(search[0]["id"], milk["id"]);
}

#[tokio::test]
async fn non_boolean_done_is_read_by_truthiness() {
    let app = TestApp::new();

    let created = app.create(json!({"title": "x", "done": 1})).await;
    assert_eq!(created["done"], true);
    let uri = format!("/api/todos/{}", created["id"]);

    let (status, updated) = app.json(Method::PATCH, &uri, r#"{"done": 0}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["done"], false);

    let (status, updated) = app.json(Method::PUT, &uri, r#"{"done": "yes"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["done"], true);

    let created = app.create(json!({"title": "y", "done": ""})).await;
    assert_eq!(created["done"], false);
}

#[tokio::test]
async fn rows_from_older_databases_are_served() {
    let app = TestApp::new();
    let current = app.create(json!({"title": "Current"})).await;

    let conn = resttodo_core::db::open_db(&app.db_path).unwrap();
    conn.execute_batch(
        "INSERT INTO todos (title, description, done, created_at, updated_at)
         VALUES ('Legacy', NULL, 0, '2024-05-01T10:00:00.123456', '2024-05-01T10:00:00.123456');",
    )
    .unwrap();
    let legacy_id = conn.last_insert_rowid();
    drop(conn);

    let todos = app.list("/api/todos").await;
    assert_eq!(todos.len(), 2);
    assert!(todos.iter().any(|todo| todo["id"] == current["id"]));

    let (status, legacy) = app
        .json(Method::GET, &format!("/api/todos/{legacy_id}"), "")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(legacy["created_at"], "2024-05-01T10:00:00.123456");
    assert_eq!(legacy["description"], "");
}
