use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use async_trait::async_trait;
use linky_core::{KvPage, KvStore, StorageError, RESERVED_KEY};
use linky_engine::{EngineConfig, HasherKind, LinkService};
use linky_gateway::{App, AppState};
use linky_generator::RandomGenerator;
use linky_storage::{InMemoryKv, LinkStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const API_KEY: &str = "test-api-key";
const SUPER_SECRET: &str = "test-super-secret";

struct TestApp {
    kv: InMemoryKv,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        Self::with(EngineConfig::builder().hasher(HasherKind::Sha256).build(), true)
    }

    fn with(config: EngineConfig, configure_super_secret: bool) -> Self {
        let kv = InMemoryKv::new();
        let engine = LinkService::new(LinkStore::new(kv.clone()), RandomGenerator::new(), config);
        let state = AppState::new(Arc::new(engine))
            .with_api_key(Some(API_KEY.to_string()))
            .with_super_secret(configure_super_secret.then(|| SUPER_SECRET.to_string()));

        Self {
            kv,
            router: App::router(state),
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn create(&self, body: Value) -> Response {
        self.send(
            Request::post("/api/create")
                .header(header::AUTHORIZATION, format!("Bearer {API_KEY}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn list(&self, super_secret: Option<&str>) -> Vec<Value> {
        let mut request =
            Request::get("/api/links").header(header::AUTHORIZATION, format!("Bearer {API_KEY}"));
        if let Some(secret) = super_secret {
            request = request.header("x-super-secret", secret);
        }

        let response = self.send(request.body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        match json_body(response).await {
            Value::Array(links) => links,
            other => panic!("listing is not an array: {other}"),
        }
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let app = TestApp::new();

    let response = app.send(get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn api_requires_api_key() {
    let app = TestApp::new();

    let response = app.send(get("/api/links")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(
            Request::get("/api/links")
                .header(header::AUTHORIZATION, "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_api_key_configuration_disables_api() {
    let engine = LinkService::new(
        LinkStore::new(InMemoryKv::new()),
        RandomGenerator::new(),
        EngineConfig::default(),
    );
    let router = App::router(AppState::new(Arc::new(engine)));

    let response = router
        .oneshot(
            Request::get("/api/links")
                .header(header::AUTHORIZATION, "Bearer anything")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_then_redirect() {
    let app = TestApp::new();

    let response = app.create(json!({"url": "https://a.example"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = json_body(response).await;
    let slug = created["slug"].as_str().unwrap().to_string();
    assert_eq!(slug.len(), 6);
    assert_eq!(created["url"], "https://a.example");
    assert_eq!(created["expiresAtUtc"], Value::Null);
    assert_eq!(created["passwordProtected"], false);

    let response = app.send(get(&format!("/{slug}"))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://a.example");

    let listed = app.list(None).await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["slug"], slug.as_str());
    assert_eq!(listed[0]["clicks"], 1);
}

#[tokio::test]
async fn invalid_input_is_bad_request_without_write() {
    let app = TestApp::new();

    for body in [
        json!({"url": ""}),
        json!({"url": "ftp://a.example"}),
        json!({"url": "https://a.example", "slug": "not valid"}),
        json!({"url": "https://a.example", "expiration": "someday"}),
    ] {
        let response = app.create(body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    assert!(app.kv.is_empty());
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let app = TestApp::new();

    let response = app.send(get("/nothing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_link_is_gone_then_not_found() {
    let app = TestApp::new();

    let response = app
        .create(json!({"url": "https://a.example", "slug": "old", "expiration": 0}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(app.send(get("/old")).await.status(), StatusCode::GONE);
    assert_eq!(app.send(get("/old")).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn password_prompt_and_unlock() {
    let app = TestApp::new();
    app.create(json!({"url": "https://a.example", "slug": "locked", "password": "pw"}))
        .await;

    let response = app.send(get("/locked")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text_body(response).await.contains("Enter password"));

    let form = |password: &str| {
        Request::post("/locked")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("password={password}")))
            .unwrap()
    };

    let response = app.send(form("nope")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.send(form("pw")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://a.example");

    let response = app
        .send(
            Request::get("/locked")
                .header(header::AUTHORIZATION, "Bearer pw")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let listed = app.list(Some(SUPER_SECRET)).await;
    assert_eq!(listed[0]["clicks"], 2);
}

#[tokio::test]
async fn privileged_listing_reveals_private_links() {
    let app = TestApp::new();
    app.create(json!({"url": "https://open.example", "slug": "open"}))
        .await;
    app.create(json!({"url": "https://private.example", "slug": "private", "password": "pw"}))
        .await;

    let public = app.list(None).await;
    assert_eq!(public.len(), 1);
    assert_eq!(public[0]["slug"], "open");

    let wrong = app.list(Some("guess")).await;
    assert_eq!(wrong.len(), 1);

    let privileged = app.list(Some(SUPER_SECRET)).await;
    assert_eq!(privileged.len(), 2);
    let private = &privileged[1];
    assert_eq!(private["slug"], "private");
    assert_eq!(private["passwordProtected"], true);
    assert_eq!(private["password"], "pw");
    assert_eq!(private["formattedExpiration"], "Never");
}

#[tokio::test]
async fn stored_secret_grants_privilege_when_none_configured() {
    let app = TestApp::with(EngineConfig::builder().hasher(HasherKind::Sha256).build(), false);
    app.kv
        .put(RESERVED_KEY, "stored-secret".to_string())
        .await
        .unwrap();
    app.create(json!({"url": "https://private.example", "slug": "private", "password": "pw"}))
        .await;

    assert!(app.list(Some(SUPER_SECRET)).await.is_empty());
    assert_eq!(app.list(Some("stored-secret")).await.len(), 1);

    let response = app.send(get(&format!("/{RESERVED_KEY}"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inspect_and_delete() {
    let app = TestApp::new();
    app.create(json!({"url": "https://a.example", "slug": "abc"}))
        .await;

    let authed = |method: &str, uri: &str| {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {API_KEY}"))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.send(authed("GET", "/api/links/abc")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["url"], "https://a.example");

    let response = app.send(authed("DELETE", "/api/links/abc")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.send(authed("DELETE", "/api/links/abc")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.send(authed("GET", "/api/links/abc")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.send(get("/abc")).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_can_require_privilege() {
    let app = TestApp::with(
        EngineConfig::builder()
            .hasher(HasherKind::Sha256)
            .require_privileged_delete(true)
            .build(),
        true,
    );
    app.create(json!({"url": "https://a.example", "slug": "abc"}))
        .await;

    let delete = |secret: Option<&str>| {
        let mut request = Request::delete("/api/links/abc")
            .header(header::AUTHORIZATION, format!("Bearer {API_KEY}"));
        if let Some(secret) = secret {
            request = request.header("x-super-secret", secret);
        }
        request.body(Body::empty()).unwrap()
    };

    assert_eq!(app.send(delete(None)).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        app.send(delete(Some(SUPER_SECRET))).await.status(),
        StatusCode::NO_CONTENT
    );
}

#[tokio::test]
async fn empty_listing_is_an_empty_array() {
    let app = TestApp::new();
    assert!(app.list(None).await.is_empty());
}

#[tokio::test]
async fn route_names_cannot_be_claimed() {
    let app = TestApp::new();

    for name in ["health", "api"] {
        let response = app
            .create(json!({"url": "https://evil.example", "slug": name}))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    assert!(app.kv.is_empty());

    let response = app.send(get("/health")).await;
    assert_eq!(json_body(response).await, json!({"status": "ok"}));
}

/// Backend whose every operation fails.
struct DownKv;

#[async_trait]
impl KvStore for DownKv {
    async fn get(&self, _key: &str) -> linky_core::Result<Option<String>> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }

    async fn put(&self, _key: &str, _value: String) -> linky_core::Result<()> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> linky_core::Result<()> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }

    async fn list(&self, _cursor: Option<&str>, _limit: usize) -> linky_core::Result<KvPage> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn storage_outage_is_service_unavailable() {
    let engine = LinkService::new(
        LinkStore::new(DownKv),
        RandomGenerator::new(),
        EngineConfig::builder().hasher(HasherKind::Sha256).build(),
    );
    let router = App::router(
        AppState::new(Arc::new(engine))
            .with_api_key(Some(API_KEY.to_string()))
            .with_super_secret(Some(SUPER_SECRET.to_string())),
    );
    let authed = |method: &str, uri: &str| {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {API_KEY}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"url": "https://a.example"}).to_string()))
            .unwrap()
    };

    for request in [
        get("/abc"),
        authed("GET", "/api/links"),
        authed("GET", "/api/links/abc"),
        authed("POST", "/api/create"),
    ] {
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
