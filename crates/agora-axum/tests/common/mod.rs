//! Shared harness for agora-axum route tests.
//!
//! Builds the full router over an in-memory database and provider fakes, and
//! drives it with `tower::ServiceExt::oneshot`.

// Each test binary uses a different subset of the helpers
#![allow(dead_code)]

use agora_axum::bootstrap::{AxumContext, CorsConfig};
use agora_axum::routes::create_router;
use agora_core::services::PasswordCost;
use agora_core::testing::FakeProviders;
use agora_core::{CoreOptions, PlantIdentification, Providers};
use agora_db::TestDb;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Base64 of the bytes `fake image`.
pub const IMAGE_BASE64: &str = "ZmFrZSBpbWFnZQ==";

pub fn dandelion() -> PlantIdentification {
    PlantIdentification {
        species: "Common dandelion".to_string(),
        scientific_name: Some("Taraxacum officinale".to_string()),
        confidence: 0.91,
        common_names: vec!["Common dandelion".to_string(), "Dandelion".to_string()],
    }
}

pub struct TestApp {
    pub router: Router,
    pub fakes: FakeProviders,
    _db: TestDb,
}

impl TestApp {
    /// App whose identifier recognises every photo as a dandelion.
    pub async fn new() -> Self {
        let fakes = FakeProviders::new(dandelion());
        let providers = fakes.providers();
        Self::build(fakes, providers, &CorsConfig::AllowAll).await
    }

    /// App with no third-party provider configured.
    pub async fn unconfigured() -> Self {
        Self::build(
            FakeProviders::new(dandelion()),
            Providers::unconfigured(),
            &CorsConfig::AllowAll,
        )
        .await
    }

    pub async fn with_cors(cors: &CorsConfig) -> Self {
        let fakes = FakeProviders::new(dandelion());
        let providers = fakes.providers();
        Self::build(fakes, providers, cors).await
    }

    async fn build(fakes: FakeProviders, providers: Providers, cors: &CorsConfig) -> Self {
        let db = TestDb::new().await.expect("in-memory database");
        let options = CoreOptions {
            password_cost: PasswordCost::minimal(),
            ..CoreOptions::default()
        };
        let core = db.app_core(providers, options).expect("app core");
        let router = create_router(AxumContext::new(core), cors);
        Self {
            router,
            fakes,
            _db: db,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a JSON request and decode the JSON response body.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(json_request(method, uri, token, body)).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    /// Register a user and return their session token.
    pub async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .post(
                "/api/add_user",
                None,
                serde_json::json!({ "username": username, "password": "hunter22" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register {username}: {body}");
        body["token"].as_str().unwrap().to_string()
    }
}

pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
