#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use petitions_core::clock::ManualClock;
use petitions_source::{CacheConfig, FetchCache, PetitionSource, SourceError, UpstreamFetch};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use petitions_api::config::ServerConfig;
use petitions_api::routes;
use petitions_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// The milestone sweep is disabled; tests drive it directly.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        petitions_api_url: "http://upstream.test".to_string(),
        upstream_timeout_secs: 10,
        cache_ttl_secs: 30,
        cache_max_entries: 1024,
        milestone_check_interval_secs: 0,
    }
}

// ---------------------------------------------------------------------------
// Upstream stub
// ---------------------------------------------------------------------------

/// Canned upstream responses keyed by endpoint. Unknown endpoints answer 404.
#[derive(Default)]
pub struct StubUpstream {
    payloads: Mutex<HashMap<String, Result<Value, u16>>>,
    calls: AtomicUsize,
}

impl StubUpstream {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Serve `payload` for `endpoint`.
    pub fn serve(&self, endpoint: &str, payload: Value) {
        self.payloads
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), Ok(payload));
    }

    /// Fail `endpoint` with the given HTTP status.
    pub fn fail(&self, endpoint: &str, status: u16) {
        self.payloads
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), Err(status));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamFetch for StubUpstream {
    async fn fetch_json(&self, endpoint: &str) -> Result<Value, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let canned = self.payloads.lock().unwrap().get(endpoint).cloned();
        match canned {
            Some(Ok(payload)) => Ok(payload),
            Some(Err(status)) => Err(SourceError::Upstream {
                status,
                status_text: StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Error")
                    .to_string(),
            }),
            None => Err(SourceError::Upstream {
                status: 404,
                status_text: "Not Found".to_string(),
            }),
        }
    }
}

/// A petition source reading from `stub` through a cache on a manual clock.
pub fn petition_source(stub: &Arc<StubUpstream>) -> Arc<PetitionSource> {
    let cache = FetchCache::new(
        Arc::clone(stub) as Arc<dyn UpstreamFetch>,
        Arc::new(ManualClock::new()),
        CacheConfig::default(),
    );
    Arc::new(PetitionSource::new(cache))
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router with all middleware layers.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(pool: PgPool, petitions: Arc<PetitionSource>) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        petitions,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// A pool that never connects unless a query is issued. For tests that only
/// touch the upstream side.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost/petitions_unused")
        .unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Upstream fixtures
// ---------------------------------------------------------------------------

pub fn petition_json(id: i64, action: &str, count: i64) -> Value {
    json!({
        "type": "petition",
        "id": id,
        "links": { "self": format!("https://petition.parliament.uk/petitions/{id}.json") },
        "attributes": {
            "action": action,
            "background": "Background text",
            "additional_details": null,
            "state": "open",
            "signature_count": count,
            "created_at": "2024-05-01T10:00:00.000Z",
            "updated_at": "2024-05-02T10:00:00.000Z",
            "opened_at": "2024-05-01T12:00:00.000Z",
            "closed_at": null
        }
    })
}

pub fn page_json(data: Vec<Value>) -> Value {
    let link = "https://petition.parliament.uk/petitions.json?page=1&state=open";
    json!({
        "data": data,
        "links": {
            "self": link,
            "first": link,
            "last": "https://petition.parliament.uk/petitions.json?page=7&state=open",
            "next": "https://petition.parliament.uk/petitions.json?page=2&state=open",
            "prev": null
        }
    })
}
