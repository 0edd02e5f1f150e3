use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use wild_erp_api::{
    api_routes,
    config::AppConfig,
    db::{self, DbConfig},
    handlers::AppServices,
    AppState,
};

/// Helper harness for spinning up an application state backed by an
/// in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // A single connection keeps the in-memory database alive for the
        // lifetime of the pool.
        let db_cfg = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(5),
        };

        let pool = db::establish_connection_with_config(&db_cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let cfg = AppConfig {
            database_url: db_cfg.url.clone(),
            host: "127.0.0.1".to_string(),
            port: 15_000,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            log_json: false,
            auto_migrate: false,
            cors_allowed_origins: None,
            db_max_connections: 1,
            db_min_connections: 1,
            db_connect_timeout_secs: 5,
            db_idle_timeout_secs: 600,
            db_acquire_timeout_secs: 5,
            request_timeout_secs: 5,
        };

        let db_arc = Arc::new(pool);
        let services = AppServices::new(db_arc.clone());

        let state = AppState {
            db: db_arc,
            config: cfg,
            services,
        };

        let router = Router::new()
            .nest("/api", api_routes())
            .with_state(state.clone());

        Self { router, state }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send a request, asserting and consuming the response into parsed JSON.
    pub async fn request_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let json = serde_json::from_slice(&bytes).expect("parse response body");
        (status, json)
    }
}
