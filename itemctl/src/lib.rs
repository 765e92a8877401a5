//! # itemctl: users and the items they own, over HTTP
//!
//! `itemctl` is a small CRUD service with two related entities. A **user** has an email, a
//! password (stored only as an Argon2id hash) and an active flag. An **item** has a title, an
//! optional description and the id of the user that owns it. Users are returned with their
//! items nested inside them.
//!
//! ## Architecture
//!
//! The HTTP layer is [Axum](https://github.com/tokio-rs/axum) and persistence is SQLite through
//! [sqlx](https://github.com/launchbadge/sqlx). A request flows through three layers:
//!
//! 1. **Handlers** ([`api::handlers`]) extract the path, query and JSON body, take a scoped
//!    session from the pool in [`AppState`], and map results to status codes.
//! 2. **Repositories** ([`db::handlers`]) run one query or single-row mutation on the session
//!    they borrow and return database records.
//! 3. **Models** ([`api::models`], [`db::models`]) keep the HTTP contract separate from the
//!    storage shape, so e.g. the password hash never reaches a response.
//!
//! Reads use a pooled connection. Writes run their existence check and the mutation inside
//! one transaction, committed just before responding; every other exit path drops the
//! transaction, which rolls it back.
//!
//! ## Routes
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | `POST` | `/users/` | [`api::handlers::users::create_user`] |
//! | `GET` | `/users/` | [`api::handlers::users::list_users`] |
//! | `GET` | `/users/{user_id}` | [`api::handlers::users::get_user`] |
//! | `PUT` | `/users/{user_id}` | [`api::handlers::users::update_user`] |
//! | `DELETE` | `/users/{user_id}` | [`api::handlers::users::delete_user`] |
//! | `POST` | `/users/{user_id}/items/` | [`api::handlers::items::create_item_for_user`] |
//! | `GET` | `/items/` | [`api::handlers::items::list_items`] |
//!
//! Collection routes also answer without the trailing slash. `/healthz`, `/openapi.json`,
//! `/docs` and (when enabled) `/internal/metrics` are served alongside.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use itemctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = itemctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     itemctl::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! Migrations are embedded in the binary and run on startup:
//!
//! ```no_run
//! # use sqlx::SqlitePool;
//! # async fn example(pool: SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
//! itemctl::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.
pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod password;
pub mod telemetry;
mod types;

#[cfg(test)]
pub mod test_utils;

use crate::config::CorsOrigin;
use crate::errors::ErrorBody;
use crate::openapi::ApiDoc;
use anyhow::Context;
use axum::{
    Json, Router,
    http::{self, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use sqlx::SqlitePool;
use std::any::Any;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{ItemId, UserId};

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder().db(pool).config(config).build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
}

/// Get the itemctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Open the configured database and bring its schema up to date.
#[instrument(skip_all)]
async fn setup_database(config: &Config) -> anyhow::Result<SqlitePool> {
    let slow_threshold = Duration::from_millis(config.slow_statement_threshold_ms);
    let pool = db::pools::create_pool(&config.database, slow_threshold)
        .await
        .with_context(|| format!("failed to open database at {}", config.database.url))?;

    migrator().run(&pool).await.context("failed to run database migrations")?;
    info!("Database ready");

    Ok(pool)
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.cors;

    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Browsers send the bare origin, without path or trailing slash
                origins.push(url.origin().ascii_serialization().parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::PUT, http::Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Turn a handler panic into the standard 500 body.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!("Request handler panicked: {detail}");

    let body = ErrorBody {
        detail: "Internal server error".to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Build the application router with all endpoints and middleware.
///
/// Layers, innermost first: panic recovery, CORS, optional Prometheus metrics, request tracing.
///
/// # Errors
///
/// Returns an error if a configured CORS origin can't be turned into a header value.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    use api::handlers::{items, users};

    let api_routes = Router::new()
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/users/", post(users::create_user).get(users::list_users))
        .route(
            "/users/{user_id}",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        .route("/users/{user_id}/items", post(items::create_item_for_user))
        .route("/users/{user_id}/items/", post(items::create_item_for_user))
        .route("/items", get(items::list_items))
        .route("/items/", get(items::list_items))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .merge(api_routes)
        .layer(CatchPanicLayer::custom(handle_panic));

    let mut router = router.layer(create_cors_layer(&state.config)?);

    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The assembled service: router, configuration and the pool it owns.
pub struct Application {
    router: Router,
    config: Config,
    pool: SqlitePool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create an application, reusing `pool` when given instead of opening the configured database.
    ///
    /// Migrations are run on the pool either way.
    pub async fn new_with_pool(config: Config, pool: Option<SqlitePool>) -> anyhow::Result<Self> {
        debug!("Starting itemctl with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => {
                migrator().run(&pool).await.context("failed to run database migrations")?;
                pool
            }
            None => setup_database(&config).await?,
        };

        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(&app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "itemctl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_config;
    use axum_test::TestServer;
    use url::Url;

    #[sqlx::test]
    #[test_log::test]
    async fn test_healthz(pool: SqlitePool) {
        let server = Application::new_with_pool(create_test_config(), Some(pool))
            .await
            .unwrap()
            .into_test_server();

        let response = server.get("/healthz").await;
        assert_eq!(response.status_code().as_u16(), 200);
        assert_eq!(response.text(), "OK");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_openapi_and_docs_endpoints(pool: SqlitePool) {
        let server = Application::new_with_pool(create_test_config(), Some(pool))
            .await
            .unwrap()
            .into_test_server();

        let response = server.get("/openapi.json").await;
        response.assert_status_ok();
        let doc: serde_json::Value = response.json();
        assert!(doc["openapi"].as_str().unwrap().starts_with("3."));
        assert!(doc["paths"]["/users/{user_id}"].is_object());

        let response = server.get("/docs").await;
        response.assert_status_ok();
        assert!(response.text().contains("<html"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_build_router_with_metrics_disabled(pool: SqlitePool) {
        let state = AppState::builder().db(pool).config(create_test_config()).build();
        let server = TestServer::new(build_router(&state).unwrap()).unwrap();

        server.get("/internal/metrics").await.assert_status(StatusCode::NOT_FOUND);
    }

    // The only test that installs the global Prometheus recorder
    #[sqlx::test]
    #[test_log::test]
    async fn test_build_router_with_metrics_enabled(pool: SqlitePool) {
        let mut config = create_test_config();
        config.enable_metrics = true;
        let state = AppState::builder().db(pool).config(config).build();
        let server = TestServer::new(build_router(&state).unwrap()).unwrap();

        server.get("/healthz").await.assert_status_ok();

        let metrics_response = server.get("/internal/metrics").await;
        assert_eq!(metrics_response.status_code().as_u16(), 200);
        let metrics_content = metrics_response.text();
        assert!(metrics_content.contains("# HELP") || metrics_content.contains("# TYPE"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_wildcard_cors(pool: SqlitePool) {
        let state = AppState::builder().db(pool).config(create_test_config()).build();
        let server = TestServer::new(build_router(&state).unwrap()).unwrap();

        let response = server.get("/healthz").add_header("origin", "https://anywhere.example").await;

        response.assert_status_ok();
        assert_eq!(response.headers().get("access-control-allow-origin").unwrap(), "*");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_explicit_cors_origins(pool: SqlitePool) {
        let mut config = create_test_config();
        config.cors.allowed_origins = vec![CorsOrigin::Url(Url::parse("https://app.example.com").unwrap())];
        let state = AppState::builder().db(pool).config(config).build();
        let server = TestServer::new(build_router(&state).unwrap()).unwrap();

        let allowed = server.get("/healthz").add_header("origin", "https://app.example.com").await;
        assert_eq!(
            allowed.headers().get("access-control-allow-origin").unwrap(),
            "https://app.example.com"
        );

        let denied = server.get("/healthz").add_header("origin", "https://evil.example").await;
        assert!(denied.headers().get("access-control-allow-origin").is_none());
    }

    async fn boom() -> &'static str {
        panic!("kaboom")
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_500() {
        let router = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));
        let server = TestServer::new(router).unwrap();

        let response = server.get("/boom").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&serde_json::json!({ "detail": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_application_opens_configured_database() {
        let mut config = create_test_config();
        config.database.url = "sqlite::memory:".to_string();

        let server = Application::new(config).await.unwrap().into_test_server();

        server.get("/users/").await.assert_status_ok();
    }
}
