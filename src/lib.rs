//! Portfolio API - library for app logic and testing

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod routes;
pub mod tracking;

use axum::{
    handler::Handler,
    http::{HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use crate::config::{AppConfig, DEFAULT_JWT_SECRET};
use crate::routes::MessageResponse;

/// Request body cap. Generous because project images arrive as base64
/// strings in the JSON payload.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Shared state handed to handlers and the auth guard.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

/// Build the CORS layer from the configured origin list.
pub fn configure_cors(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

/// Catch-all for undefined API routes so clients never see an HTML fallback.
async fn api_not_found() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse::new("API route not found")),
    )
}

/// Create and configure the application router.
///
/// Admin-only handlers are wrapped individually with the auth guard, so a
/// path can expose a public GET next to a protected mutation.
pub fn create_app(config: Arc<AppConfig>) -> Router {
    let state = AppState { config };
    let cors = configure_cors(&state.config);
    let guard = middleware::from_fn_with_state(state.clone(), auth::require_admin);

    Router::new()
        .route("/api/auth/login", post(routes::auth::login))
        .route(
            "/api/auth/profile",
            put(routes::auth::update_admin_profile.layer(guard.clone())),
        )
        .route("/api/auth/me", get(routes::auth::me.layer(guard.clone())))
        .route(
            "/api/profile",
            get(routes::profile::get_profile)
                .put(routes::profile::update_profile.layer(guard.clone())),
        )
        .route(
            "/api/projects",
            get(routes::projects::list_projects)
                .post(routes::projects::create_project.layer(guard.clone())),
        )
        .route(
            "/api/projects/{id}",
            put(routes::projects::update_project.layer(guard.clone()))
                .delete(routes::projects::delete_project.layer(guard.clone())),
        )
        .route(
            "/api/skills",
            get(routes::skills::list_skills)
                .post(routes::skills::create_skill.layer(guard.clone())),
        )
        .route(
            "/api/skills/{id}",
            put(routes::skills::update_skill.layer(guard.clone()))
                .delete(routes::skills::delete_skill.layer(guard.clone())),
        )
        .route(
            "/api/about",
            get(routes::about::list_visible_items)
                .post(routes::about::create_item.layer(guard.clone())),
        )
        .route(
            "/api/about/all",
            get(routes::about::list_all_items.layer(guard.clone())),
        )
        .route(
            "/api/about/{id}",
            put(routes::about::update_item.layer(guard.clone()))
                .delete(routes::about::delete_item.layer(guard.clone())),
        )
        .route(
            "/api/messages",
            get(routes::messages::list_messages.layer(guard.clone()))
                .post(routes::messages::create_message),
        )
        .route(
            "/api/messages/{id}",
            put(routes::messages::update_message.layer(guard.clone()))
                .delete(routes::messages::delete_message.layer(guard.clone())),
        )
        .route(
            "/api/dashboard/stats",
            get(routes::dashboard::stats.layer(guard.clone())),
        )
        .route("/api/leetcode/{username}", get(routes::leetcode::user_calendar))
        .route("/api/health", get(routes::health::health_ping))
        .fallback(api_not_found)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        // Compress responses with gzip/br/zstd automatically
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(middleware::from_fn(tracking::track_visitor))
        .with_state(state)
}

/// Run the server (used by main).
pub async fn run() {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().into_shared();

    // Guards MUST be held for the programme's lifetime; dropping them early
    // shuts down background log-writer threads and loses buffered log lines.
    let _log_guards = logging::init(&config);

    routes::health::init_start_time();

    // Refuse to start in production with the insecure default JWT secret.
    if config.is_production() && config.jwt_secret == DEFAULT_JWT_SECRET {
        panic!(
            "FATAL: JWT_SECRET must be set to a secure, unique value in production. \
             Refusing to start with the default secret."
        );
    }

    if config.database_url.is_some() {
        match db::init_pool(&config).await {
            Ok(pool) => {
                if let Err(e) = db::run_migrations(&pool).await {
                    tracing::error!("Failed to run database migrations: {}", e);
                } else if let Err(e) = db::seed_default_admin(&pool, &config).await {
                    tracing::error!("Failed to seed default admin: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize database pool: {}. Continuing without database.",
                    e
                );
            }
        }
    } else {
        tracing::info!("DATABASE_URL not set. Running without database connection.");
    }

    let app = create_app(config.clone());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT configuration");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app() -> Router {
        create_app(AppConfig::load().into_shared())
    }

    #[test]
    fn test_create_app_returns_router() {
        let _app = test_app();
    }

    #[tokio::test]
    async fn test_unknown_api_route_returns_json_404() {
        let req = Request::get("/api/does-not-exist")
            .body(Body::empty())
            .unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "API route not found");
    }

    #[tokio::test]
    async fn test_health_route_is_public() {
        let req = Request::get("/api/health").body(Body::empty()).unwrap();
        let res = test_app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_reject_missing_token() {
        for (method, uri) in [
            ("GET", "/api/auth/me"),
            ("GET", "/api/about/all"),
            ("GET", "/api/messages"),
            ("GET", "/api/dashboard/stats"),
            ("DELETE", "/api/projects/6f4b8c1e-9a2d-4f3b-8c1e-9a2d4f3b8c1e"),
        ] {
            let req = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let res = test_app().oneshot(req).await.unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        }
    }
}
