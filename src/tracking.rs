//! Passive visitor tracking.
//!
//! Records metadata for qualifying page requests. Strictly best-effort: the
//! insert runs on a detached task and any failure is logged and swallowed,
//! so tracking can never delay or fail the request it observed.

use axum::{
    extract::{ConnectInfo, Request},
    http::{header, Method},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

use crate::db;

/// Page views only: GET requests outside the API surface that don't look
/// like static-asset fetches.
fn qualifies(method: &Method, path: &str) -> bool {
    method == Method::GET && !path.starts_with("/api") && !path.contains('.')
}

pub async fn track_visitor(request: Request, next: Next) -> Response {
    if qualifies(request.method(), request.uri().path()) {
        let ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip().to_string());
        let user_agent = request
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let path = request.uri().to_string();

        tokio::spawn(record_visit(ip, user_agent, path));
    }

    next.run(request).await
}

async fn record_visit(ip: Option<String>, user_agent: Option<String>, path: String) {
    let Some(pool) = db::get_pool() else {
        tracing::debug!("visitor tracking skipped: database not available");
        return;
    };

    if let Err(e) = sqlx::query("INSERT INTO visitors (ip, user_agent, path) VALUES ($1, $2, $3)")
        .bind(&ip)
        .bind(&user_agent)
        .bind(&path)
        .execute(pool.as_ref())
        .await
    {
        tracing::warn!("Tracking error: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::middleware;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    #[test]
    fn test_qualifies_page_requests_only() {
        assert!(qualifies(&Method::GET, "/"));
        assert!(qualifies(&Method::GET, "/projects"));
        assert!(!qualifies(&Method::GET, "/api/projects"));
        assert!(!qualifies(&Method::GET, "/favicon.ico"));
        assert!(!qualifies(&Method::GET, "/assets/app.js"));
        assert!(!qualifies(&Method::POST, "/contact"));
    }

    #[tokio::test]
    async fn test_tracking_never_blocks_the_request() {
        // No pool is initialized here; the request must still succeed.
        let app = Router::new()
            .route("/", get(|| async { "home" }))
            .layer(middleware::from_fn(track_visitor));
        let req = HttpRequest::get("/").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
