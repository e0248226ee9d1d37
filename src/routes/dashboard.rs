/**
 * Dashboard Routes
 * Read-only aggregation for the admin dashboard
 */
use axum::Json;
use serde::Serialize;

use crate::db::{
    self,
    models::{Message, Project},
};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct DashboardCounts {
    pub projects: i64,
    pub skills: i64,
    pub messages: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub counts: DashboardCounts,
    pub recent_messages: Vec<Message>,
    pub recent_projects: Vec<Project>,
}

/// GET /api/dashboard/stats
/// Counts plus the five most recent messages and projects (admin).
///
/// Each read is independent; a torn view across them is acceptable for a
/// dashboard.
pub async fn stats() -> Result<Json<DashboardStats>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let (projects,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
        .fetch_one(pool.as_ref())
        .await?;
    let (skills,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM skills")
        .fetch_one(pool.as_ref())
        .await?;
    let (messages,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
        .fetch_one(pool.as_ref())
        .await?;

    let recent_messages: Vec<Message> = sqlx::query_as(
        "SELECT id, name, email, subject, body, \"read\", starred, created_at \
         FROM messages ORDER BY created_at DESC LIMIT 5",
    )
    .fetch_all(pool.as_ref())
    .await?;

    let recent_projects: Vec<Project> = sqlx::query_as(
        "SELECT id, title, description, long_description, images, thumbnail, video, tags, \
             technologies, live_link, github_link, featured, status, \"order\", created_at \
         FROM projects ORDER BY created_at DESC LIMIT 5",
    )
    .fetch_all(pool.as_ref())
    .await?;

    Ok(Json(DashboardStats {
        counts: DashboardCounts {
            projects,
            skills,
            messages,
        },
        recent_messages,
        recent_projects,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_stats_without_database_returns_unavailable() {
        let app = Router::new().route("/api/dashboard/stats", get(stats));
        let req = Request::get("/api/dashboard/stats")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_stats_serializes_camel_case() {
        let stats = DashboardStats {
            counts: DashboardCounts {
                projects: 6,
                skills: 3,
                messages: 2,
            },
            recent_messages: vec![],
            recent_projects: vec![],
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["counts"]["projects"], 6);
        assert!(json.get("recentMessages").is_some());
        assert!(json.get("recentProjects").is_some());
    }
}
