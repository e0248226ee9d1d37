/**
 * Profile Routes
 * Singleton profile with a self-healing read path
 */
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::config::LEGACY_PROFILE_PLACEHOLDER;
use crate::db::{
    self,
    models::{Profile, SocialLinks, PROFILE_DEFAULTS},
};
use crate::error::ApiError;

const PROFILE_COLUMNS: &str = "id, name, title, bio, resume_url, social_links, created_at, updated_at";

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub resume_url: Option<String>,
    pub social_links: Option<SocialLinks>,
}

/// Fetch the singleton profile, repairing known-bad state on the way.
///
/// A missing row, or one still carrying the legacy placeholder name, is
/// replaced with a freshly created default-valued profile. One-time
/// migration shim; steady-state traffic takes the first branch.
async fn ensure_profile(pool: &PgPool) -> Result<Profile, ApiError> {
    let existing: Option<Profile> = sqlx::query_as(&format!(
        "SELECT {} FROM profiles ORDER BY created_at ASC LIMIT 1",
        PROFILE_COLUMNS
    ))
    .fetch_optional(pool)
    .await?;

    if let Some(profile) = existing {
        if profile.name != LEGACY_PROFILE_PLACEHOLDER {
            return Ok(profile);
        }
        tracing::info!("Replacing stale placeholder profile {}", profile.id);
        sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(profile.id)
            .execute(pool)
            .await?;
    }

    let created: Profile = sqlx::query_as(&format!(
        "INSERT INTO profiles (name, title, bio, resume_url, social_links) \
         VALUES ($1, $2, $3, '', $4) \
         RETURNING {}",
        PROFILE_COLUMNS
    ))
    .bind(PROFILE_DEFAULTS.name)
    .bind(PROFILE_DEFAULTS.title)
    .bind(PROFILE_DEFAULTS.bio)
    .bind(sqlx::types::Json(SocialLinks::default()))
    .fetch_one(pool)
    .await?;

    Ok(created)
}

/// GET /api/profile
/// Public read of the singleton profile; creates it lazily when absent.
pub async fn get_profile() -> Result<Json<Profile>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let profile = ensure_profile(pool.as_ref()).await?;
    Ok(Json(profile))
}

/// PUT /api/profile
/// Update the singleton profile, creating it first when necessary.
pub async fn update_profile(
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;
    let existing = ensure_profile(pool.as_ref()).await?;

    let name = payload.name.unwrap_or(existing.name);
    let title = payload.title.unwrap_or(existing.title);
    let bio = payload.bio.unwrap_or(existing.bio);
    let resume_url = payload.resume_url.unwrap_or(existing.resume_url);
    let social_links = payload
        .social_links
        .map(sqlx::types::Json)
        .unwrap_or(existing.social_links);

    let updated: Profile = sqlx::query_as(&format!(
        "UPDATE profiles \
         SET name = $1, title = $2, bio = $3, resume_url = $4, social_links = $5, \
             updated_at = now() \
         WHERE id = $6 \
         RETURNING {}",
        PROFILE_COLUMNS
    ))
    .bind(&name)
    .bind(&title)
    .bind(&bio)
    .bind(&resume_url)
    .bind(&social_links)
    .bind(existing.id)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::{get, put};
    use axum::Router;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_get_profile_without_database_returns_unavailable() {
        let app = Router::new().route("/api/profile", get(get_profile));
        let req = Request::get("/api/profile").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_update_profile_without_database_returns_unavailable() {
        let app = Router::new().route("/api/profile", put(update_profile));
        let body = Body::from(serde_json::to_vec(&UpdateProfileRequest::default()).unwrap());
        let req = Request::builder()
            .method("PUT")
            .uri("/api/profile")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_update_request_accepts_partial_payload() {
        let payload: UpdateProfileRequest =
            serde_json::from_str(r#"{"name":"New Name"}"#).unwrap();
        assert_eq!(payload.name.as_deref(), Some("New Name"));
        assert!(payload.title.is_none());
        assert!(payload.social_links.is_none());
    }
}
