/**
 * About Routes
 * CRUD API endpoints for timeline ("about") entries
 */
use axum::{extract::Path, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, models::TimelineItem};
use crate::error::ApiError;
use crate::routes::MessageResponse;

const TIMELINE_COLUMNS: &str = "id, period, title, subtitle, description, kind, \"order\", \
     is_visible, icon, created_at, updated_at";

const VALID_KINDS: &[&str] = &["education", "experience", "achievement", "goal", "other"];

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimelineRequest {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub order: Option<i32>,
    pub is_visible: Option<bool>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimelineRequest {
    pub period: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub order: Option<i32>,
    pub is_visible: Option<bool>,
    pub icon: Option<String>,
}

fn validate_kind(kind: &str) -> Result<(), ApiError> {
    if VALID_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "Invalid type. Valid values: {}",
            VALID_KINDS.join(", ")
        )))
    }
}

/// GET /api/about
/// Public listing: visible items only, sorted by display order.
pub async fn list_visible_items() -> Result<Json<Vec<TimelineItem>>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let items: Vec<TimelineItem> = sqlx::query_as(&format!(
        "SELECT {} FROM timeline_items WHERE is_visible = true ORDER BY \"order\" ASC",
        TIMELINE_COLUMNS
    ))
    .fetch_all(pool.as_ref())
    .await?;

    Ok(Json(items))
}

/// GET /api/about/all
/// Admin listing: every item, hidden ones included.
pub async fn list_all_items() -> Result<Json<Vec<TimelineItem>>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let items: Vec<TimelineItem> = sqlx::query_as(&format!(
        "SELECT {} FROM timeline_items ORDER BY \"order\" ASC",
        TIMELINE_COLUMNS
    ))
    .fetch_all(pool.as_ref())
    .await?;

    Ok(Json(items))
}

/// POST /api/about
/// Create a timeline item (admin).
pub async fn create_item(
    Json(payload): Json<CreateTimelineRequest>,
) -> Result<(StatusCode, Json<TimelineItem>), ApiError> {
    if payload.period.trim().is_empty() || payload.title.trim().is_empty() {
        return Err(ApiError::validation("Period and title are required"));
    }

    let kind = payload.kind.unwrap_or_else(|| "experience".to_string());
    validate_kind(&kind)?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let item: TimelineItem = sqlx::query_as(&format!(
        "INSERT INTO timeline_items (period, title, subtitle, description, kind, \"order\", \
             is_visible, icon) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {}",
        TIMELINE_COLUMNS
    ))
    .bind(payload.period.trim())
    .bind(payload.title.trim())
    .bind(&payload.subtitle)
    .bind(&payload.description)
    .bind(&kind)
    .bind(payload.order.unwrap_or(0))
    .bind(payload.is_visible.unwrap_or(true))
    .bind(payload.icon.unwrap_or_else(|| "briefcase".to_string()))
    .fetch_one(pool.as_ref())
    .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/about/{id}
/// Update a timeline item (admin).
pub async fn update_item(
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTimelineRequest>,
) -> Result<Json<TimelineItem>, ApiError> {
    if let Some(ref kind) = payload.kind {
        validate_kind(kind)?;
    }

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let existing: Option<TimelineItem> = sqlx::query_as(&format!(
        "SELECT {} FROM timeline_items WHERE id = $1",
        TIMELINE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?;

    let existing = existing.ok_or_else(|| ApiError::not_found("Timeline item not found"))?;

    let period = payload.period.unwrap_or(existing.period);
    let title = payload.title.unwrap_or(existing.title);
    let subtitle = payload.subtitle.or(existing.subtitle);
    let description = payload.description.or(existing.description);
    let kind = payload.kind.unwrap_or(existing.kind);
    let order = payload.order.unwrap_or(existing.order);
    let is_visible = payload.is_visible.unwrap_or(existing.is_visible);
    let icon = payload.icon.unwrap_or(existing.icon);

    let item: TimelineItem = sqlx::query_as(&format!(
        "UPDATE timeline_items \
         SET period = $1, title = $2, subtitle = $3, description = $4, kind = $5, \
             \"order\" = $6, is_visible = $7, icon = $8, updated_at = now() \
         WHERE id = $9 \
         RETURNING {}",
        TIMELINE_COLUMNS
    ))
    .bind(&period)
    .bind(&title)
    .bind(&subtitle)
    .bind(&description)
    .bind(&kind)
    .bind(order)
    .bind(is_visible)
    .bind(&icon)
    .bind(id)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(Json(item))
}

/// DELETE /api/about/{id}
/// Delete a timeline item (admin).
pub async fn delete_item(Path(id): Path<Uuid>) -> Result<Json<MessageResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let result = sqlx::query("DELETE FROM timeline_items WHERE id = $1")
        .bind(id)
        .execute(pool.as_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Timeline item not found"));
    }

    Ok(Json(MessageResponse::new("Timeline item deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    #[test]
    fn test_validate_kind() {
        assert!(validate_kind("education").is_ok());
        assert!(validate_kind("goal").is_ok());
        assert!(validate_kind("Education").is_err());
        assert!(validate_kind("hobby").is_err());
    }

    #[test]
    fn test_kind_deserializes_from_type_field() {
        let payload: CreateTimelineRequest =
            serde_json::from_str(r#"{"period":"2024","title":"T","type":"education"}"#).unwrap();
        assert_eq!(payload.kind.as_deref(), Some("education"));
    }

    #[tokio::test]
    async fn test_create_item_missing_period_returns_bad_request() {
        let app = Router::new().route("/api/about", post(create_item));
        let req = Request::post("/api/about")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"title":"T"}"#))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_item_invalid_kind_returns_bad_request() {
        let app = Router::new().route("/api/about", post(create_item));
        let req = Request::post("/api/about")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"period":"2024","title":"T","type":"hobby"}"#,
            ))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
