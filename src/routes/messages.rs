/**
 * Message Routes
 * Contact-form submissions (public create, admin everything else)
 */
use axum::{extract::Path, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, models::Message};
use crate::error::ApiError;
use crate::routes::MessageResponse;

const MESSAGE_COLUMNS: &str = "id, name, email, subject, body, \"read\", starred, created_at";

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default, rename = "message")]
    pub body: String,
}

/// Only the two flags are mutable; everything else is fixed at creation.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct UpdateMessageRequest {
    pub read: Option<bool>,
    pub starred: Option<bool>,
}

/// GET /api/messages
/// List all messages, newest first (admin).
pub async fn list_messages() -> Result<Json<Vec<Message>>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let messages: Vec<Message> = sqlx::query_as(&format!(
        "SELECT {} FROM messages ORDER BY created_at DESC",
        MESSAGE_COLUMNS
    ))
    .fetch_all(pool.as_ref())
    .await?;

    Ok(Json(messages))
}

/// POST /api/messages
/// Submit a contact-form message (public).
pub async fn create_message(
    Json(payload): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.subject.trim().is_empty()
        || payload.body.trim().is_empty()
    {
        return Err(ApiError::validation("Please fill in all fields"));
    }

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let message: Message = sqlx::query_as(&format!(
        "INSERT INTO messages (name, email, subject, body) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {}",
        MESSAGE_COLUMNS
    ))
    .bind(payload.name.trim())
    .bind(payload.email.trim())
    .bind(payload.subject.trim())
    .bind(payload.body.trim())
    .fetch_one(pool.as_ref())
    .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// PUT /api/messages/{id}
/// Flip the read/starred flags (admin). Absent flags keep their values.
pub async fn update_message(
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let existing: Option<Message> = sqlx::query_as(&format!(
        "SELECT {} FROM messages WHERE id = $1",
        MESSAGE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?;

    let existing = existing.ok_or_else(|| ApiError::not_found("Message not found"))?;

    let read = payload.read.unwrap_or(existing.read);
    let starred = payload.starred.unwrap_or(existing.starred);

    let message: Message = sqlx::query_as(&format!(
        "UPDATE messages SET \"read\" = $1, starred = $2 WHERE id = $3 RETURNING {}",
        MESSAGE_COLUMNS
    ))
    .bind(read)
    .bind(starred)
    .bind(id)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(Json(message))
}

/// DELETE /api/messages/{id}
/// Delete a message (admin).
pub async fn delete_message(Path(id): Path<Uuid>) -> Result<Json<MessageResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let result = sqlx::query("DELETE FROM messages WHERE id = $1")
        .bind(id)
        .execute(pool.as_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Message not found"));
    }

    Ok(Json(MessageResponse::new("Message removed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    async fn post_message(json: &str) -> (StatusCode, axum::body::Bytes) {
        let app = Router::new().route("/api/messages", post(create_message));
        let req = Request::post("/api/messages")
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes)
    }

    #[tokio::test]
    async fn test_create_message_missing_fields_returns_bad_request() {
        let (status, bytes) =
            post_message(r#"{"name":"A","email":"a@x.com","subject":"S"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Please fill in all fields");
    }

    #[tokio::test]
    async fn test_create_message_blank_fields_returns_bad_request() {
        let (status, _) =
            post_message(r#"{"name":"  ","email":"a@x.com","subject":"S","message":"M"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_update_request_flags_are_optional() {
        let payload: UpdateMessageRequest = serde_json::from_str(r#"{"read":true}"#).unwrap();
        assert_eq!(payload.read, Some(true));
        assert!(payload.starred.is_none());
    }

    #[test]
    fn test_create_request_reads_message_field() {
        let payload: CreateMessageRequest =
            serde_json::from_str(r#"{"name":"A","email":"a@x.com","subject":"S","message":"M"}"#)
                .unwrap();
        assert_eq!(payload.body, "M");
    }
}
