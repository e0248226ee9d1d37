/**
 * Project Routes
 * CRUD API endpoints for portfolio projects
 */
use axum::{extract::Path, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, models::Project};
use crate::error::ApiError;
use crate::routes::MessageResponse;

const PROJECT_COLUMNS: &str = "id, title, description, long_description, images, thumbnail, \
     video, tags, technologies, live_link, github_link, featured, status, \"order\", created_at";

const VALID_STATUSES: &[&str] = &["Draft", "Published", "Completed", "Ongoing"];

/// Tags and technologies arrive either as a JSON array or as a single
/// comma-separated string; both normalize to trimmed, non-empty entries
/// before touching the database.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StringOrList {
    List(Vec<String>),
    Delimited(String),
}

impl StringOrList {
    pub fn into_vec(self) -> Vec<String> {
        let raw = match self {
            StringOrList::List(items) => items,
            StringOrList::Delimited(s) => s.split(',').map(str::to_string).collect(),
        };
        raw.into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub long_description: Option<String>,
    pub images: Option<Vec<String>>,
    pub thumbnail: Option<String>,
    pub video: Option<String>,
    pub tags: Option<StringOrList>,
    pub technologies: Option<StringOrList>,
    pub live_link: Option<String>,
    pub github_link: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub images: Option<Vec<String>>,
    pub thumbnail: Option<String>,
    pub video: Option<String>,
    pub tags: Option<StringOrList>,
    pub technologies: Option<StringOrList>,
    pub live_link: Option<String>,
    pub github_link: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<String>,
    pub order: Option<i32>,
}

fn validate_status(status: &str) -> Result<(), ApiError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "Invalid status. Valid values: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// GET /api/projects
/// List all projects, sorted by display order then recency.
pub async fn list_projects() -> Result<Json<Vec<Project>>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let projects: Vec<Project> = sqlx::query_as(&format!(
        "SELECT {} FROM projects ORDER BY \"order\" ASC, created_at DESC",
        PROJECT_COLUMNS
    ))
    .fetch_all(pool.as_ref())
    .await?;

    Ok(Json(projects))
}

/// POST /api/projects
/// Create a project (admin).
pub async fn create_project(
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(ApiError::validation("Title and description are required"));
    }

    let status = payload.status.unwrap_or_else(|| "Published".to_string());
    validate_status(&status)?;

    let tags = payload.tags.map(StringOrList::into_vec).unwrap_or_default();
    let technologies = payload
        .technologies
        .map(StringOrList::into_vec)
        .unwrap_or_default();
    let images = payload.images.unwrap_or_default();

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let project: Project = sqlx::query_as(&format!(
        "INSERT INTO projects (title, description, long_description, images, thumbnail, video, \
             tags, technologies, live_link, github_link, featured, status, \"order\") \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING {}",
        PROJECT_COLUMNS
    ))
    .bind(payload.title.trim())
    .bind(payload.description.trim())
    .bind(&payload.long_description)
    .bind(&images)
    .bind(&payload.thumbnail)
    .bind(&payload.video)
    .bind(&tags)
    .bind(&technologies)
    .bind(&payload.live_link)
    .bind(&payload.github_link)
    .bind(payload.featured.unwrap_or(false))
    .bind(&status)
    .bind(payload.order.unwrap_or(0))
    .fetch_one(pool.as_ref())
    .await?;

    tracing::info!("Project created: {}", project.id);

    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/projects/{id}
/// Update a project (admin). Array-like fields are re-normalized when
/// present; absent fields keep their stored values.
pub async fn update_project(
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    if let Some(ref status) = payload.status {
        validate_status(status)?;
    }

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let existing: Option<Project> = sqlx::query_as(&format!(
        "SELECT {} FROM projects WHERE id = $1",
        PROJECT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool.as_ref())
    .await?;

    let existing = existing.ok_or_else(|| ApiError::not_found("Project not found"))?;

    let title = payload.title.unwrap_or(existing.title);
    let description = payload.description.unwrap_or(existing.description);
    let long_description = payload.long_description.or(existing.long_description);
    let images = payload.images.unwrap_or(existing.images);
    let thumbnail = payload.thumbnail.or(existing.thumbnail);
    let video = payload.video.or(existing.video);
    let tags = payload
        .tags
        .map(StringOrList::into_vec)
        .unwrap_or(existing.tags);
    let technologies = payload
        .technologies
        .map(StringOrList::into_vec)
        .unwrap_or(existing.technologies);
    let live_link = payload.live_link.or(existing.live_link);
    let github_link = payload.github_link.or(existing.github_link);
    let featured = payload.featured.unwrap_or(existing.featured);
    let status = payload.status.unwrap_or(existing.status);
    let order = payload.order.unwrap_or(existing.order);

    let project: Project = sqlx::query_as(&format!(
        "UPDATE projects \
         SET title = $1, description = $2, long_description = $3, images = $4, thumbnail = $5, \
             video = $6, tags = $7, technologies = $8, live_link = $9, github_link = $10, \
             featured = $11, status = $12, \"order\" = $13 \
         WHERE id = $14 \
         RETURNING {}",
        PROJECT_COLUMNS
    ))
    .bind(&title)
    .bind(&description)
    .bind(&long_description)
    .bind(&images)
    .bind(&thumbnail)
    .bind(&video)
    .bind(&tags)
    .bind(&technologies)
    .bind(&live_link)
    .bind(&github_link)
    .bind(featured)
    .bind(&status)
    .bind(order)
    .bind(id)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(Json(project))
}

/// DELETE /api/projects/{id}
/// Delete a project (admin).
pub async fn delete_project(Path(id): Path<Uuid>) -> Result<Json<MessageResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool.as_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Project not found"));
    }

    Ok(Json(MessageResponse::new("Project removed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::{get, post};
    use axum::Router;
    use tower::ServiceExt;

    #[test]
    fn test_delimited_string_normalizes() {
        let tags: StringOrList = serde_json::from_str(r#""a, b ,,c""#).unwrap();
        assert_eq!(tags.into_vec(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_array_passes_through_with_trim() {
        let tags: StringOrList = serde_json::from_str(r#"[" rust ", "", "axum"]"#).unwrap();
        assert_eq!(tags.into_vec(), vec!["rust", "axum"]);
    }

    #[test]
    fn test_create_payload_accepts_both_tag_shapes() {
        let from_string: CreateProjectRequest =
            serde_json::from_str(r#"{"title":"T","description":"D","tags":"a,b"}"#).unwrap();
        assert_eq!(
            from_string.tags.unwrap().into_vec(),
            vec!["a".to_string(), "b".to_string()]
        );

        let from_array: CreateProjectRequest =
            serde_json::from_str(r#"{"title":"T","description":"D","tags":["a","b"]}"#).unwrap();
        assert_eq!(
            from_array.tags.unwrap().into_vec(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_validate_status() {
        assert!(validate_status("Published").is_ok());
        assert!(validate_status("Ongoing").is_ok());
        assert!(validate_status("published").is_err());
        assert!(validate_status("Archived").is_err());
    }

    #[tokio::test]
    async fn test_create_project_missing_title_returns_bad_request() {
        let app = Router::new().route("/api/projects", post(create_project));
        let body = Body::from(r#"{"description":"D"}"#);
        let req = Request::post("/api/projects")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Title and description are required");
    }

    #[tokio::test]
    async fn test_create_project_invalid_status_returns_bad_request() {
        let app = Router::new().route("/api/projects", post(create_project));
        let body = Body::from(r#"{"title":"T","description":"D","status":"Archived"}"#);
        let req = Request::post("/api/projects")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_projects_without_database_returns_unavailable() {
        let app = Router::new().route("/api/projects", get(list_projects));
        let req = Request::get("/api/projects").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
