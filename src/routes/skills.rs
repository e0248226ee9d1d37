/**
 * Skill Routes
 * CRUD API endpoints for skills
 */
use axum::{extract::Path, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, models::Skill};
use crate::error::ApiError;
use crate::routes::MessageResponse;

const SKILL_COLUMNS: &str = "id, name, category, level, icon, \"order\", created_at, updated_at";

const VALID_CATEGORIES: &[&str] = &["Frontend", "Backend", "Tools", "Other"];

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateSkillRequest {
    #[serde(default)]
    pub name: String,
    pub category: Option<String>,
    pub level: Option<i32>,
    pub icon: Option<String>,
    pub order: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSkillRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub level: Option<i32>,
    pub icon: Option<String>,
    pub order: Option<i32>,
}

fn validate_category(category: &str) -> Result<(), ApiError> {
    if VALID_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "Invalid category. Valid values: {}",
            VALID_CATEGORIES.join(", ")
        )))
    }
}

fn validate_level(level: i32) -> Result<(), ApiError> {
    if (1..=100).contains(&level) {
        Ok(())
    } else {
        Err(ApiError::validation("Level must be between 1 and 100"))
    }
}

/// GET /api/skills
/// List all skills, sorted by display order then insertion order.
pub async fn list_skills() -> Result<Json<Vec<Skill>>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let skills: Vec<Skill> = sqlx::query_as(&format!(
        "SELECT {} FROM skills ORDER BY \"order\" ASC, created_at ASC",
        SKILL_COLUMNS
    ))
    .fetch_all(pool.as_ref())
    .await?;

    Ok(Json(skills))
}

/// POST /api/skills
/// Create a skill (admin).
pub async fn create_skill(
    Json(payload): Json<CreateSkillRequest>,
) -> Result<(StatusCode, Json<Skill>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Name is required"));
    }

    let category = payload.category.unwrap_or_else(|| "Other".to_string());
    validate_category(&category)?;

    if let Some(level) = payload.level {
        validate_level(level)?;
    }

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let skill: Skill = sqlx::query_as(&format!(
        "INSERT INTO skills (name, category, level, icon, \"order\") \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {}",
        SKILL_COLUMNS
    ))
    .bind(payload.name.trim())
    .bind(&category)
    .bind(payload.level)
    .bind(&payload.icon)
    .bind(payload.order.unwrap_or(0))
    .fetch_one(pool.as_ref())
    .await?;

    Ok((StatusCode::CREATED, Json(skill)))
}

/// PUT /api/skills/{id}
/// Update a skill (admin).
pub async fn update_skill(
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSkillRequest>,
) -> Result<Json<Skill>, ApiError> {
    if let Some(ref category) = payload.category {
        validate_category(category)?;
    }
    if let Some(level) = payload.level {
        validate_level(level)?;
    }

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let existing: Option<Skill> =
        sqlx::query_as(&format!("SELECT {} FROM skills WHERE id = $1", SKILL_COLUMNS))
            .bind(id)
            .fetch_optional(pool.as_ref())
            .await?;

    let existing = existing.ok_or_else(|| ApiError::not_found("Skill not found"))?;

    let name = payload.name.unwrap_or(existing.name);
    let category = payload.category.unwrap_or(existing.category);
    let level = payload.level.or(existing.level);
    let icon = payload.icon.or(existing.icon);
    let order = payload.order.unwrap_or(existing.order);

    let skill: Skill = sqlx::query_as(&format!(
        "UPDATE skills \
         SET name = $1, category = $2, level = $3, icon = $4, \"order\" = $5, updated_at = now() \
         WHERE id = $6 \
         RETURNING {}",
        SKILL_COLUMNS
    ))
    .bind(&name)
    .bind(&category)
    .bind(level)
    .bind(&icon)
    .bind(order)
    .bind(id)
    .fetch_one(pool.as_ref())
    .await?;

    Ok(Json(skill))
}

/// DELETE /api/skills/{id}
/// Delete a skill (admin).
pub async fn delete_skill(Path(id): Path<Uuid>) -> Result<Json<MessageResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let result = sqlx::query("DELETE FROM skills WHERE id = $1")
        .bind(id)
        .execute(pool.as_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Skill not found"));
    }

    Ok(Json(MessageResponse::new("Skill removed")))
}
