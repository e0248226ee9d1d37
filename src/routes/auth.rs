/**
 * Authentication Routes
 * Login, admin profile update, and principal echo
 */
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, issue_token, verify_password, Principal};
use crate::db::{self, models::Admin};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Returned by login and by the admin profile update (with a fresh token).
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct UpdateAdminRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login
/// Authenticate the admin and mint an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Username and password are required"));
    }

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let admin: Option<Admin> = sqlx::query_as(
        "SELECT id, username, password_hash, created_at, updated_at \
         FROM admins WHERE username = $1",
    )
    .bind(&payload.username)
    .fetch_optional(pool.as_ref())
    .await?;

    let admin = match admin {
        Some(a) => a,
        None => {
            tracing::warn!("Login attempt for unknown admin: {}", payload.username);
            return Err(ApiError::unauthorized("Invalid username or password"));
        }
    };

    if !verify_password(payload.password, admin.password_hash.clone()).await {
        tracing::warn!("Failed login attempt for: {}", admin.username);
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let token = issue_token(admin.id, &state.config)
        .map_err(|e| ApiError::Internal(format!("failed to create token: {}", e)))?;

    tracing::info!("Successful login for admin: {}", admin.username);

    Ok(Json(AuthResponse {
        id: admin.id,
        username: admin.username,
        token,
    }))
}

/// PUT /api/auth/profile
/// Update the admin's username and/or password; answers with a fresh token.
pub async fn update_admin_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<UpdateAdminRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let admin: Option<Admin> = sqlx::query_as(
        "SELECT id, username, password_hash, created_at, updated_at \
         FROM admins WHERE id = $1",
    )
    .bind(principal.id)
    .fetch_optional(pool.as_ref())
    .await?;

    let admin = admin.ok_or_else(|| ApiError::not_found("Admin not found"))?;

    let username = match payload.username {
        Some(u) if !u.trim().is_empty() => u.trim().to_string(),
        _ => admin.username,
    };

    let password_hash = match payload.password {
        Some(p) if !p.is_empty() => hash_password(p).await?,
        _ => admin.password_hash,
    };

    let updated: Admin = sqlx::query_as(
        "UPDATE admins SET username = $1, password_hash = $2, updated_at = now() \
         WHERE id = $3 \
         RETURNING id, username, password_hash, created_at, updated_at",
    )
    .bind(&username)
    .bind(&password_hash)
    .bind(admin.id)
    .fetch_one(pool.as_ref())
    .await?;

    let token = issue_token(updated.id, &state.config)
        .map_err(|e| ApiError::Internal(format!("failed to create token: {}", e)))?;

    Ok(Json(AuthResponse {
        id: updated.id,
        username: updated.username,
        token,
    }))
}

/// GET /api/auth/me
/// Echo the authenticated principal.
pub async fn me(Extension(principal): Extension<Principal>) -> Json<Principal> {
    Json(principal)
}
