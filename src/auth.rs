//! Authentication: password hashing, JWT issue/verify, and the guard
//! middleware that protects admin routes.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db;
use crate::error::ApiError;
use crate::AppState;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// The authenticated identity attached to a request after the guard
/// middleware accepts its token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
}

/// Hash a plaintext password. bcrypt is intentionally CPU-bound; run it on
/// the blocking pool so it doesn't stall other in-flight requests.
pub async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash(&password, DEFAULT_COST))
        .await
        .map_err(|e| ApiError::Internal(format!("hash task panicked: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {}", e)))
}

/// Compare a plaintext password against a stored bcrypt hash.
pub async fn verify_password(password: String, password_hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify(&password, &password_hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}

/// Mint a signed access token for the given admin id.
pub fn issue_token(
    admin_id: Uuid,
    config: &AppConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::hours(config.token_ttl_hours);

    let claims = Claims {
        sub: admin_id.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

/// Check signature and expiration; yield the claims on success.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Guard middleware for admin-only routes.
///
/// Verifies the bearer token, resolves the admin row it names, and attaches
/// the [`Principal`] to request extensions. Every verification failure is a
/// 401; the request never reaches the handler.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Not authorized, no token"))?
        .to_string();

    let claims = verify_token(&token, &state.config.jwt_secret)
        .map_err(|_| ApiError::unauthorized("Not authorized, token failed"))?;

    let admin_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::unauthorized("Not authorized, token failed"))?;

    let pool = db::get_pool().ok_or(ApiError::Unavailable)?;

    let admin: Option<(Uuid, String)> =
        sqlx::query_as("SELECT id, username FROM admins WHERE id = $1")
            .bind(admin_id)
            .fetch_optional(pool.as_ref())
            .await?;

    let (id, username) =
        admin.ok_or_else(|| ApiError::unauthorized("Not authorized, token failed"))?;

    request.extensions_mut().insert(Principal { id, username });

    Ok(next.run(request).await)
}
