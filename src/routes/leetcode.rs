/**
 * LeetCode Routes
 * Pass-through proxy for LeetCode submission-calendar data
 */
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::time::Duration;

use crate::error::ApiError;
use crate::AppState;

/// Hard upper bound on the upstream round trip.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

const USER_CALENDAR_QUERY: &str = "\
query userProfileCalendar($username: String!) {
    matchedUser(username: $username) {
        userCalendar {
            activeYears
            streak
            totalActiveDays
            submissionCalendar
        }
    }
}";

/// GET /api/leetcode/{username}
/// Forward the fixed calendar query upstream and relay the response.
/// Upstream failures become an error response, never a hang or a crash.
pub async fn user_calendar(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let client = reqwest::Client::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .build()
        .map_err(|e| ApiError::Internal(format!("failed to build http client: {}", e)))?;

    let response = client
        .post(&state.config.leetcode_api_url)
        .header("Content-Type", "application/json")
        .header("Referer", "https://leetcode.com")
        .header(
            "User-Agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
             Chrome/91.0.4472.124 Safari/537.36",
        )
        .json(&json!({
            "query": USER_CALENDAR_QUERY,
            "variables": { "username": username },
        }))
        .send()
        .await
        .map_err(|e| {
            tracing::error!("LeetCode request failed: {}", e);
            let message = if e.is_timeout() {
                "LeetCode request timed out".to_string()
            } else {
                "Failed to fetch LeetCode data".to_string()
            };
            ApiError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message,
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("LeetCode API error: {}", status);
        return Err(ApiError::Upstream {
            status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
            message: format!("LeetCode API error: {}", status),
        });
    }

    let data: serde_json::Value = response.json().await.map_err(|e| {
        tracing::error!("Failed to decode LeetCode response: {}", e);
        ApiError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            message: "Failed to fetch LeetCode data".to_string(),
        }
    })?;

    Ok(Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    #[test]
    fn test_query_requests_calendar_fields() {
        assert!(USER_CALENDAR_QUERY.contains("submissionCalendar"));
        assert!(USER_CALENDAR_QUERY.contains("$username"));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_returns_error_not_hang() {
        let mut config = AppConfig::load();
        // Reserved TEST-NET address; connection fails fast.
        config.leetcode_api_url = "http://192.0.2.1:9/graphql".to_string();
        let state = AppState {
            config: config.into_shared(),
        };
        let app = Router::new()
            .route("/api/leetcode/{username}", get(user_calendar))
            .with_state(state);

        let req = Request::get("/api/leetcode/somebody")
            .body(Body::empty())
            .unwrap();
        let res = tokio::time::timeout(Duration::from_secs(15), app.oneshot(req))
            .await
            .expect("proxy must resolve within the upstream timeout")
            .unwrap();
        assert!(res.status().is_server_error());
    }
}
