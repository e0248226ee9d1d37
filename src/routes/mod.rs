/**
 * Routes Module
 * API route handlers
 */

pub mod about;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod leetcode;
pub mod messages;
pub mod profile;
pub mod projects;
pub mod skills;

use serde::Serialize;

/// Confirmation body for deletes and other message-only responses.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
