//! Database models - structs representing table rows (used by sqlx/serde).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Admin account. There is exactly one in practice; the table allows more.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Social links embedded in the profile, stored as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinks {
    pub github: String,
    pub linkedin: String,
    pub leetcode: String,
    pub email: String,
}

impl Default for SocialLinks {
    fn default() -> Self {
        Self {
            github: "https://github.com/developer".to_string(),
            linkedin: String::new(),
            leetcode: String::new(),
            email: "dev@example.com".to_string(),
        }
    }
}

/// Singleton profile document.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub resume_url: String,
    pub social_links: Json<SocialLinks>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Default values for a freshly created profile.
#[derive(Debug, Clone)]
pub struct ProfileDefaults {
    pub name: &'static str,
    pub title: &'static str,
    pub bio: &'static str,
}

pub const PROFILE_DEFAULTS: ProfileDefaults = ProfileDefaults {
    name: "Developer",
    title: "Full Stack Developer",
    bio: "A passionate developer building modern web applications.",
};

/// Project entry. `images` holds base64 strings or URLs.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub images: Vec<String>,
    pub thumbnail: Option<String>,
    pub video: Option<String>,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub live_link: Option<String>,
    pub github_link: Option<String>,
    pub featured: bool,
    pub status: String,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    /// Proficiency percentage, 1-100.
    pub level: Option<i32>,
    pub icon: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Timeline ("about") entry. The wire field for `kind` is `type`, kept for
/// compatibility with existing clients.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    pub id: Uuid,
    pub period: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub order: i32,
    pub is_visible: bool,
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact-form message. Immutable except for the `read`/`starred` flags.
/// The wire field for `body` is `message`, matching the contact form.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    #[serde(rename = "message")]
    pub body: String,
    pub read: bool,
    pub starred: bool,
    pub created_at: DateTime<Utc>,
}

/// Append-only visitor log row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: Uuid,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_links_default_is_not_empty() {
        let links = SocialLinks::default();
        assert!(!links.github.is_empty());
        assert!(!links.email.is_empty());
    }

    #[test]
    fn test_timeline_kind_serializes_as_type() {
        let item = TimelineItem {
            id: Uuid::new_v4(),
            period: "2024".to_string(),
            title: "Started".to_string(),
            subtitle: None,
            description: None,
            kind: "experience".to_string(),
            order: 0,
            is_visible: true,
            icon: "briefcase".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "experience");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_message_body_serializes_as_message() {
        let msg = Message {
            id: Uuid::new_v4(),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            subject: "S".to_string(),
            body: "M".to_string(),
            read: false,
            starred: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["message"], "M");
        assert!(json.get("body").is_none());
    }

    #[test]
    fn test_admin_never_serializes_password_hash() {
        let admin = Admin {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&admin).unwrap();
        assert!(json.get("passwordHash").is_none());
    }
}
