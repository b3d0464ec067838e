//! Theme model: a prompt that answers are submitted against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::non_blank;

/// A theme record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: String,
    /// Only active themes accept new answers.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Theme {
    /// Build a fresh, active theme stamped at `now`.
    pub fn new(id: String, request: CreateThemeRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: request.title,
            description: request.description,
            created_at: now,
            updated_at: now,
            created_by: request.created_by,
            active: true,
        }
    }
}

/// Request body for creating a theme. Any client-supplied id is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateThemeRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_by: String,
}

/// Request body for updating a theme.
///
/// Blank strings count as "not provided" and leave the stored value alone.
/// `active` is only applied when present in the payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateThemeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl UpdateThemeRequest {
    /// Merge the provided fields into `theme`.
    pub fn apply(self, theme: &mut Theme) {
        if let Some(title) = non_blank(self.title) {
            theme.title = title;
        }
        if let Some(description) = non_blank(self.description) {
            theme.description = description;
        }
        if let Some(active) = self.active {
            theme.active = active;
        }
    }
}
