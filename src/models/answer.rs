//! Answer model: a submission belonging to exactly one theme.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::non_blank;

/// An answer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: String,
    pub theme_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub likes: u64,
}

impl Answer {
    /// Build a fresh answer under `theme_id` with no likes.
    pub fn new(
        id: String,
        theme_id: String,
        request: SubmitAnswerRequest,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            theme_id,
            content: request.content,
            created_at: now,
            updated_at: now,
            created_by: request.created_by,
            likes: 0,
        }
    }
}

/// Request body for submitting an answer. The theme comes from the path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_by: String,
}

/// Request body for updating an answer.
///
/// Blank content and zero likes are treated as "not provided".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAnswerRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub likes: Option<u64>,
}

impl UpdateAnswerRequest {
    /// Merge the provided fields into `answer`.
    pub fn apply(self, answer: &mut Answer) {
        if let Some(content) = non_blank(self.content) {
            answer.content = content;
        }
        if let Some(likes) = self.likes.filter(|likes| *likes > 0) {
            answer.likes = likes;
        }
    }
}
