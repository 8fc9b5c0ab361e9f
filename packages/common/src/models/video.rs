use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::nullable_string;
use crate::id::Id;

/// A student video linked from YouTube. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: Id,
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub student_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub youtube_url: String,
    pub theme_week_id: Id,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /admin/videos`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoPayload {
    pub title: String,
    pub description: String,
    pub student_name: String,
    pub youtube_url: String,
    pub theme_week_id: Id,
}
