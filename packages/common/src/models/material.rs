use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::shared::nullable_string;
use crate::id::Id;

/// Kind of artifact a material points at.
///
/// `Youtube` materials carry a link supplied directly; every other kind is
/// uploaded through the file-hosting gateway first. Names the backend sends
/// that this client does not know decode as `Other`, which cannot be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    #[default]
    Youtube,
    Image,
    Pdf,
    Video,
    Other,
}

impl MaterialType {
    pub const ALL: [MaterialType; 4] = [
        MaterialType::Youtube,
        MaterialType::Image,
        MaterialType::Pdf,
        MaterialType::Video,
    ];

    /// Wire name, as sent to and received from the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            MaterialType::Youtube => "youtube",
            MaterialType::Image => "image",
            MaterialType::Pdf => "pdf",
            MaterialType::Video => "video",
            MaterialType::Other => "other",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            MaterialType::Youtube => "YouTube",
            MaterialType::Image => "Image",
            MaterialType::Pdf => "PDF",
            MaterialType::Video => "Video",
            MaterialType::Other => "Other",
        }
    }

    /// Whether the url must come from the upload gateway.
    pub fn requires_upload(self) -> bool {
        matches!(
            self,
            MaterialType::Image | MaterialType::Pdf | MaterialType::Video
        )
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MaterialType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                format!("Unknown material type '{s}' (expected youtube, image, pdf or video)")
            })
    }
}

impl<'de> Deserialize<'de> for MaterialType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or(MaterialType::Other))
    }
}

/// A student-submitted artifact attached to a theme week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: Id,
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub student_name: String,
    pub material_type: MaterialType,
    #[serde(default, deserialize_with = "nullable_string")]
    pub url: String,
    pub theme_week_id: Id,
    #[serde(default)]
    pub is_winner: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /admin/materials`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialPayload {
    pub title: String,
    pub description: String,
    pub student_name: String,
    pub material_type: MaterialType,
    pub url: String,
    pub theme_week_id: Id,
}

/// Partial body of `PUT /admin/materials/:id`. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaterialPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_winner: Option<bool>,
}

impl MaterialPatch {
    pub fn winner(is_winner: bool) -> Self {
        Self {
            is_winner: Some(is_winner),
        }
    }
}

/// Order winners before everyone else, keeping the relative order of equals.
pub fn winners_first(materials: &mut [Material]) {
    materials.sort_by_key(|m| !m.is_winner);
}
