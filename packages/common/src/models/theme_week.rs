use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::shared::{nullable_count, nullable_string};
use crate::id::Id;

/// A time-boxed contest period with its own theme and result video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeWeek {
    pub id: Id,
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    /// Start date as sent by the server (`YYYY-MM-DD`, possibly with a time part).
    #[serde(default, deserialize_with = "nullable_string")]
    pub start_date: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub end_date: String,
    /// Link to the week's summary video.
    #[serde(default, deserialize_with = "nullable_string")]
    pub result_url: String,
    /// Illustration, usually produced by the upload gateway.
    #[serde(default, deserialize_with = "nullable_string")]
    pub image_url: String,
    /// Number of videos attached to the week. Derived by the server.
    #[serde(default, deserialize_with = "nullable_count")]
    pub videos_count: u64,
}

impl ThemeWeek {
    pub fn start_day(&self) -> Option<NaiveDate> {
        parse_day(&self.start_date)
    }

    pub fn end_day(&self) -> Option<NaiveDate> {
        parse_day(&self.end_date)
    }
}

/// Parse the leading `YYYY-MM-DD` of a server date or timestamp.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let day = value.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Body of `POST /admin/theme-weeks` and `PUT /admin/theme-weeks/:id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeWeekPayload {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub result_url: String,
    pub image_url: String,
}
