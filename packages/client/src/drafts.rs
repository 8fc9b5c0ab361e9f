//! Form drafts for each managed entity type.

use common::models::CreateUserRequest;
use common::models::theme_week::parse_day;
use common::youtube::is_youtube_link;
use common::{
    Id, MaterialPayload, MaterialType, ThemeWeek, ThemeWeekPayload, VideoPayload,
};

use crate::error::ClientError;
use crate::form::{Draft, EditDraft};
use crate::resource::{Materials, ThemeWeeks, Users, Videos};
use crate::upload::UploadFile;

fn required(value: &str, label: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{label} is required")));
    }
    Ok(())
}

fn required_date(value: &str, label: &str) -> Result<(), ClientError> {
    required(value, label)?;
    if parse_day(value).is_none() {
        return Err(ClientError::Validation(format!(
            "{label} must be a date (YYYY-MM-DD)"
        )));
    }
    Ok(())
}

fn unknown_field(draft: &str, name: &str) -> ClientError {
    ClientError::Validation(format!("Unknown {draft} field '{name}'"))
}

fn parse_flag(value: &str) -> Result<bool, ClientError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" | "" => Ok(false),
        other => Err(ClientError::Validation(format!(
            "Expected yes or no, got '{other}'"
        ))),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDraft {
    pub username: String,
    pub password: String,
    pub is_admin: bool,
}

impl Draft for UserDraft {
    type Resource = Users;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), ClientError> {
        match name {
            "username" => self.username = value.to_string(),
            "password" => self.password = value.to_string(),
            "is_admin" => self.is_admin = parse_flag(value)?,
            _ => return Err(unknown_field("user", name)),
        }
        Ok(())
    }

    fn validate(&self, _file: Option<&UploadFile>) -> Result<(), ClientError> {
        required(&self.username, "Username")?;
        required(&self.password, "Password")
    }

    fn to_payload(&self) -> CreateUserRequest {
        CreateUserRequest {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// Theme week form. The illustration comes either from an uploaded file or
/// a URL typed in directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeWeekDraft {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub result_url: String,
    pub image_url: String,
}

impl ThemeWeekDraft {
    fn payload(&self) -> ThemeWeekPayload {
        ThemeWeekPayload {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
            result_url: self.result_url.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
        }
    }
}

impl Draft for ThemeWeekDraft {
    type Resource = ThemeWeeks;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), ClientError> {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "start_date" => &mut self.start_date,
            "end_date" => &mut self.end_date,
            "result_url" => &mut self.result_url,
            "image_url" => &mut self.image_url,
            _ => return Err(unknown_field("theme week", name)),
        };
        *slot = value.to_string();
        Ok(())
    }

    fn validate(&self, file: Option<&UploadFile>) -> Result<(), ClientError> {
        required(&self.title, "Title")?;
        required_date(&self.start_date, "Start date")?;
        required_date(&self.end_date, "End date")?;
        required(&self.result_url, "Result video URL")?;
        if file.is_none() && self.image_url.trim().is_empty() {
            return Err(ClientError::Validation(
                "Choose an image or enter an image URL".into(),
            ));
        }
        Ok(())
    }

    fn accepts_file(&self) -> bool {
        true
    }

    fn set_uploaded_url(&mut self, url: String) {
        self.image_url = url;
    }

    fn to_payload(&self) -> ThemeWeekPayload {
        self.payload()
    }
}

impl EditDraft for ThemeWeekDraft {
    fn from_entity(week: &ThemeWeek) -> Self {
        let day = |raw: &str, parsed: Option<chrono::NaiveDate>| {
            parsed
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| raw.to_string())
        };
        Self {
            title: week.title.clone(),
            description: week.description.clone(),
            start_date: day(&week.start_date, week.start_day()),
            end_date: day(&week.end_date, week.end_day()),
            result_url: week.result_url.clone(),
            image_url: week.image_url.clone(),
        }
    }

    fn to_patch(&self) -> ThemeWeekPayload {
        self.payload()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoDraft {
    pub title: String,
    pub description: String,
    pub student_name: String,
    pub youtube_url: String,
    pub theme_week_id: String,
}

impl Draft for VideoDraft {
    type Resource = Videos;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), ClientError> {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "student_name" => &mut self.student_name,
            "youtube_url" => &mut self.youtube_url,
            "theme_week_id" => &mut self.theme_week_id,
            _ => return Err(unknown_field("video", name)),
        };
        *slot = value.to_string();
        Ok(())
    }

    fn validate(&self, _file: Option<&UploadFile>) -> Result<(), ClientError> {
        required(&self.title, "Title")?;
        required(&self.student_name, "Student name")?;
        required(&self.youtube_url, "YouTube URL")?;
        required(&self.theme_week_id, "Theme week")
    }

    fn to_payload(&self) -> VideoPayload {
        VideoPayload {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            student_name: self.student_name.trim().to_string(),
            youtube_url: self.youtube_url.trim().to_string(),
            theme_week_id: Id::new(self.theme_week_id.trim()),
        }
    }
}

/// Material form.
///
/// YouTube materials carry their link directly. Every other type needs a
/// hosted URL, produced by uploading the selected file on submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialDraft {
    pub title: String,
    pub description: String,
    pub student_name: String,
    pub material_type: MaterialType,
    pub url: String,
    pub theme_week_id: String,
}

impl Draft for MaterialDraft {
    type Resource = Materials;

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), ClientError> {
        let slot = match name {
            "material_type" => {
                self.material_type = value.parse().map_err(ClientError::Validation)?;
                return Ok(());
            }
            "title" => &mut self.title,
            "description" => &mut self.description,
            "student_name" => &mut self.student_name,
            "url" => &mut self.url,
            "theme_week_id" => &mut self.theme_week_id,
            _ => return Err(unknown_field("material", name)),
        };
        *slot = value.to_string();
        Ok(())
    }

    fn validate(&self, file: Option<&UploadFile>) -> Result<(), ClientError> {
        required(&self.title, "Title")?;
        required(&self.student_name, "Student name")?;
        required(&self.theme_week_id, "Theme week")?;

        if self.material_type == MaterialType::Other {
            return Err(ClientError::Validation("Choose a material type".into()));
        }
        if self.material_type.requires_upload() {
            if file.is_none() && self.url.trim().is_empty() {
                return Err(ClientError::Validation("Choose a file to upload".into()));
            }
        } else {
            required(&self.url, "YouTube URL")?;
            if !is_youtube_link(&self.url) {
                return Err(ClientError::Validation(format!(
                    "'{}' is not a YouTube link",
                    self.url.trim()
                )));
            }
        }
        Ok(())
    }

    fn accepts_file(&self) -> bool {
        self.material_type.requires_upload()
    }

    fn set_uploaded_url(&mut self, url: String) {
        self.url = url;
    }

    fn to_payload(&self) -> MaterialPayload {
        MaterialPayload {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            student_name: self.student_name.trim().to_string(),
            material_type: self.material_type,
            url: self.url.trim().to_string(),
            theme_week_id: Id::new(self.theme_week_id.trim()),
        }
    }
}
