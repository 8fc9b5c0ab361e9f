use common::Id;
use reqwest::StatusCode;
use thiserror::Error;

use crate::session::SessionError;

/// Everything that can go wrong between a view and the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A required field is missing or malformed. Raised before any request.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// The file-hosting gateway failed; the pending create/update is aborted.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// No response at all (connection refused, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered 2xx with a body we could not decode.
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),

    /// An authenticated call was attempted with no stored token. Nothing
    /// was sent.
    #[error("Not signed in")]
    NotSignedIn,

    /// An action targeted an item that is not in the loaded list.
    #[error("Item {0} is not loaded")]
    NotLoaded(Id),

    /// The account signed in successfully but lacks admin rights.
    #[error("Only administrators may sign in here")]
    AdminOnly,

    /// A submit is already in flight for this form.
    #[error("A submission is already in progress")]
    Busy,
}

impl ClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ClientError::Api {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn network(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }

    /// HTTP status for backend errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the token is missing, expired, or rejected. Protected views
    /// redirect to the login screen on these.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::NotSignedIn
                | ClientError::Api {
                    status: 401 | 403,
                    ..
                }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

/// Pick a human-readable message out of an error body.
///
/// Backends in the wild use `message`, `error`, or `detail`; the first string
/// found wins. Falls back to the status reason phrase.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(body) {
        for key in ["message", "error", "detail"] {
            if let Some(serde_json::Value::String(text)) = map.get(key)
                && !text.trim().is_empty()
            {
                return text.clone();
            }
        }
    }

    let body = body.trim();
    if !body.is_empty() && body.len() <= 200 && !body.starts_with('{') && !body.starts_with('<')
    {
        return body.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}
