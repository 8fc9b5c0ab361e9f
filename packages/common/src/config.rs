use serde::Deserialize;

/// REST backend connection settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    /// Default: "https://restart-creative.onrender.com/api".
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. Default: 30.
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://restart-creative.onrender.com/api".into()
}
fn default_api_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_secs: default_api_timeout_secs(),
        }
    }
}

/// Third-party file hosting settings.
#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Multipart upload endpoint.
    /// Default: "https://api.cloudinary.com/v1_1/dq2pbzrtu/image/upload".
    #[serde(default = "default_upload_endpoint")]
    pub endpoint: String,
    /// Unsigned upload preset sent with every file. Default: "adilgazy".
    #[serde(default = "default_upload_preset")]
    pub preset: String,
    /// Upload timeout in seconds. Default: 300.
    #[serde(default = "default_upload_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_upload_endpoint() -> String {
    "https://api.cloudinary.com/v1_1/dq2pbzrtu/image/upload".into()
}
fn default_upload_preset() -> String {
    "adilgazy".into()
}
fn default_upload_timeout_secs() -> u64 {
    300
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: default_upload_endpoint(),
            preset: default_upload_preset(),
            timeout_secs: default_upload_timeout_secs(),
        }
    }
}
