use tracing::{debug, instrument};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::resource::{Materials, ThemeWeeks, Users, Videos};

/// Collection sizes shown on the admin landing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dashboard {
    pub users: usize,
    pub weeks: usize,
    pub videos: usize,
    pub materials: usize,
    pub winners: usize,
}

impl Dashboard {
    /// Fetch all four collections concurrently. Any single failure fails
    /// the whole load.
    #[instrument(skip(api))]
    pub async fn load(api: &ApiClient) -> Result<Self, ClientError> {
        let (users, weeks, videos, materials) = tokio::try_join!(
            api.list_admin::<Users>(),
            api.list_public::<ThemeWeeks>(),
            api.list_public::<Videos>(),
            api.list_admin::<Materials>()
        )?;

        let dashboard = Self {
            users: users.len(),
            weeks: weeks.len(),
            videos: videos.len(),
            materials: materials.len(),
            winners: materials.iter().filter(|m| m.is_winner).count(),
        };
        debug!(?dashboard, "Dashboard loaded");
        Ok(dashboard)
    }
}
