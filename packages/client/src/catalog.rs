//! Read-only views of the public contest pages.

use common::{Id, Material, ThemeWeek, winners_first};
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::resource::{Materials, ThemeWeeks};

/// All theme weeks with the headline numbers shown above them.
#[derive(Debug, Clone, Default)]
pub struct WeekCatalog {
    weeks: Vec<ThemeWeek>,
}

impl WeekCatalog {
    #[instrument(skip(api))]
    pub async fn load(api: &ApiClient) -> Result<Self, ClientError> {
        let weeks = api.list_public::<ThemeWeeks>().await?;
        Ok(Self::from_weeks(weeks))
    }

    pub fn from_weeks(weeks: Vec<ThemeWeek>) -> Self {
        Self { weeks }
    }

    pub fn weeks(&self) -> &[ThemeWeek] {
        &self.weeks
    }

    pub fn total_weeks(&self) -> usize {
        self.weeks.len()
    }

    /// Sum of `videos_count` over every week.
    pub fn total_videos(&self) -> u64 {
        self.weeks.iter().map(|w| w.videos_count).sum()
    }

    /// The most recently listed week, if any.
    pub fn latest(&self) -> Option<&ThemeWeek> {
        self.weeks.last()
    }
}

/// One theme week with its materials, winners first.
#[derive(Debug, Clone)]
pub struct WeekPage {
    pub week: ThemeWeek,
    materials: Vec<Material>,
}

impl WeekPage {
    /// Fetch the week and all public materials together, keeping the ones
    /// that belong to it.
    #[instrument(skip(api, id), fields(%id))]
    pub async fn load(api: &ApiClient, id: &Id) -> Result<Self, ClientError> {
        let (week, materials) = tokio::try_join!(
            api.get::<ThemeWeeks>(id),
            api.list_public::<Materials>()
        )?;
        Ok(Self::assemble(week, materials))
    }

    pub fn assemble(week: ThemeWeek, materials: Vec<Material>) -> Self {
        let mut materials: Vec<Material> = materials
            .into_iter()
            .filter(|m| m.theme_week_id == week.id)
            .collect();
        winners_first(&mut materials);
        Self { week, materials }
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn winners(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter().filter(|m| m.is_winner)
    }

    pub fn others(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter().filter(|m| !m.is_winner)
    }
}
