use anyhow::{Context as _, bail};
use client::{ThemeWeeks, WeekCatalog, WeekPage};
use common::Id;
use common::youtube;
use tracing::debug;

use crate::cli::WeekCommand;
use crate::context::Context;
use crate::render;

pub async fn run(ctx: &Context, command: WeekCommand) -> anyhow::Result<()> {
    match command {
        WeekCommand::List => {
            let catalog = WeekCatalog::load(&ctx.api)
                .await
                .context("Failed to load theme weeks")?;
            render::catalog(&catalog);
        }
        WeekCommand::Show { id } => {
            let page = WeekPage::load(&ctx.api, &id.parse::<Id>()?)
                .await
                .with_context(|| format!("Failed to load theme week {id}"))?;
            render::week_page(&page);
        }
        WeekCommand::Open { id } => {
            let id: Id = id.parse()?;
            let week = ctx
                .api
                .get::<ThemeWeeks>(&id)
                .await
                .with_context(|| format!("Failed to load theme week {id}"))?;
            if week.result_url.is_empty() {
                bail!("Theme week {id} has no result video yet.");
            }
            let url = match youtube::extract_video_id(&week.result_url) {
                Some(video) => format!("https://www.youtube.com/watch?v={video}"),
                None => week.result_url.clone(),
            };
            debug!(%url, "Opening result video");
            open::that(&url).with_context(|| format!("Failed to open {url}"))?;
            render::success(&format!("Opened {url}"));
        }
    }
    Ok(())
}
