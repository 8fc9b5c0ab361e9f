use std::path::{Path, PathBuf};

use anyhow::{Context as _, anyhow};
use client::{
    Dashboard, Draft, EntityList, FormController, MaterialDraft, Materials, Resource,
    ThemeWeekDraft, ThemeWeeks, UploadFile, UserDraft, Users, VideoDraft, Videos,
};
use common::{Id, Material, ThemeWeek, User, Video};
use indicatif::ProgressBar;
use tracing::debug;

use crate::cli::{AdminCommand, AdminWeekCommand, MaterialCommand, UserCommand, VideoCommand};
use crate::context::Context;
use crate::{prompt, render};

pub async fn run(ctx: &Context, command: AdminCommand) -> anyhow::Result<()> {
    let admin = ctx.require_admin().await?;
    debug!(username = %admin.username, "Admin access granted");

    match command {
        AdminCommand::Dashboard => {
            let dashboard = Dashboard::load(&ctx.api)
                .await
                .context("Failed to load dashboard")?;
            render::dashboard(&dashboard);
            Ok(())
        }
        AdminCommand::Users { command } => users(ctx, command).await,
        AdminCommand::Weeks { command } => weeks(ctx, command).await,
        AdminCommand::Videos { command } => videos(ctx, command).await,
        AdminCommand::Materials { command } => materials(ctx, command).await,
    }
}

async fn load<R: Resource>(ctx: &Context) -> anyhow::Result<EntityList<R>> {
    let mut list = EntityList::<R>::admin(ctx.api.clone());
    list.load()
        .await
        .with_context(|| format!("Failed to load {}", R::NAME))?;
    Ok(list)
}

async fn delete<R: Resource>(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let id: Id = id.parse()?;
    let mut list = load::<R>(ctx).await?;
    let mut events = list.subscribe();

    let confirm = prompt::confirmer(ctx.yes);
    let removed = list
        .remove_one(&id, &confirm)
        .await
        .with_context(|| format!("Failed to delete {} item {id}", R::NAME))?;
    if !removed {
        println!("Cancelled.");
    }
    render::changes(&mut events, |_| String::new());
    Ok(())
}

/// Queue `path` for upload on submit, reporting progress on a bar.
async fn with_file<D: Draft>(
    form: FormController<D>,
    path: &Path,
) -> anyhow::Result<(FormController<D>, ProgressBar)> {
    let file = UploadFile::from_path(path).await?;
    let (bar, progress) = prompt::upload_progress(&file.file_name);
    let mut form = form.on_progress(progress);
    form.select_file(file);
    Ok((form, bar))
}

fn finish(bar: Option<ProgressBar>) {
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
}

async fn users(ctx: &Context, command: UserCommand) -> anyhow::Result<()> {
    match command {
        UserCommand::List => render::users(load::<Users>(ctx).await?.items()),
        UserCommand::Add => {
            let mut users = EntityList::<Users>::admin(ctx.api.clone());
            let mut events = users.subscribe();

            let mut form = FormController::<UserDraft>::new();
            form.set_field("username", &prompt::text("Username", "", true)?)?;
            form.draft_mut().password = prompt::password(true)?;
            form.draft_mut().is_admin = prompt::yes_no("Administrator?", false)?;

            form.submit(&mut users)
                .await
                .context("Failed to create user")?;
            render::changes(&mut events, |u: &User| u.username.clone());
        }
        UserCommand::Delete { id } => delete::<Users>(ctx, &id).await?,
    }
    Ok(())
}

fn week_fields(draft: &mut ThemeWeekDraft) -> anyhow::Result<()> {
    draft.title = prompt::text("Title", &draft.title, true)?;
    draft.description = prompt::text("Description", &draft.description, false)?;
    draft.start_date = prompt::text("Start date (YYYY-MM-DD)", &draft.start_date, true)?;
    draft.end_date = prompt::text("End date (YYYY-MM-DD)", &draft.end_date, true)?;
    draft.result_url = prompt::text("Result video URL", &draft.result_url, true)?;
    Ok(())
}

/// Attach the illustration: a file to upload, or a URL typed in.
async fn week_image(
    form: FormController<ThemeWeekDraft>,
    image: Option<PathBuf>,
) -> anyhow::Result<(FormController<ThemeWeekDraft>, Option<ProgressBar>)> {
    match image {
        Some(path) => {
            let (form, bar) = with_file(form, &path).await?;
            Ok((form, Some(bar)))
        }
        None => {
            let mut form = form;
            let current = form.draft().image_url.clone();
            form.draft_mut().image_url = prompt::text("Image URL", &current, true)?;
            Ok((form, None))
        }
    }
}

async fn weeks(ctx: &Context, command: AdminWeekCommand) -> anyhow::Result<()> {
    let describe = |w: &ThemeWeek| format!("{} (#{})", w.title, w.id);

    match command {
        AdminWeekCommand::List => render::weeks(load::<ThemeWeeks>(ctx).await?.items()),
        AdminWeekCommand::Add { image } => {
            let mut weeks = EntityList::<ThemeWeeks>::admin(ctx.api.clone());
            let mut events = weeks.subscribe();

            let mut form = FormController::<ThemeWeekDraft>::new().with_gateway(ctx.gateway()?);
            week_fields(form.draft_mut())?;
            let (mut form, bar) = week_image(form, image).await?;

            let result = form.submit(&mut weeks).await;
            finish(bar);
            result.context("Failed to create theme week")?;
            render::changes(&mut events, describe);
        }
        AdminWeekCommand::Edit { id, image } => {
            let id: Id = id.parse()?;
            let mut weeks = load::<ThemeWeeks>(ctx).await?;
            let week = weeks
                .get(&id)
                .cloned()
                .ok_or_else(|| anyhow!("Theme week {id} not found"))?;
            let mut events = weeks.subscribe();

            let mut form =
                FormController::<ThemeWeekDraft>::edit(&week).with_gateway(ctx.gateway()?);
            week_fields(form.draft_mut())?;
            let (mut form, bar) = week_image(form, image).await?;

            let result = form.submit_edit(&id, &mut weeks).await;
            finish(bar);
            result.with_context(|| format!("Failed to update theme week {id}"))?;
            render::changes(&mut events, describe);
        }
        AdminWeekCommand::Delete { id } => delete::<ThemeWeeks>(ctx, &id).await?,
    }
    Ok(())
}

async fn videos(ctx: &Context, command: VideoCommand) -> anyhow::Result<()> {
    match command {
        VideoCommand::List => render::videos(load::<Videos>(ctx).await?.items()),
        VideoCommand::Add => {
            let weeks = load::<ThemeWeeks>(ctx).await?;
            let mut videos = EntityList::<Videos>::admin(ctx.api.clone());
            let mut events = videos.subscribe();

            let mut form = FormController::<VideoDraft>::new();
            let week = prompt::week(weeks.items())?;
            form.set_field("theme_week_id", week.as_str())?;
            form.set_field("title", &prompt::text("Title", "", true)?)?;
            form.set_field("student_name", &prompt::text("Student name", "", true)?)?;
            form.set_field("youtube_url", &prompt::text("YouTube URL", "", true)?)?;
            form.set_field("description", &prompt::text("Description", "", false)?)?;

            form.submit(&mut videos)
                .await
                .context("Failed to create video")?;
            render::changes(&mut events, |v: &Video| format!("{} by {}", v.title, v.student_name));
        }
        VideoCommand::Delete { id } => delete::<Videos>(ctx, &id).await?,
    }
    Ok(())
}

async fn materials(ctx: &Context, command: MaterialCommand) -> anyhow::Result<()> {
    let describe = |m: &Material| format!("{} by {} (#{})", m.title, m.student_name, m.id);

    match command {
        MaterialCommand::List => render::materials(load::<Materials>(ctx).await?.items()),
        MaterialCommand::Add { file } => {
            let weeks = load::<ThemeWeeks>(ctx).await?;
            let mut materials = EntityList::<Materials>::admin(ctx.api.clone());
            let mut events = materials.subscribe();

            let mut form = FormController::<MaterialDraft>::new().with_gateway(ctx.gateway()?);
            let week = prompt::week(weeks.items())?;
            form.set_field("theme_week_id", week.as_str())?;
            let kind = prompt::material_type()?;
            form.draft_mut().material_type = kind;
            form.set_field("title", &prompt::text("Title", "", true)?)?;
            form.set_field("student_name", &prompt::text("Student name", "", true)?)?;
            form.set_field("description", &prompt::text("Description", "", false)?)?;

            let file = match file {
                Some(path) => Some(path),
                None if kind.requires_upload() => {
                    let path = prompt::text("File to upload (empty to enter a URL)", "", false)?;
                    (!path.trim().is_empty()).then(|| PathBuf::from(path.trim()))
                }
                None => None,
            };

            let (mut form, bar) = match file {
                Some(path) if kind.requires_upload() => {
                    let (form, bar) = with_file(form, &path).await?;
                    (form, Some(bar))
                }
                _ => {
                    let label = if kind.requires_upload() { "URL" } else { "YouTube URL" };
                    form.set_field("url", &prompt::text(label, "", true)?)?;
                    (form, None)
                }
            };

            let result = form.submit(&mut materials).await;
            finish(bar);
            result.context("Failed to create material")?;
            render::changes(&mut events, describe);
        }
        MaterialCommand::Delete { id } => delete::<Materials>(ctx, &id).await?,
        MaterialCommand::Winner { id } => {
            let id: Id = id.parse()?;
            let mut materials = load::<Materials>(ctx).await?;

            let is_winner = materials
                .toggle_winner(&id)
                .await
                .with_context(|| format!("Failed to update material {id}"))?;
            let title = materials
                .get(&id)
                .map(|m| m.title.clone())
                .unwrap_or_else(|| id.to_string());
            if is_winner {
                render::success(&format!("{title} is now a winner ★"));
            } else {
                render::success(&format!("{title} is no longer a winner"));
            }
        }
    }
    Ok(())
}
