use anyhow::Context as _;
use client::ClientError;
use common::models::RegisterRequest;

use crate::context::Context;
use crate::{prompt, render};

pub async fn login(ctx: &Context, username: Option<String>) -> anyhow::Result<()> {
    let username = match username {
        Some(name) => name,
        None => prompt::text("Username", "", true)?,
    };
    let password = prompt::password(false)?;

    match ctx.api.login(&username, &password).await {
        Ok(res) => {
            let name = res.username.unwrap_or(username);
            render::success(&format!("Signed in as {name}"));
            Ok(())
        }
        Err(ClientError::AdminOnly) => {
            anyhow::bail!("Only administrators can sign in to this client.")
        }
        Err(err) => Err(err).context("Login failed"),
    }
}

pub async fn register(ctx: &Context, username: Option<String>, admin: bool) -> anyhow::Result<()> {
    let username = match username {
        Some(name) => name,
        None => prompt::text("Username", "", true)?,
    };
    let password = prompt::password(true)?;

    ctx.api
        .register(&RegisterRequest {
            username: username.trim().to_string(),
            password,
            is_admin: admin,
        })
        .await
        .context("Registration failed")?;

    render::success(&format!(
        "Account {} created. Sign in with `restart login`.",
        username.trim()
    ));
    Ok(())
}

pub fn logout(ctx: &Context) -> anyhow::Result<()> {
    ctx.api.logout().context("Failed to clear session")?;
    render::success("Signed out");
    Ok(())
}

pub async fn me(ctx: &Context) -> anyhow::Result<()> {
    if !ctx.api.has_token()? {
        println!("Not signed in.");
        return Ok(());
    }
    let user = ctx.api.me().await.context("Failed to load profile")?;
    render::user(&user);
    Ok(())
}
