mod account;
mod admin;
mod weeks;

use crate::cli::Command;
use crate::context::Context;

pub async fn run(ctx: &Context, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { username } => account::login(ctx, username).await,
        Command::Register { username, admin } => account::register(ctx, username, admin).await,
        Command::Logout => account::logout(ctx),
        Command::Me => account::me(ctx).await,
        Command::Weeks { command } => weeks::run(ctx, command).await,
        Command::Admin { command } => admin::run(ctx, command).await,
    }
}
