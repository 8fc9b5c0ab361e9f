use std::sync::Arc;

use anyhow::{Context as _, bail};
use client::gate::{self, Access};
use client::{ApiClient, FileSessionStore, UploadGateway};
use common::User;

use crate::config::AppConfig;

/// Everything a command needs: configuration and ready clients.
pub struct Context {
    pub config: AppConfig,
    pub api: ApiClient,
    /// Skip delete confirmations.
    pub yes: bool,
}

impl Context {
    pub fn new(config: AppConfig, yes: bool) -> anyhow::Result<Self> {
        let session = Arc::new(FileSessionStore::new(&config.session.path));
        let api = ApiClient::new(&config.api, session).context("Failed to build API client")?;
        Ok(Self { config, api, yes })
    }

    pub fn gateway(&self) -> anyhow::Result<UploadGateway> {
        UploadGateway::new(&self.config.upload).context("Failed to build upload client")
    }

    /// Run the admin gate. Every admin command starts here.
    pub async fn require_admin(&self) -> anyhow::Result<User> {
        match gate::check(&self.api)
            .await
            .context("Failed to check session")?
        {
            Access::Granted(user) => Ok(user),
            Access::RedirectToLogin => {
                bail!("Not signed in as an administrator. Run `restart login` first.")
            }
            Access::RedirectHome => bail!("This account has no administrator rights."),
        }
    }
}
