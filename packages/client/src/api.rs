use std::sync::Arc;
use std::time::Duration;

use common::config::ApiConfig;
use common::models::{LoginRequest, LoginResponse, RegisterRequest};
use common::{Id, User};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::{ClientError, error_message};
use crate::resource::{Entity, PublicDetail, PublicList, Resource, Source, Updatable};
use crate::session::SessionStore;

/// Typed client for the contest REST backend.
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<dyn SessionStore>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ClientError::network)?;
        Ok(Self::with_http(http, &config.base_url, session))
    }

    pub fn with_http(http: Client, base_url: &str, session: Arc<dyn SessionStore>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token, failing locally when no one is signed in.
    fn authorize(&self, req: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        match self.session.get_token()? {
            Some(token) => Ok(req.bearer_auth(token)),
            None => Err(ClientError::NotSignedIn),
        }
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        authenticated: bool,
    ) -> Result<RequestBuilder, ClientError> {
        let req = self.http.request(method, self.url(path));
        if authenticated {
            self.authorize(req)
        } else {
            Ok(req)
        }
    }

    async fn execute(req: RequestBuilder) -> Result<Response, ClientError> {
        let res = req.send().await.map_err(ClientError::network)?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!(status = status.as_u16(), %message, "Backend rejected request");
        Err(ClientError::api(status.as_u16(), message))
    }

    async fn fetch<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ClientError> {
        let res = Self::execute(req).await?;
        res.json::<T>()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Fetch a collection from an explicit source.
    #[instrument(skip(self, source), fields(path = source.path))]
    pub async fn list_from<T: DeserializeOwned>(
        &self,
        source: Source,
    ) -> Result<Vec<T>, ClientError> {
        let req = self.request(reqwest::Method::GET, source.path, source.authenticated)?;
        let items: Vec<T> = Self::fetch(req).await?;
        debug!(count = items.len(), "Fetched collection");
        Ok(items)
    }

    /// Authenticated listing, e.g. `GET /admin/materials`.
    pub async fn list_admin<R: Resource>(&self) -> Result<Vec<R::Entity>, ClientError> {
        self.list_from(Source::admin::<R>()).await
    }

    /// Public listing, e.g. `GET /theme-weeks`.
    pub async fn list_public<R: PublicList>(&self) -> Result<Vec<R::Entity>, ClientError> {
        self.list_from(Source::public::<R>()).await
    }

    #[instrument(skip(self, id), fields(resource = R::NAME, %id))]
    pub async fn get<R: PublicDetail>(&self, id: &Id) -> Result<R::Entity, ClientError> {
        let path = format!("{}/{}", R::DETAIL_PATH, id);
        let req = self.request(reqwest::Method::GET, &path, false)?;
        Self::fetch(req).await
    }

    #[instrument(skip(self, payload), fields(resource = R::NAME))]
    pub async fn create<R: Resource>(&self, payload: &R::Create) -> Result<R::Entity, ClientError> {
        let req = self
            .request(reqwest::Method::POST, R::ADMIN_PATH, true)?
            .json(payload);
        let created: R::Entity = Self::fetch(req).await?;
        debug!(id = %created.id(), "Created");
        Ok(created)
    }

    #[instrument(skip(self, id, patch), fields(resource = R::NAME, %id))]
    pub async fn update<R: Updatable>(
        &self,
        id: &Id,
        patch: &R::Patch,
    ) -> Result<R::Entity, ClientError> {
        let path = format!("{}/{}", R::ADMIN_PATH, id);
        let req = self.request(reqwest::Method::PUT, &path, true)?.json(patch);
        Self::fetch(req).await
    }

    /// `PUT` a partial update and ignore the response body.
    ///
    /// Used where the caller applies the change locally itself.
    #[instrument(skip(self, id, patch), fields(resource = R::NAME, %id))]
    pub async fn apply_patch<R: Updatable>(
        &self,
        id: &Id,
        patch: &R::Patch,
    ) -> Result<(), ClientError> {
        let path = format!("{}/{}", R::ADMIN_PATH, id);
        let req = self.request(reqwest::Method::PUT, &path, true)?.json(patch);
        Self::execute(req).await?;
        Ok(())
    }

    #[instrument(skip(self, id), fields(resource = R::NAME, %id))]
    pub async fn remove<R: Resource>(&self, id: &Id) -> Result<(), ClientError> {
        let path = format!("{}/{}", R::ADMIN_PATH, id);
        let req = self.request(reqwest::Method::DELETE, &path, true)?;
        Self::execute(req).await?;
        Ok(())
    }

    /// Profile of the signed-in user.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User, ClientError> {
        let req = self.request(reqwest::Method::GET, "/auth/me", true)?;
        Self::fetch(req).await
    }

    /// Sign in. Only administrator accounts are accepted; the token of any
    /// other account is discarded.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let req = self
            .request(reqwest::Method::POST, "/auth/login", false)?
            .json(&body);
        let res: LoginResponse = Self::fetch(req).await?;

        if !res.is_admin {
            warn!("Non-admin login rejected");
            return Err(ClientError::AdminOnly);
        }

        self.session.set_token(&res.token)?;
        debug!("Session token stored");
        Ok(res)
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/auth/register", false)?
            .json(request);
        Self::execute(req).await?;
        Ok(())
    }

    /// Forget the stored token.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.clear_token()?;
        Ok(())
    }

    /// Whether a token is stored. Says nothing about its validity.
    pub fn has_token(&self) -> Result<bool, ClientError> {
        Ok(self.session.get_token()?.is_some())
    }
}
