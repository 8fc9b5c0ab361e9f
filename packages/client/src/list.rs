use common::Id;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::resource::{Entity, PublicList, Resource, Source, Updatable};

/// Capacity of each list's change channel. Slow subscribers miss the oldest
/// events rather than blocking the controller.
const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Change notification emitted by an [`EntityList`].
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent<T> {
    Loading,
    Loaded(usize),
    Added(T),
    Updated(T),
    Removed(Id),
    Failed(String),
}

/// Explicit user confirmation for destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// In-memory cache of one server collection.
///
/// The server stays the source of truth: every mutation round-trips first
/// and only a successful response changes `items`.
pub struct EntityList<R: Resource> {
    api: ApiClient,
    source: Source,
    items: Vec<R::Entity>,
    status: ListStatus,
    error: Option<String>,
    events: broadcast::Sender<ListEvent<R::Entity>>,
}

impl<R: Resource> EntityList<R> {
    /// List backed by the authenticated admin endpoint.
    pub fn admin(api: ApiClient) -> Self {
        Self::with_source(api, Source::admin::<R>())
    }

    fn with_source(api: ApiClient, source: Source) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            api,
            source,
            items: Vec::new(),
            status: ListStatus::Idle,
            error: None,
            events,
        }
    }

    pub fn items(&self) -> &[R::Entity] {
        &self.items
    }

    pub fn status(&self) -> ListStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == ListStatus::Loading
    }

    /// Last human-readable failure, cleared by the next successful load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &Id) -> Option<&R::Entity> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.get(id).is_some()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Receive every state change from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent<R::Entity>> {
        self.events.subscribe()
    }

    fn emit(&self, event: ListEvent<R::Entity>) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn fail(&mut self, action: &str, err: &ClientError) {
        let message = format!("Failed to {action} {}: {err}", R::NAME);
        warn!(resource = R::NAME, %message);
        self.error = Some(message.clone());
        self.emit(ListEvent::Failed(message));
    }

    /// Fetch the collection, replacing whatever was cached.
    ///
    /// On failure the list is left empty rather than stale.
    #[instrument(skip(self), fields(resource = R::NAME, path = self.source.path))]
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.status = ListStatus::Loading;
        self.error = None;
        self.emit(ListEvent::Loading);

        match self.api.list_from::<R::Entity>(self.source).await {
            Ok(items) => {
                self.items = items;
                self.status = ListStatus::Ready;
                debug!(count = self.items.len(), "List loaded");
                self.emit(ListEvent::Loaded(self.items.len()));
                Ok(())
            }
            Err(err) => {
                self.items.clear();
                self.status = ListStatus::Error;
                self.fail("load", &err);
                Err(err)
            }
        }
    }

    /// Insert a server-returned entity. An item with the same id is replaced
    /// in place, so the list never holds duplicates.
    pub fn add(&mut self, entity: R::Entity) {
        match self.items.iter_mut().find(|item| item.id() == entity.id()) {
            Some(existing) => {
                *existing = entity.clone();
                self.emit(ListEvent::Updated(entity));
            }
            None => {
                self.items.push(entity.clone());
                self.emit(ListEvent::Added(entity));
            }
        }
    }

    /// Create on the server, then append the returned entity.
    pub async fn create(&mut self, payload: &R::Create) -> Result<R::Entity, ClientError> {
        match self.api.create::<R>(payload).await {
            Ok(entity) => {
                self.add(entity.clone());
                Ok(entity)
            }
            Err(err) => {
                self.fail("create", &err);
                Err(err)
            }
        }
    }

    /// Delete after explicit confirmation.
    ///
    /// Returns `Ok(false)` when the user declines; nothing is sent then. A
    /// failed delete leaves the item in place.
    #[instrument(skip(self, id, confirm), fields(resource = R::NAME, %id))]
    pub async fn remove_one(&mut self, id: &Id, confirm: &dyn Confirm) -> Result<bool, ClientError> {
        let prompt = match self.get(id) {
            Some(_) => format!("Delete {} item {id}?", R::NAME),
            None => format!("Delete {} item {id} (not in the loaded list)?", R::NAME),
        };
        if !confirm.confirm(&prompt) {
            debug!("Delete declined");
            return Ok(false);
        }

        if let Err(err) = self.api.remove::<R>(id).await {
            self.fail("delete", &err);
            return Err(err);
        }

        self.items.retain(|item| item.id() != id);
        self.emit(ListEvent::Removed(id.clone()));
        Ok(true)
    }

    /// Apply `change` to the cached item with `id`, if present.
    pub(crate) fn modify_local(
        &mut self,
        id: &Id,
        change: impl FnOnce(&mut R::Entity),
    ) -> Option<R::Entity> {
        let item = self.items.iter_mut().find(|item| item.id() == id)?;
        change(item);
        let updated = item.clone();
        self.emit(ListEvent::Updated(updated.clone()));
        Some(updated)
    }

    pub(crate) fn record_failure(&mut self, action: &str, err: &ClientError) {
        self.fail(action, err);
    }
}

impl<R: PublicList> EntityList<R> {
    /// Read-only list backed by the unauthenticated endpoint.
    pub fn public(api: ApiClient) -> Self {
        Self::with_source(api, Source::public::<R>())
    }
}

impl<R: Updatable> EntityList<R> {
    /// Update on the server, then replace the matching item with the
    /// server's version. Other items are untouched.
    #[instrument(skip(self, id, patch), fields(resource = R::NAME, %id))]
    pub async fn update_one(&mut self, id: &Id, patch: &R::Patch) -> Result<R::Entity, ClientError> {
        match self.api.update::<R>(id, patch).await {
            Ok(entity) => {
                if self.modify_local(id, |item| *item = entity.clone()).is_none() {
                    debug!("Updated item was not in the loaded list");
                }
                Ok(entity)
            }
            Err(err) => {
                self.fail("update", &err);
                Err(err)
            }
        }
    }
}
