use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use common::Id;
use tracing::{debug, instrument, warn};

use crate::error::ClientError;
use crate::list::EntityList;
use crate::resource::{Resource, Updatable};
use crate::upload::{ProgressFn, UploadFile, UploadGateway};

type EntityOf<D> = <<D as Draft>::Resource as Resource>::Entity;

/// Writable fields of one entity type, as typed by the user.
pub trait Draft: Clone + Default + Send {
    type Resource: Resource;

    /// Shallow-merge one named field from user input.
    fn set_field(&mut self, name: &str, value: &str) -> Result<(), ClientError>;

    /// Required-field check. Runs before any network call.
    fn validate(&self, file: Option<&UploadFile>) -> Result<(), ClientError>;

    /// Whether a selected file is uploaded for this draft.
    fn accepts_file(&self) -> bool {
        false
    }

    /// Store the URL the gateway returned for the selected file.
    fn set_uploaded_url(&mut self, _url: String) {}

    fn to_payload(&self) -> <Self::Resource as Resource>::Create;
}

/// Drafts that can also edit an existing entity.
pub trait EditDraft: Draft
where
    <Self as Draft>::Resource: Updatable,
{
    fn from_entity(entity: &EntityOf<Self>) -> Self;

    fn to_patch(&self) -> <Self::Resource as Updatable>::Patch;
}

/// Holds the `submitting` flag for the duration of one submit, releasing it
/// even if the submit future is dropped halfway.
struct SubmitGuard {
    flag: Arc<AtomicBool>,
}

impl SubmitGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, ClientError> {
        if flag.swap(true, Ordering::AcqRel) {
            return Err(ClientError::Busy);
        }
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Create/edit form state for one entity type.
pub struct FormController<D: Draft> {
    draft: D,
    initial: D,
    file: Option<UploadFile>,
    submitting: Arc<AtomicBool>,
    error: Option<String>,
    gateway: Option<UploadGateway>,
    progress: Option<ProgressFn>,
}

impl<D: Draft> Default for FormController<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Draft> FormController<D> {
    pub fn new() -> Self {
        Self::with_initial(D::default())
    }

    fn with_initial(initial: D) -> Self {
        Self {
            draft: initial.clone(),
            initial,
            file: None,
            submitting: Arc::new(AtomicBool::new(false)),
            error: None,
            gateway: None,
            progress: None,
        }
    }

    /// Attach the gateway used for file uploads.
    pub fn with_gateway(mut self, gateway: UploadGateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Receive upload progress percentages.
    pub fn on_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), ClientError> {
        self.draft.set_field(name, value)
    }

    pub fn select_file(&mut self, file: UploadFile) {
        self.file = Some(file);
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Shared view of the submitting flag, for disabling submit controls.
    pub fn submitting_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.submitting)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Back to the initial values, dropping any selected file and error.
    pub fn reset(&mut self) {
        self.draft = self.initial.clone();
        self.file = None;
        self.error = None;
    }

    /// Validate, then upload the selected file if the draft takes one.
    ///
    /// Returns the draft to send; `self.draft` is left as typed.
    async fn prepare(&self) -> Result<D, ClientError> {
        self.draft.validate(self.file.as_ref())?;

        let mut draft = self.draft.clone();
        if let Some(file) = self.file.clone()
            && draft.accepts_file()
        {
            let gateway = self
                .gateway
                .as_ref()
                .ok_or_else(|| ClientError::Upload("No upload gateway configured".into()))?;
            let uploaded = gateway.upload(file, self.progress.clone()).await?;
            draft.set_uploaded_url(uploaded.url);
        }
        Ok(draft)
    }

    fn settle<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        let resource = <D::Resource as Resource>::NAME;
        match &result {
            Ok(_) => {
                debug!(resource, "Form submitted");
                self.reset();
            }
            Err(err) => {
                warn!(resource, error = %err, "Form submit failed");
                self.error = Some(err.to_string());
            }
        }
        result
    }

    /// Create a new entity from the draft and add it to `list`.
    ///
    /// On failure the draft is kept so the user can retry without retyping.
    #[instrument(skip_all)]
    pub async fn submit(
        &mut self,
        list: &mut EntityList<D::Resource>,
    ) -> Result<EntityOf<D>, ClientError> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;
        self.error = None;

        let result = match self.prepare().await {
            Ok(draft) => list.create(&draft.to_payload()).await,
            Err(err) => Err(err),
        };
        self.settle(result)
    }
}

impl<D> FormController<D>
where
    D: EditDraft,
    D::Resource: Updatable,
{
    /// Form pre-filled from an existing entity.
    pub fn edit(entity: &EntityOf<D>) -> Self {
        Self::with_initial(D::from_entity(entity))
    }

    /// Save the draft over the entity with `id` and replace it in `list`.
    #[instrument(skip_all, fields(%id))]
    pub async fn submit_edit(
        &mut self,
        id: &Id,
        list: &mut EntityList<D::Resource>,
    ) -> Result<EntityOf<D>, ClientError> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;
        self.error = None;

        let result = match self.prepare().await {
            Ok(draft) => list.update_one(id, &draft.to_patch()).await,
            Err(err) => Err(err),
        };
        self.settle(result)
    }
}
