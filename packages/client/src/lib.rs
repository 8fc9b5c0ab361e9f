//! Admin and public client for the contest backend.
//!
//! [`ApiClient`] talks to the REST API, [`UploadGateway`] to the file host.
//! [`EntityList`] and [`FormController`] hold the state a view renders.

pub mod api;
pub mod catalog;
pub mod dashboard;
pub mod drafts;
pub mod error;
pub mod form;
pub mod gate;
pub mod list;
pub mod resource;
pub mod session;
pub mod upload;
mod winner;

pub use api::ApiClient;
pub use catalog::{WeekCatalog, WeekPage};
pub use dashboard::Dashboard;
pub use drafts::{MaterialDraft, ThemeWeekDraft, UserDraft, VideoDraft};
pub use error::ClientError;
pub use form::{Draft, EditDraft, FormController};
pub use gate::Access;
pub use list::{Confirm, EntityList, ListEvent, ListStatus};
pub use resource::{Materials, Resource, ThemeWeeks, Users, Videos};
pub use session::{FileSessionStore, MemorySessionStore, SessionError, SessionStore};
pub use upload::{ProgressFn, UploadFile, UploadGateway, Uploaded};
