use std::fmt::Debug;

use common::models::CreateUserRequest;
use common::{
    Id, Material, MaterialPatch, MaterialPayload, ThemeWeek, ThemeWeekPayload, User, Video,
    VideoPayload,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Anything the backend hands out with a server-assigned id.
pub trait Entity: DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    fn id(&self) -> &Id;
}

impl Entity for User {
    fn id(&self) -> &Id {
        &self.id
    }
}

impl Entity for ThemeWeek {
    fn id(&self) -> &Id {
        &self.id
    }
}

impl Entity for Video {
    fn id(&self) -> &Id {
        &self.id
    }
}

impl Entity for Material {
    fn id(&self) -> &Id {
        &self.id
    }
}

/// A REST collection and the endpoints that manage it.
///
/// Implementors are zero-sized markers; capabilities beyond list/create/delete
/// are opted into through [`Updatable`], [`PublicList`] and [`PublicDetail`].
pub trait Resource: Send + Sync + 'static {
    type Entity: Entity;
    type Create: Serialize + Send + Sync;

    /// Plural name used in logs and messages.
    const NAME: &'static str;
    /// Authenticated collection path, e.g. `/admin/users`.
    const ADMIN_PATH: &'static str;
}

/// Resources whose items can be edited with `PUT {ADMIN_PATH}/:id`.
pub trait Updatable: Resource {
    type Patch: Serialize + Send + Sync;
}

/// Resources with an unauthenticated listing.
pub trait PublicList: Resource {
    const PUBLIC_PATH: &'static str;
}

/// Resources with an unauthenticated `GET {DETAIL_PATH}/:id`.
pub trait PublicDetail: Resource {
    const DETAIL_PATH: &'static str;
}

pub struct Users;
pub struct ThemeWeeks;
pub struct Videos;
pub struct Materials;

impl Resource for Users {
    type Entity = User;
    type Create = CreateUserRequest;
    const NAME: &'static str = "users";
    const ADMIN_PATH: &'static str = "/admin/users";
}

impl Resource for ThemeWeeks {
    type Entity = ThemeWeek;
    type Create = ThemeWeekPayload;
    const NAME: &'static str = "theme weeks";
    const ADMIN_PATH: &'static str = "/admin/theme-weeks";
}

impl Updatable for ThemeWeeks {
    type Patch = ThemeWeekPayload;
}

impl PublicList for ThemeWeeks {
    const PUBLIC_PATH: &'static str = "/theme-weeks";
}

impl PublicDetail for ThemeWeeks {
    const DETAIL_PATH: &'static str = "/theme-weeks";
}

impl Resource for Videos {
    type Entity = Video;
    type Create = VideoPayload;
    const NAME: &'static str = "videos";
    const ADMIN_PATH: &'static str = "/admin/videos";
}

impl PublicList for Videos {
    const PUBLIC_PATH: &'static str = "/videos";
}

impl Resource for Materials {
    type Entity = Material;
    type Create = MaterialPayload;
    const NAME: &'static str = "materials";
    const ADMIN_PATH: &'static str = "/admin/materials";
}

impl Updatable for Materials {
    type Patch = MaterialPatch;
}

impl PublicList for Materials {
    const PUBLIC_PATH: &'static str = "/theme-weeks/materials";
}

/// Where a list is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub path: &'static str,
    pub authenticated: bool,
}

impl Source {
    pub fn admin<R: Resource>() -> Self {
        Self {
            path: R::ADMIN_PATH,
            authenticated: true,
        }
    }

    pub fn public<R: PublicList>() -> Self {
        Self {
            path: R::PUBLIC_PATH,
            authenticated: false,
        }
    }
}
