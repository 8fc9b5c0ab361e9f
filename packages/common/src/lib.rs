pub mod config;
pub mod id;
pub mod models;
pub mod youtube;

pub use id::Id;
pub use models::{
    Material, MaterialPatch, MaterialPayload, MaterialType, ThemeWeek, ThemeWeekPayload, User,
    Video, VideoPayload, winners_first,
};
