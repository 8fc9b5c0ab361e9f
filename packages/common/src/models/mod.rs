pub mod material;
pub mod shared;
pub mod theme_week;
pub mod user;
pub mod video;

pub use material::{Material, MaterialPatch, MaterialPayload, MaterialType, winners_first};
pub use theme_week::{ThemeWeek, ThemeWeekPayload};
pub use user::{CreateUserRequest, LoginRequest, LoginResponse, RegisterRequest, User};
pub use video::{Video, VideoPayload};
