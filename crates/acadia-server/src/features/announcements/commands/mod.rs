pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateAnnouncementCommand, CreateAnnouncementError, CreateAnnouncementResponse};
pub use delete::{DeleteAnnouncementCommand, DeleteAnnouncementError, DeleteAnnouncementResponse};
pub use update::{UpdateAnnouncementCommand, UpdateAnnouncementError, UpdateAnnouncementResponse};
