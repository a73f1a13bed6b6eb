pub mod get;
pub mod list;

pub use get::{AnnouncementResponse, GetAnnouncementError, GetAnnouncementQuery};
pub use list::{ListAnnouncementsError, ListAnnouncementsQuery};
