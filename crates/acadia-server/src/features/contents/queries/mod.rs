pub mod download;
pub mod get;
pub mod list;

pub use download::{DownloadContentError, DownloadContentQuery, DownloadContentResponse};
pub use get::{ContentResponse, GetContentError, GetContentQuery};
pub use list::{ListContentsError, ListContentsQuery};
