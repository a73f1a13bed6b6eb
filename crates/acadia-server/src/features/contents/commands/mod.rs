pub mod delete;
pub mod upload;

pub use delete::{DeleteContentCommand, DeleteContentError, DeleteContentResponse};
pub use upload::{
    UploadContentCommand, UploadContentError, UploadContentResponse, MAX_UPLOAD_BYTES,
};
