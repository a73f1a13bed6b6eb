pub mod create;
pub mod delete;
pub mod enroll;
pub mod unenroll;
pub mod update;

pub use create::{CreateBatchCommand, CreateBatchError, CreateBatchResponse};
pub use delete::{DeleteBatchCommand, DeleteBatchError, DeleteBatchResponse};
pub use enroll::{EnrollUsersCommand, EnrollUsersError, EnrollUsersResponse};
pub use unenroll::{UnenrollUserCommand, UnenrollUserError, UnenrollUserResponse};
pub use update::{UpdateBatchCommand, UpdateBatchError, UpdateBatchResponse};
