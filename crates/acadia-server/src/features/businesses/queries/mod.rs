pub mod get;
pub mod list;

pub use get::{BusinessResponse, GetBusinessError, GetBusinessQuery};
pub use list::{ListBusinessesError, ListBusinessesQuery};
