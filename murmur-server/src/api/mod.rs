pub mod auth;
pub mod error;
pub mod flash;
pub mod interactions;
pub mod posts;

pub use error::{ApiError, PageError, PageResult};
