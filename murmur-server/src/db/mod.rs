pub mod schema;
pub mod connection;
pub mod repositories;

pub use connection::{is_constraint_violation, Database, DbPool};
