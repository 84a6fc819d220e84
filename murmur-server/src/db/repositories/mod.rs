mod user_repository;
mod post_repository;
mod like_repository;
mod comment_repository;
mod bookmark_repository;
mod share_repository;

pub use user_repository::UserRepository;
pub use post_repository::PostRepository;
pub use like_repository::LikeRepository;
pub use comment_repository::CommentRepository;
pub use bookmark_repository::BookmarkRepository;
pub use share_repository::ShareRepository;

use chrono::{DateTime, Utc};
use rusqlite::{types::Type, Row};

/// Read an RFC 3339 timestamp column
pub(crate) fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    raw.parse::<DateTime<Utc>>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
