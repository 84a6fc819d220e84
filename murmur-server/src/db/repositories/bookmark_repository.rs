use anyhow::{Context, Result};

use crate::db::DbPool;

pub struct BookmarkRepository {
    pool: DbPool,
}

impl BookmarkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Bookmark a post, ignoring repeats
    ///
    /// Returns true when a new bookmark row was written.
    pub fn add(&self, user_id: i64, post_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO bookmarks (user_id, post_id) VALUES (?, ?)",
                (user_id, post_id),
            )
            .context("Failed to bookmark post")?;
        Ok(inserted > 0)
    }

    pub fn count_for_user(&self, user_id: i64) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM bookmarks WHERE user_id = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
