use anyhow::{Context, Result};

use murmur_types::LikeState;

use crate::db::DbPool;

pub struct LikeRepository {
    pool: DbPool,
}

impl LikeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Toggle a user's like on a post
    ///
    /// Removes the like if present, inserts it otherwise. Both steps run in
    /// one transaction so the pair never ends up half-applied.
    pub fn toggle(&self, user_id: i64, post_id: i64) -> Result<LikeState> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let removed = tx
            .execute(
                "DELETE FROM likes WHERE user_id = ? AND post_id = ?",
                (user_id, post_id),
            )
            .context("Failed to remove like")?;

        let state = if removed > 0 {
            LikeState::Unliked
        } else {
            tx.execute(
                "INSERT INTO likes (user_id, post_id) VALUES (?, ?)",
                (user_id, post_id),
            )
            .context("Failed to insert like")?;
            LikeState::Liked
        };

        tx.commit().context("Failed to commit like toggle")?;
        Ok(state)
    }

    /// Count likes on a post
    pub fn count_for_post(&self, post_id: i64) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM likes WHERE post_id = ?",
            [post_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    #[cfg(test)]
    pub fn has_liked(&self, user_id: i64, post_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM likes WHERE user_id = ? AND post_id = ?",
            (user_id, post_id),
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
