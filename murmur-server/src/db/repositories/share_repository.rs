use anyhow::{Context, Result};

use crate::db::DbPool;

/// Share records are written for auditing and never read back by handlers
pub struct ShareRepository {
    pool: DbPool,
}

impl ShareRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn record(&self, user_id: i64, post_id: i64) -> Result<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO shares (user_id, post_id) VALUES (?, ?)",
            (user_id, post_id),
        )
        .context("Failed to record share")?;
        Ok(conn.last_insert_rowid())
    }
}
