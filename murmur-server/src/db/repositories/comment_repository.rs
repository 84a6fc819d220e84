use anyhow::{Context, Result};
use rusqlite::Row;

use murmur_types::{Comment, RankedComment};

use super::timestamp;
use crate::db::DbPool;

pub struct CommentRepository {
    pool: DbPool,
}

/// Maps `c.id, c.post_id, u.username, c.comment, c.created_at`
fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        author_username: row.get(2)?,
        comment: row.get(3)?,
        created_at: timestamp(row, 4)?,
    })
}

impl CommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new comment, returning its id
    pub fn create(&self, user_id: i64, post_id: i64, comment: &str) -> Result<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO comments (user_id, post_id, comment) VALUES (?, ?, ?)",
            (user_id, post_id, comment),
        )
        .context("Failed to create comment")?;
        Ok(conn.last_insert_rowid())
    }

    pub fn exists(&self, comment_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE id = ?",
            [comment_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Most recent comments on a post, newest first
    pub fn get_recent(&self, post_id: i64, limit: i64) -> Result<Vec<Comment>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT c.id, c.post_id, u.username, c.comment, c.created_at
             FROM comments c
             JOIN users u ON c.user_id = u.id
             WHERE c.post_id = ?
             ORDER BY c.created_at DESC, c.id DESC
             LIMIT ?",
        )?;

        let comments = stmt
            .query_map((post_id, limit), comment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    /// Most liked comments on a post
    ///
    /// Ordered by like count descending; ties go to the newer comment.
    pub fn get_top(&self, post_id: i64, limit: i64) -> Result<Vec<RankedComment>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT c.id, c.post_id, u.username, c.comment, c.created_at,
                    COUNT(cl.id) as like_count
             FROM comments c
             JOIN users u ON c.user_id = u.id
             LEFT JOIN comment_likes cl ON cl.comment_id = c.id
             WHERE c.post_id = ?
             GROUP BY c.id
             ORDER BY like_count DESC, c.created_at DESC, c.id DESC
             LIMIT ?",
        )?;

        let comments = stmt
            .query_map((post_id, limit), |row| {
                Ok(RankedComment {
                    comment: comment_from_row(row)?,
                    likes: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    /// Every comment on a post, newest first, with its like count
    pub fn get_all_with_likes(&self, post_id: i64) -> Result<Vec<RankedComment>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT c.id, c.post_id, u.username, c.comment, c.created_at,
                    (SELECT COUNT(*) FROM comment_likes cl WHERE cl.comment_id = c.id) as like_count
             FROM comments c
             JOIN users u ON c.user_id = u.id
             WHERE c.post_id = ?
             ORDER BY c.created_at DESC, c.id DESC",
        )?;

        let comments = stmt
            .query_map([post_id], |row| {
                Ok(RankedComment {
                    comment: comment_from_row(row)?,
                    likes: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    pub fn count_for_post(&self, post_id: i64) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE post_id = ?",
            [post_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Like a comment, ignoring repeats
    ///
    /// Returns true when a new like row was written.
    pub fn like(&self, user_id: i64, comment_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO comment_likes (user_id, comment_id) VALUES (?, ?)",
                (user_id, comment_id),
            )
            .context("Failed to like comment")?;
        Ok(inserted > 0)
    }

    pub fn like_count(&self, comment_id: i64) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM comment_likes WHERE comment_id = ?",
            [comment_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
