use anyhow::{Context, Result};
use rusqlite::OptionalExtension;

use murmur_types::Post;

use super::timestamp;
use crate::db::DbPool;

pub struct PostRepository {
    pool: DbPool,
}

impl PostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post, returning its id
    pub fn create(&self, user_id: i64, content: &str) -> Result<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO posts (user_id, content) VALUES (?, ?)",
            (user_id, content),
        )
        .context("Failed to create post")?;
        Ok(conn.last_insert_rowid())
    }

    /// Get every post, newest first, with its like count
    pub fn get_feed(&self) -> Result<Vec<(Post, i64)>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.user_id, u.username, p.content, p.views, p.created_at,
                    (SELECT COUNT(*) FROM likes WHERE post_id = p.id) as like_count
             FROM posts p
             JOIN users u ON p.user_id = u.id
             ORDER BY p.created_at DESC, p.id DESC",
        )?;

        let posts = stmt
            .query_map([], |row| {
                let post = Post {
                    id: row.get(0)?,
                    author_id: row.get(1)?,
                    author_username: row.get(2)?,
                    content: row.get(3)?,
                    views: row.get(4)?,
                    created_at: timestamp(row, 5)?,
                };
                Ok((post, row.get(6)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Get a single post by ID
    pub fn get_by_id(&self, post_id: i64) -> Result<Option<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.user_id, u.username, p.content, p.views, p.created_at
             FROM posts p
             JOIN users u ON p.user_id = u.id
             WHERE p.id = ?",
        )?;

        let post = stmt
            .query_row([post_id], |row| {
                Ok(Post {
                    id: row.get(0)?,
                    author_id: row.get(1)?,
                    author_username: row.get(2)?,
                    content: row.get(3)?,
                    views: row.get(4)?,
                    created_at: timestamp(row, 5)?,
                })
            })
            .optional()?;

        Ok(post)
    }

    pub fn exists(&self, post_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE id = ?",
            [post_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Record one view of a post
    ///
    /// Returns false when the post does not exist.
    pub fn increment_views(&self, post_id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let rows_affected = conn
            .execute("UPDATE posts SET views = views + 1 WHERE id = ?", [post_id])
            .context("Failed to increment post views")?;
        Ok(rows_affected > 0)
    }
}
