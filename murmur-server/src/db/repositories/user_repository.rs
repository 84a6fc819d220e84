use anyhow::{Context, Result};
use rusqlite::OptionalExtension;

use murmur_types::User;

use super::timestamp;
use crate::db::DbPool;

pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get user by username
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, username, email, created_at
             FROM users
             WHERE username = ?",
        )?;

        let user = stmt
            .query_row([username], |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                    created_at: timestamp(row, 3)?,
                })
            })
            .optional()?;

        Ok(user)
    }

    /// Resolve a username to its numeric id
    pub fn get_id_by_username(&self, username: &str) -> Result<Option<i64>> {
        let conn = self.pool.get()?;
        let id = conn
            .query_row("SELECT id FROM users WHERE username = ?", [username], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(id)
    }

    pub fn username_exists(&self, username: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?",
            [username],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Email lookups expect an already lower-cased address
    pub fn email_exists(&self, email: &str) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE email = ?",
            [email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Stored password digest for a username
    pub fn get_password_hash(&self, username: &str) -> Result<Option<String>> {
        let conn = self.pool.get()?;
        let hash = conn
            .query_row(
                "SELECT password FROM users WHERE username = ?",
                [username],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hash)
    }

    /// Create a new user, returning its id
    ///
    /// `password_hash` must already be a one-way digest.
    pub fn create(&self, username: &str, email: &str, password_hash: &str) -> Result<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO users (username, email, password) VALUES (?, ?, ?)",
            (username, email, password_hash),
        )
        .context("Failed to create user")?;
        Ok(conn.last_insert_rowid())
    }
}
