use crate::db::Database;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Database-backed session manager
///
/// A session maps an opaque UUID v4 token (the cookie value) to the
/// username that logged in. Expired sessions are rejected and removed
/// when they are next presented.
#[derive(Clone)]
pub struct SessionManager {
    db: Database,
    ttl: Duration,
}

impl SessionManager {
    /// Create a new session manager whose sessions last `ttl_days`
    pub fn new(db: Database, ttl_days: i64) -> Self {
        Self {
            db,
            ttl: Duration::days(ttl_days),
        }
    }

    /// Create a new session for a user
    ///
    /// # Arguments
    /// * `username` - The user the session identifies
    ///
    /// # Returns
    /// * `Result<String>` - The session token on success
    pub fn create_session(&self, username: &str) -> Result<String> {
        let token = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let expires_at = created_at + self.ttl;

        let conn = self.db.connection()?;
        conn.execute(
            "INSERT INTO sessions (token, username, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                token,
                username,
                created_at.to_rfc3339(),
                expires_at.to_rfc3339(),
            ],
        )
        .context("Failed to create session")?;

        tracing::info!("Created session for user {}", username);
        Ok(token)
    }

    /// Validate a session token and return the associated username
    ///
    /// # Returns
    /// * `Err` - If the session is unknown or expired
    pub fn validate_session(&self, token: &str) -> Result<String> {
        let (username, expires_at_str): (String, String) = {
            let conn = self.db.connection()?;
            conn.query_row(
                "SELECT username, expires_at FROM sessions WHERE token = ?1",
                rusqlite::params![token],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .context("Session not found")?
        };

        let expires_at = DateTime::parse_from_rfc3339(&expires_at_str)
            .context("Failed to parse expiry time")?
            .with_timezone(&Utc);

        if Utc::now() > expires_at {
            self.delete_session(token)?;
            anyhow::bail!("Session has expired");
        }

        Ok(username)
    }

    /// Delete a session (logout)
    pub fn delete_session(&self, token: &str) -> Result<()> {
        let conn = self.db.connection()?;
        let rows_affected = conn
            .execute(
                "DELETE FROM sessions WHERE token = ?1",
                rusqlite::params![token],
            )
            .context("Failed to delete session")?;

        if rows_affected > 0 {
            tracing::info!("Deleted session");
        }

        Ok(())
    }

    /// Clean up expired sessions from the database
    ///
    /// # Returns
    /// * `Result<usize>` - The number of sessions deleted
    pub fn cleanup_expired_sessions(&self) -> Result<usize> {
        let conn = self.db.connection()?;
        let now = Utc::now().to_rfc3339();

        let rows_affected = conn
            .execute(
                "DELETE FROM sessions WHERE expires_at < ?1",
                rusqlite::params![now],
            )
            .context("Failed to cleanup expired sessions")?;

        if rows_affected > 0 {
            tracing::info!("Cleaned up {} expired sessions", rows_affected);
        }

        Ok(rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::UserRepository;

    fn setup_test_db() -> Database {
        let db = Database::in_memory().expect("Failed to create test database");
        db.initialize().expect("Failed to initialize database");

        UserRepository::new(db.pool.clone())
            .create("testuser", "testuser@example.com", "digest")
            .expect("Failed to create test user");

        db
    }

    #[test]
    fn test_create_session() {
        let manager = SessionManager::new(setup_test_db(), 30);

        let token = manager.create_session("testuser").expect("Failed to create session");
        assert!(Uuid::parse_str(&token).is_ok(), "Token should be a valid UUID");
    }

    #[test]
    fn test_validate_session() {
        let manager = SessionManager::new(setup_test_db(), 30);

        let token = manager.create_session("testuser").expect("Failed to create session");
        let username = manager.validate_session(&token).expect("Failed to validate session");

        assert_eq!(username, "testuser");
    }

    #[test]
    fn test_validate_invalid_session() {
        let manager = SessionManager::new(setup_test_db(), 30);

        assert!(manager.validate_session("invalid-token").is_err());
    }

    #[test]
    fn test_session_for_unknown_user_rejected() {
        let manager = SessionManager::new(setup_test_db(), 30);

        assert!(manager.create_session("ghost").is_err());
    }

    #[test]
    fn test_delete_session() {
        let manager = SessionManager::new(setup_test_db(), 30);

        let token = manager.create_session("testuser").expect("Failed to create session");
        manager.delete_session(&token).expect("Failed to delete session");

        assert!(
            manager.validate_session(&token).is_err(),
            "Session should be invalid after deletion"
        );
    }

    #[test]
    fn test_expired_session_rejected() {
        let manager = SessionManager::new(setup_test_db(), -1);

        let token = manager.create_session("testuser").expect("Failed to create session");
        assert!(manager.validate_session(&token).is_err());
        assert_eq!(manager.cleanup_expired_sessions().unwrap(), 0, "validation already removed it");
    }

    #[test]
    fn test_cleanup_expired_sessions() {
        let db = setup_test_db();
        let expired = SessionManager::new(db.clone(), -1);
        let live = SessionManager::new(db, 30);

        expired.create_session("testuser").expect("Failed to create session");
        expired.create_session("testuser").expect("Failed to create session");
        let token = live.create_session("testuser").expect("Failed to create session");

        assert_eq!(live.cleanup_expired_sessions().expect("Failed to cleanup"), 2);
        assert!(live.validate_session(&token).is_ok());
    }
}
