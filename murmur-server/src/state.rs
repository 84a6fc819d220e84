use crate::db::Database;
use crate::session::SessionManager;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub session_manager: SessionManager,
}

impl AppState {
    pub fn new(db: Database, session_ttl_days: i64) -> Self {
        let session_manager = SessionManager::new(db.clone(), session_ttl_days);
        Self {
            db,
            session_manager,
        }
    }

    /// Username behind a session token, if the session is live
    pub fn get_authenticated_username(&self, token: &str) -> Option<String> {
        self.session_manager.validate_session(token).ok()
    }
}
