use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use crate::api::{ApiError, PageError};
use crate::db::repositories::UserRepository;
use crate::session::SESSION_COOKIE;
use crate::state::AppState;

/// The logged-in user for the current request
///
/// Extracting it from a request without a live session rejects with an
/// auth notice and a redirect to the login page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i64,
    pub username: String,
}

impl SessionUser {
    pub fn new(user_id: i64, username: String) -> Self {
        Self { user_id, username }
    }
}

/// Session token from the request cookies, if present
pub fn session_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

fn resolve_session_user(state: &AppState, token: &str) -> Result<SessionUser, ApiError> {
    let username = state
        .get_authenticated_username(token)
        .ok_or_else(|| ApiError::Auth("Please login first!".to_string()))?;

    let user_id = UserRepository::new(state.db.pool.clone())
        .get_id_by_username(&username)?
        .ok_or_else(|| ApiError::Auth("Please login first!".to_string()))?;

    Ok(SessionUser::new(user_id, username))
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<SessionUser>().cloned() {
            return Ok(user);
        }

        let token = session_token(parts)
            .ok_or_else(|| ApiError::Auth("Please login first!".to_string()))?;
        let user = resolve_session_user(state, &token)?;

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
