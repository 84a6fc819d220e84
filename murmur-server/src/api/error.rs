use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use thiserror::Error;

use super::flash::set_flash;

pub type PageResult<T> = Result<T, PageError>;

/// Failure kinds surfaced to the user as a flash notice
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Where the user lands when a handler doesn't say otherwise
    pub fn default_redirect(&self) -> &'static str {
        match self {
            ApiError::Auth(_) => "/login",
            _ => "/main",
        }
    }

    /// Send the user back to `path` with this error's notice
    pub fn back_to(self, path: impl Into<String>) -> PageError {
        PageError {
            error: self,
            back_to: path.into(),
        }
    }

    fn notice(&self) -> String {
        match self {
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Something went wrong. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// An error bound to the page the user should be redirected to
#[derive(Debug)]
pub struct PageError {
    pub error: ApiError,
    pub back_to: String,
}

impl From<ApiError> for PageError {
    fn from(error: ApiError) -> Self {
        let back_to = error.default_redirect().to_string();
        Self { error, back_to }
    }
}

impl From<anyhow::Error> for PageError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::from(err).into()
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Blocking task failed: {}", err))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let jar = set_flash(CookieJar::new(), &self.error.notice());
        (jar, Redirect::to(&self.back_to)).into_response()
    }
}
