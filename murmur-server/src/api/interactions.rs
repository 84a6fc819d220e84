use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Uri},
    response::Redirect,
    Form,
};
use axum_extra::extract::cookie::CookieJar;

use murmur_types::{CommentForm, LikeState};

use super::flash::set_flash;
use super::posts::{ensure_post_exists, post_not_found};
use super::{ApiError, PageResult};
use crate::db::is_constraint_violation;
use crate::db::repositories::{
    BookmarkRepository, CommentRepository, LikeRepository, ShareRepository,
};
use crate::middleware::SessionUser;
use crate::state::AppState;

/// Local path of the referring page, falling back to the feed
///
/// Only the path and query of the `Referer` are kept, so the redirect never
/// leaves this site.
pub fn back_to_referrer(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_string()))
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| "/main".to_string())
}

/// A write against a post that vanished mid-request trips its foreign key
fn post_write_error(err: anyhow::Error) -> ApiError {
    if is_constraint_violation(&err) {
        post_not_found()
    } else {
        err.into()
    }
}

pub fn toggle_like(state: &AppState, user: &SessionUser, post_id: i64) -> Result<LikeState, ApiError> {
    ensure_post_exists(state, post_id)?;
    let like_state = LikeRepository::new(state.db.pool.clone())
        .toggle(user.user_id, post_id)
        .map_err(post_write_error)?;
    tracing::debug!("{} {} post {}", user.username, like_state.as_str(), post_id);
    Ok(like_state)
}

pub fn add_comment_to_post(
    state: &AppState,
    user: &SessionUser,
    post_id: i64,
    text: &str,
) -> Result<i64, ApiError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::Validation("Comment cannot be empty!".to_string()));
    }

    ensure_post_exists(state, post_id)?;
    let comment_id = CommentRepository::new(state.db.pool.clone())
        .create(user.user_id, post_id, text)
        .map_err(post_write_error)?;
    Ok(comment_id)
}

/// Like a comment; repeats are silent no-ops
pub fn like_comment(state: &AppState, user: &SessionUser, comment_id: i64) -> Result<(), ApiError> {
    let repo = CommentRepository::new(state.db.pool.clone());
    if !repo.exists(comment_id)? {
        return Err(ApiError::NotFound("Comment not found.".to_string()));
    }

    if !repo.like(user.user_id, comment_id)? {
        tracing::debug!("{} already liked comment {}", user.username, comment_id);
    }
    Ok(())
}

/// Bookmark a post, returning false when it was already bookmarked
pub fn bookmark(state: &AppState, user: &SessionUser, post_id: i64) -> Result<bool, ApiError> {
    ensure_post_exists(state, post_id)?;
    BookmarkRepository::new(state.db.pool.clone())
        .add(user.user_id, post_id)
        .map_err(post_write_error)
}

pub fn share(state: &AppState, user: &SessionUser, post_id: i64) -> Result<(), ApiError> {
    ensure_post_exists(state, post_id)?;
    ShareRepository::new(state.db.pool.clone())
        .record(user.user_id, post_id)
        .map_err(post_write_error)?;
    Ok(())
}

/// POST /like/:id - Toggle a like
pub async fn like_post(
    State(state): State<AppState>,
    user: SessionUser,
    Path(post_id): Path<i64>,
    headers: HeaderMap,
) -> PageResult<Redirect> {
    toggle_like(&state, &user, post_id)?;
    Ok(Redirect::to(&back_to_referrer(&headers)))
}

/// POST /add_comment/:id - Comment on a post
pub async fn add_comment(
    State(state): State<AppState>,
    user: SessionUser,
    Path(post_id): Path<i64>,
    headers: HeaderMap,
    Form(form): Form<CommentForm>,
) -> PageResult<Redirect> {
    add_comment_to_post(&state, &user, post_id, &form.comment)?;
    Ok(Redirect::to(&back_to_referrer(&headers)))
}

/// POST /comment_like/:id - Like a comment
pub async fn comment_like(
    State(state): State<AppState>,
    user: SessionUser,
    Path(comment_id): Path<i64>,
    headers: HeaderMap,
) -> PageResult<Redirect> {
    like_comment(&state, &user, comment_id)?;
    Ok(Redirect::to(&back_to_referrer(&headers)))
}

/// POST /bookmark/:id - Bookmark a post
pub async fn bookmark_post(
    State(state): State<AppState>,
    user: SessionUser,
    Path(post_id): Path<i64>,
    jar: CookieJar,
) -> PageResult<(CookieJar, Redirect)> {
    let message = if bookmark(&state, &user, post_id)? {
        "Post bookmarked!"
    } else {
        "Post already bookmarked."
    };
    Ok((set_flash(jar, message), Redirect::to("/main")))
}

/// POST /share/:id - Record a share and point the user at the link
pub async fn share_post(
    State(state): State<AppState>,
    user: SessionUser,
    Path(post_id): Path<i64>,
    jar: CookieJar,
) -> PageResult<(CookieJar, Redirect)> {
    share(&state, &user, post_id)?;
    Ok((
        set_flash(jar, "You can copy and share this post link!"),
        Redirect::to("/main"),
    ))
}
