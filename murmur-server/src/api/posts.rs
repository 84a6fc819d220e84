use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use axum_extra::extract::cookie::CookieJar;

use murmur_types::{CreatePostForm, FeedItem, PostDetail, RankedComment};

use super::flash::{set_flash, take_flash};
use super::{ApiError, PageResult};
use crate::db::repositories::{CommentRepository, LikeRepository, PostRepository};
use crate::middleware::SessionUser;
use crate::render;
use crate::state::AppState;

/// Comments shown under each post in the feed
pub const FEED_COMMENT_PREVIEW: i64 = 5;

/// Comments shown on a post's detail page
pub const TOP_COMMENTS: i64 = 5;

pub(crate) fn post_not_found() -> ApiError {
    ApiError::NotFound("Post not found.".to_string())
}

/// Fail with a not-found notice unless the post exists
pub(crate) fn ensure_post_exists(state: &AppState, post_id: i64) -> Result<(), ApiError> {
    if PostRepository::new(state.db.pool.clone()).exists(post_id)? {
        Ok(())
    } else {
        Err(post_not_found())
    }
}

/// Every post, newest first, with like counts and recent comments
pub fn load_feed(state: &AppState) -> Result<Vec<FeedItem>, ApiError> {
    let pool = state.db.pool.clone();
    let post_repo = PostRepository::new(pool.clone());
    let comment_repo = CommentRepository::new(pool);

    let posts = post_repo.get_feed()?;

    let mut items = Vec::with_capacity(posts.len());
    for (post, likes) in posts {
        let comments = comment_repo.get_recent(post.id, FEED_COMMENT_PREVIEW)?;
        items.push(FeedItem {
            post,
            likes,
            comments,
        });
    }

    Ok(items)
}

/// Count a view of the post, then load its detail
pub fn view_post(state: &AppState, post_id: i64) -> Result<PostDetail, ApiError> {
    let pool = state.db.pool.clone();
    let post_repo = PostRepository::new(pool.clone());
    let like_repo = LikeRepository::new(pool.clone());
    let comment_repo = CommentRepository::new(pool);

    if !post_repo.increment_views(post_id)? {
        return Err(post_not_found());
    }

    let post = post_repo.get_by_id(post_id)?.ok_or_else(post_not_found)?;
    let likes = like_repo.count_for_post(post_id)?;
    let top_comments = comment_repo.get_top(post_id, TOP_COMMENTS)?;
    let total_comments = comment_repo.count_for_post(post_id)?;

    Ok(PostDetail::new(post, likes, top_comments, total_comments))
}

/// Every comment on a post, newest first, with like counts
pub fn load_comments(state: &AppState, post_id: i64) -> Result<Vec<RankedComment>, ApiError> {
    ensure_post_exists(state, post_id)?;
    Ok(CommentRepository::new(state.db.pool.clone()).get_all_with_likes(post_id)?)
}

/// POST /post - Create a new post
pub async fn create_post(
    State(state): State<AppState>,
    user: SessionUser,
    jar: CookieJar,
    Form(form): Form<CreatePostForm>,
) -> PageResult<(CookieJar, Redirect)> {
    let content = form.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("Post cannot be empty!".to_string()).into());
    }

    let post_id = PostRepository::new(state.db.pool.clone()).create(user.user_id, content)?;
    tracing::debug!("{} created post {}", user.username, post_id);

    Ok((
        set_flash(jar, "Post created successfully!"),
        Redirect::to("/main"),
    ))
}

/// GET /main - The feed
pub async fn feed(
    State(state): State<AppState>,
    user: SessionUser,
    jar: CookieJar,
) -> PageResult<(CookieJar, Html<String>)> {
    let items = load_feed(&state)?;
    let (jar, flash) = take_flash(jar);
    Ok((jar, Html(render::feed_page(&user.username, &items, flash.as_deref()))))
}

/// GET /post/:id - Post detail; every request counts as a view
pub async fn post_detail(
    State(state): State<AppState>,
    _user: SessionUser,
    Path(post_id): Path<i64>,
    jar: CookieJar,
) -> PageResult<(CookieJar, Html<String>)> {
    let detail = view_post(&state, post_id)?;
    let (jar, flash) = take_flash(jar);
    Ok((jar, Html(render::post_detail_page(&detail, flash.as_deref()))))
}

/// GET /post/:id/comments - Full comment list
pub async fn post_comments(
    State(state): State<AppState>,
    _user: SessionUser,
    Path(post_id): Path<i64>,
    jar: CookieJar,
) -> PageResult<(CookieJar, Html<String>)> {
    let comments = load_comments(&state, post_id)?;
    let (jar, flash) = take_flash(jar);
    Ok((
        jar,
        Html(render::post_comments_page(post_id, &comments, flash.as_deref())),
    ))
}
