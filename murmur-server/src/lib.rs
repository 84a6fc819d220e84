// Library exports for murmur-server
// The binary and the integration tests both build the app through `router`

pub mod api;
pub mod config;
pub mod db;
pub mod middleware;
pub mod password;
pub mod render;
pub mod session;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Authentication routes
        .route("/", get(api::auth::index))
        .route("/signup", get(api::auth::signup_page).post(api::auth::signup))
        .route("/login", get(api::auth::login_page).post(api::auth::login))
        .route("/logout", get(api::auth::logout))
        // Feed and post routes
        .route("/main", get(api::posts::feed))
        .route("/post", post(api::posts::create_post))
        .route("/post/:id", get(api::posts::post_detail))
        .route("/post/:id/comments", get(api::posts::post_comments))
        // Interaction routes
        .route("/like/:id", post(api::interactions::like_post))
        .route("/add_comment/:id", post(api::interactions::add_comment))
        .route("/comment_like/:id", post(api::interactions::comment_like))
        .route("/bookmark/:id", post(api::interactions::bookmark_post))
        .route("/share/:id", post(api::interactions::share_post))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}
