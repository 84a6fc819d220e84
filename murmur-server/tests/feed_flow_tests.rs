mod common;

use axum::http::StatusCode;
use common::{signed_in, TestApp};
use murmur_server::db::repositories::{CommentRepository, PostRepository};

#[tokio::test]
async fn test_landing_and_health_need_no_session() {
    let app = TestApp::new();
    let mut client = app.client();

    let response = client.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Murmur"));

    let response = client.get("/health").await;
    assert_eq!(response.body, "OK");
}

#[tokio::test]
async fn test_protected_pages_redirect_to_login() {
    let app = TestApp::new();
    let mut client = app.client();

    for path in ["/main", "/post/1", "/post/1/comments"] {
        let response = client.get(path).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(response.location.as_deref(), Some("/login"), "{}", path);
        assert_eq!(client.flash().as_deref(), Some("Please login first!"));
    }

    let response = client.post_form("/post", &[("content", "sneaky")]).await;
    assert_eq!(response.location.as_deref(), Some("/login"));
    assert!(PostRepository::new(app.state.db.pool.clone()).get_feed().unwrap().is_empty());
}

#[tokio::test]
async fn test_alice_posts_and_bob_likes() {
    let app = TestApp::new();
    let mut alice = signed_in(&app, "alice", "wonderland").await;
    let mut bob = signed_in(&app, "bob", "builder").await;

    let response = alice.post_form("/post", &[("content", "  hello world  ")]).await;
    assert_eq!(response.location.as_deref(), Some("/main"));
    assert_eq!(alice.flash().as_deref(), Some("Post created successfully!"));

    let feed = PostRepository::new(app.state.db.pool.clone()).get_feed().unwrap();
    let (post, _) = &feed[0];
    assert_eq!(post.content, "hello world");

    let response = bob.post_form(&format!("/like/{}", post.id), &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/main"));

    let page = alice.get("/main").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<strong>alice</strong>"));
    assert!(page.body.contains("hello world"));
    assert!(page.body.contains("Like (1)"));
    // Rendering the page consumed the flash
    assert!(alice.flash().is_none());
}

#[tokio::test]
async fn test_empty_post_rejected() {
    let app = TestApp::new();
    let mut alice = signed_in(&app, "alice", "wonderland").await;

    let response = alice.post_form("/post", &[("content", "   ")]).await;
    assert_eq!(response.location.as_deref(), Some("/main"));
    assert_eq!(alice.flash().as_deref(), Some("Post cannot be empty!"));
    assert!(PostRepository::new(app.state.db.pool.clone()).get_feed().unwrap().is_empty());
}

#[tokio::test]
async fn test_like_toggle_follows_referer() {
    let app = TestApp::new();
    let mut alice = signed_in(&app, "alice", "wonderland").await;
    alice.post_form("/post", &[("content", "toggle me")]).await;
    let path = "/like/1";

    let response = alice
        .post_form_with_referer(path, &[], Some("http://localhost:3000/post/1"))
        .await;
    assert_eq!(response.location.as_deref(), Some("/post/1"));
    assert!(alice.get("/main").await.body.contains("Like (1)"));

    alice.post_form(path, &[]).await;
    assert!(alice.get("/main").await.body.contains("Like (0)"));

    alice.post_form(path, &[]).await;
    assert!(alice.get("/main").await.body.contains("Like (1)"));
}

#[tokio::test]
async fn test_detail_counts_views_and_ranks_comments() {
    let app = TestApp::new();
    let mut alice = signed_in(&app, "alice", "wonderland").await;
    let mut bob = signed_in(&app, "bob", "builder").await;
    alice.post_form("/post", &[("content", "discuss")]).await;

    for i in 0..7 {
        let text = format!("comment number {}", i);
        let response = bob.post_form("/add_comment/1", &[("comment", &text)]).await;
        assert_eq!(response.location.as_deref(), Some("/main"));
    }

    // The oldest comment becomes the most popular
    alice.post_form("/comment_like/1", &[]).await;
    let response = alice.post_form("/comment_like/1", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/main"));

    let comment_repo = CommentRepository::new(app.state.db.pool.clone());
    assert_eq!(comment_repo.like_count(1).unwrap(), 1);

    let mut body = String::new();
    for _ in 0..3 {
        let page = alice.get("/post/1").await;
        assert_eq!(page.status, StatusCode::OK);
        body = page.body;
    }
    assert!(body.contains("3 views"));
    assert!(body.contains("Show 2 more"));

    let first = body.find("comment number 0").expect("top comment shown");
    let second = body.find("comment number 6").expect("newest comment shown");
    assert!(first < second, "liked comment ranks first");
    assert!(!body.contains("comment number 1 "), "sixth comment is hidden");
    assert!(!body.contains("comment number 2 "), "seventh comment is hidden");

    let all = alice.get("/post/1/comments").await;
    assert_eq!(all.status, StatusCode::OK);
    for i in 0..7 {
        assert!(all.body.contains(&format!("comment number {}", i)));
    }
}

#[tokio::test]
async fn test_unknown_post_redirects_with_notice() {
    let app = TestApp::new();
    let mut alice = signed_in(&app, "alice", "wonderland").await;

    let response = alice.get("/post/99").await;
    assert_eq!(response.location.as_deref(), Some("/main"));
    assert_eq!(alice.flash().as_deref(), Some("Post not found."));

    let response = alice.post_form("/like/99", &[]).await;
    assert_eq!(response.location.as_deref(), Some("/main"));
    assert_eq!(alice.flash().as_deref(), Some("Post not found."));
}

#[tokio::test]
async fn test_bookmark_and_share() {
    let app = TestApp::new();
    let mut alice = signed_in(&app, "alice", "wonderland").await;
    alice.post_form("/post", &[("content", "keep this")]).await;

    alice.post_form("/bookmark/1", &[]).await;
    assert_eq!(alice.flash().as_deref(), Some("Post bookmarked!"));

    let response = alice.post_form("/bookmark/1", &[]).await;
    assert_eq!(response.location.as_deref(), Some("/main"));
    assert_eq!(alice.flash().as_deref(), Some("Post already bookmarked."));

    alice.post_form("/share/1", &[]).await;
    assert_eq!(
        alice.flash().as_deref(),
        Some("You can copy and share this post link!")
    );
}
