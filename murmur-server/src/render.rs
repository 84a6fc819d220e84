//! HTML pages for the view models
//!
//! Every piece of user-supplied text goes through `html_escape` before it
//! is written into markup.

use std::fmt::Write;

use html_escape::encode_text;
use murmur_types::{Comment, FeedItem, PostDetail, RankedComment};

fn layout(title: &str, flash: Option<&str>, body: &str) -> String {
    let notice = flash
        .map(|msg| format!(r#"<div class="flash">{}</div>"#, encode_text(msg)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} · Murmur</title>
</head>
<body>
{notice}
{body}
</body>
</html>
"#,
        title = encode_text(title),
    )
}

pub fn index_page(flash: Option<&str>) -> String {
    layout(
        "Welcome",
        flash,
        r#"<h1>Murmur</h1>
<p>Short updates from people you know.</p>
<p><a href="/signup">Sign up</a> · <a href="/login">Log in</a></p>"#,
    )
}

pub fn signup_page(flash: Option<&str>) -> String {
    layout(
        "Sign up",
        flash,
        r#"<h1>Sign up</h1>
<form method="post" action="/signup">
<input name="username" placeholder="Username">
<input name="email" type="email" placeholder="Email">
<input name="password" type="password" placeholder="Password">
<input name="confirm_password" type="password" placeholder="Confirm password">
<button type="submit">Create account</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#,
    )
}

pub fn login_page(flash: Option<&str>) -> String {
    layout(
        "Log in",
        flash,
        r#"<h1>Log in</h1>
<form method="post" action="/login">
<input name="username" placeholder="Username">
<input name="password" type="password" placeholder="Password">
<button type="submit">Log in</button>
</form>
<p>New here? <a href="/signup">Sign up</a></p>"#,
    )
}

fn comment_line(comment: &Comment) -> String {
    format!(
        "<li><strong>{}</strong> {}</li>",
        encode_text(&comment.author_username),
        encode_text(&comment.comment)
    )
}

fn ranked_comment_line(ranked: &RankedComment) -> String {
    let comment = &ranked.comment;
    format!(
        r#"<li><strong>{}</strong> {} <form method="post" action="/comment_like/{}"><button type="submit">♥ {}</button></form></li>"#,
        encode_text(&comment.author_username),
        encode_text(&comment.comment),
        comment.id,
        ranked.likes
    )
}

fn comment_form(post_id: i64) -> String {
    format!(
        r#"<form method="post" action="/add_comment/{post_id}">
<input name="comment" placeholder="Write a comment">
<button type="submit">Comment</button>
</form>"#
    )
}

pub fn feed_page(username: &str, items: &[FeedItem], flash: Option<&str>) -> String {
    let mut body = format!(
        r#"<h1>Hi, {}</h1>
<p><a href="/logout">Log out</a></p>
<form method="post" action="/post">
<textarea name="content" placeholder="What's happening?"></textarea>
<button type="submit">Post</button>
</form>
"#,
        encode_text(username)
    );

    for item in items {
        let post = &item.post;
        let _ = write!(
            body,
            r#"<article id="post-{id}">
<header><strong>{author}</strong> <time>{created}</time></header>
<p>{content}</p>
<form method="post" action="/like/{id}"><button type="submit">Like ({likes})</button></form>
<form method="post" action="/bookmark/{id}"><button type="submit">Bookmark</button></form>
<form method="post" action="/share/{id}"><button type="submit">Share</button></form>
<a href="/post/{id}">View</a>
<ul>{comments}</ul>
{comment_form}
</article>
"#,
            id = post.id,
            author = encode_text(&post.author_username),
            created = post.created_at.format("%Y-%m-%d %H:%M"),
            content = encode_text(&post.content),
            likes = item.likes,
            comments = item.comments.iter().map(comment_line).collect::<String>(),
            comment_form = comment_form(post.id),
        );
    }

    layout("Feed", flash, &body)
}

pub fn post_detail_page(detail: &PostDetail, flash: Option<&str>) -> String {
    let post = &detail.post;
    let mut body = format!(
        r#"<p><a href="/main">Back to feed</a></p>
<article id="post-{id}">
<header><strong>{author}</strong> <time>{created}</time></header>
<p>{content}</p>
<p>{likes} likes · {views} views</p>
<form method="post" action="/like/{id}"><button type="submit">Like</button></form>
</article>
<h2>Top comments</h2>
<ul>{comments}</ul>
"#,
        id = post.id,
        author = encode_text(&post.author_username),
        created = post.created_at.format("%Y-%m-%d %H:%M"),
        content = encode_text(&post.content),
        likes = detail.likes,
        views = post.views,
        comments = detail
            .top_comments
            .iter()
            .map(ranked_comment_line)
            .collect::<String>(),
    );

    if detail.remaining > 0 {
        let _ = write!(
            body,
            r#"<p><a href="/post/{}/comments">Show {} more</a></p>"#,
            post.id, detail.remaining
        );
    }
    body.push_str(&comment_form(post.id));

    layout("Post", flash, &body)
}

pub fn post_comments_page(post_id: i64, comments: &[RankedComment], flash: Option<&str>) -> String {
    let body = format!(
        r#"<p><a href="/post/{post_id}">Back to post</a></p>
<h1>All comments</h1>
<ul>{}</ul>"#,
        comments.iter().map(ranked_comment_line).collect::<String>()
    );

    layout("Comments", flash, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use murmur_types::Post;

    fn post(content: &str) -> Post {
        Post {
            id: 7,
            author_id: 1,
            author_username: "alice".to_string(),
            content: content.to_string(),
            views: 3,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_feed_escapes_user_content() {
        let items = vec![FeedItem {
            post: post("<script>alert(1)</script>"),
            likes: 1,
            comments: Vec::new(),
        }];
        let html = feed_page("alice", &items, None);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Like (1)"));
    }

    #[test]
    fn test_detail_shows_more_link_only_when_needed() {
        let with_more = PostDetail::new(post("hi"), 0, Vec::new(), 2);
        assert!(post_detail_page(&with_more, None).contains("Show 2 more"));

        let without = PostDetail::new(post("hi"), 0, Vec::new(), 0);
        assert!(!post_detail_page(&without, None).contains("more</a>"));
    }

    #[test]
    fn test_flash_is_rendered() {
        let html = login_page(Some("Wrong username or password!"));
        assert!(html.contains(r#"<div class="flash">Wrong username or password!</div>"#));
    }
}
