//! One-shot notices carried across a redirect in the `flash` cookie

use axum_extra::extract::cookie::{Cookie, CookieJar};

pub const FLASH_COOKIE: &str = "flash";

/// Queue a notice for the next rendered page
pub fn set_flash(jar: CookieJar, message: &str) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, urlencoding::encode(message).into_owned()))
        .path("/")
        .http_only(true);
    jar.add(cookie)
}

/// Take the pending notice, if any, and clear it
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<String>) {
    let message = jar.get(FLASH_COOKIE).map(|cookie| {
        urlencoding::decode(cookie.value())
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| cookie.value().to_string())
    });

    match message {
        Some(message) => (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), Some(message)),
        None => (jar, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_round_trip() {
        let jar = set_flash(CookieJar::new(), "Post created successfully!");
        let stored = jar.get(FLASH_COOKIE).expect("flash cookie set");
        assert!(!stored.value().contains(' '));

        let (_, message) = take_flash(jar);
        assert_eq!(message.as_deref(), Some("Post created successfully!"));
    }

    #[test]
    fn test_take_flash_clears_cookie() {
        let jar = set_flash(CookieJar::new(), "hello");
        let (jar, _) = take_flash(jar);
        assert!(jar.get(FLASH_COOKIE).is_none());

        let (_, message) = take_flash(jar);
        assert!(message.is_none());
    }
}
