//! Common test utilities for the HTTP flow tests

#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use tower::ServiceExt;

use murmur_server::{db::Database, router, state::AppState};

/// App instance backed by a fresh in-memory database
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize database");
        let state = AppState::new(db, 30);
        Self {
            app: router(state.clone()),
            state,
        }
    }

    /// A browser-like client with its own cookie store
    pub fn client(&self) -> TestClient {
        TestClient {
            app: self.app.clone(),
            cookies: HashMap::new(),
        }
    }
}

/// Response with the body already collected
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

pub struct TestClient {
    app: Router,
    pub cookies: HashMap<String, String>,
}

impl TestClient {
    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = Request::get(path).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        self.post_form_with_referer(path, form, None).await
    }

    pub async fn post_form_with_referer(
        &mut self,
        path: &str,
        form: &[(&str, &str)],
        referer: Option<&str>,
    ) -> TestResponse {
        let body = form
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let mut builder = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(referer) = referer {
            builder = builder.header(header::REFERER, referer);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    /// Current flash notice, decoded
    pub fn flash(&self) -> Option<String> {
        self.cookies
            .get("flash")
            .map(|v| urlencoding::decode(v).unwrap().into_owned())
    }

    pub fn has_session(&self) -> bool {
        self.cookies.contains_key("session")
    }

    async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if !self.cookies.is_empty() {
            let cookie_header = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            request
                .headers_mut()
                .insert(header::COOKIE, cookie_header.parse().unwrap());
        }

        let response = self.app.clone().oneshot(request).await.unwrap();
        self.store_cookies(&response);

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    fn store_cookies(&mut self, response: &Response<Body>) {
        for value in response.headers().get_all(header::SET_COOKIE) {
            let raw = value.to_str().unwrap();
            let pair = raw.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };

            let removed = value.is_empty() || raw.contains("Max-Age=0");
            if removed {
                self.cookies.remove(name.trim());
            } else {
                self.cookies.insert(name.trim().to_string(), value.trim().to_string());
            }
        }
    }
}

/// Sign up and log in, returning a client holding the session
pub async fn signed_in(app: &TestApp, username: &str, password: &str) -> TestClient {
    let mut client = app.client();
    let email = format!("{}@example.com", username);

    let response = client
        .post_form(
            "/signup",
            &[
                ("username", username),
                ("email", &email),
                ("password", password),
                ("confirm_password", password),
            ],
        )
        .await;
    assert_eq!(response.location.as_deref(), Some("/login"), "signup failed for {}", username);

    let response = client
        .post_form("/login", &[("username", username), ("password", password)])
        .await;
    assert_eq!(response.location.as_deref(), Some("/main"), "login failed for {}", username);
    assert!(client.has_session());

    client
}
