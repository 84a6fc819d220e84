use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use murmur_types::{LoginForm, SignupForm};

use super::flash::{set_flash, take_flash};
use super::{ApiError, PageResult};
use crate::db::is_constraint_violation;
use crate::db::repositories::UserRepository;
use crate::password::{hash_password, verify_password};
use crate::render;
use crate::session::SESSION_COOKIE;
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Wrong username or password!";

/// Signup input after trimming and validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Trim the signup form, lower-case the email, and check required fields
pub fn validate_signup(form: &SignupForm) -> Result<NewAccount, ApiError> {
    let username = form.username.trim();
    let email = form.email.trim().to_lowercase();
    let password = form.password.trim();
    let confirm_password = form.confirm_password.trim();

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation("All fields are required!".to_string()));
    }
    if password != confirm_password {
        return Err(ApiError::Validation("Passwords do not match!".to_string()));
    }

    Ok(NewAccount {
        username: username.to_string(),
        email,
        password: password.to_string(),
    })
}

fn conflict_message(username_taken: bool, email_taken: bool) -> Option<&'static str> {
    match (username_taken, email_taken) {
        (true, true) => Some("User already exists with this username and email!"),
        (true, false) => Some("Username already taken!"),
        (false, true) => Some("An account already exists with this email!"),
        (false, false) => None,
    }
}

/// Reject usernames and emails that already belong to someone
pub fn check_availability(repo: &UserRepository, account: &NewAccount) -> Result<(), ApiError> {
    let username_taken = repo.username_exists(&account.username)?;
    let email_taken = repo.email_exists(&account.email)?;

    match conflict_message(username_taken, email_taken) {
        Some(msg) => Err(ApiError::Conflict(msg.to_string())),
        None => Ok(()),
    }
}

async fn create_account(state: &AppState, form: &SignupForm) -> Result<i64, ApiError> {
    let account = validate_signup(form)?;
    let repo = UserRepository::new(state.db.pool.clone());
    check_availability(&repo, &account)?;

    let password = account.password.clone();
    let digest = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    match repo.create(&account.username, &account.email, &digest) {
        Ok(user_id) => {
            tracing::info!("New account {} ({})", account.username, user_id);
            Ok(user_id)
        }
        // Lost a race with a concurrent signup for the same name or email
        Err(e) if is_constraint_violation(&e) => {
            check_availability(&repo, &account)?;
            Err(ApiError::Conflict("Username already taken!".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

async fn authenticate(state: &AppState, form: &LoginForm) -> Result<String, ApiError> {
    let username = form.username.trim().to_string();
    let password = form.password.trim().to_string();

    let digest = UserRepository::new(state.db.pool.clone())
        .get_password_hash(&username)?
        .ok_or_else(|| ApiError::Auth(BAD_CREDENTIALS.to_string()))?;

    let verified = tokio::task::spawn_blocking(move || verify_password(&digest, &password)).await?;
    if !verified {
        return Err(ApiError::Auth(BAD_CREDENTIALS.to_string()));
    }

    Ok(state.session_manager.create_session(&username)?)
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// GET / - Landing page
pub async fn index(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, flash) = take_flash(jar);
    (jar, Html(render::index_page(flash.as_deref())))
}

/// GET /signup - Signup form
pub async fn signup_page(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, flash) = take_flash(jar);
    (jar, Html(render::signup_page(flash.as_deref())))
}

/// POST /signup - Create an account
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> PageResult<(CookieJar, Redirect)> {
    create_account(&state, &form)
        .await
        .map_err(|e| e.back_to("/signup"))?;

    Ok((
        set_flash(jar, "Signup successful! Please log in."),
        Redirect::to("/login"),
    ))
}

/// GET /login - Login form
pub async fn login_page(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, flash) = take_flash(jar);
    (jar, Html(render::login_page(flash.as_deref())))
}

/// POST /login - Establish a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> PageResult<(CookieJar, Redirect)> {
    let token = authenticate(&state, &form)
        .await
        .map_err(|e| e.back_to("/login"))?;

    Ok((jar.add(session_cookie(token)), Redirect::to("/main")))
}

/// GET /logout - Clear the session, whether or not one exists
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Err(e) = state.session_manager.delete_session(cookie.value()) {
            tracing::error!("Failed to delete session on logout: {}", e);
        }
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (set_flash(jar, "You have been logged out."), Redirect::to("/login"))
}
