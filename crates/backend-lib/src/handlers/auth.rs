// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Register, login and logout handlers.
//!
//! Each handler runs its guards in order and stops at the first error:
//! - `register`: username present, username free, password long enough
//! - `login`: not locked out, username exists, password matches
//! - `logout`: never fails; reports what happened in the message
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use metrics::counter;
use sessionauth_common::{Credentials, MessageBody, UserView};
use zeroize::Zeroize;

use crate::{
    auth::{hash_password_secure, verify_password},
    config::SessionSettings,
    error::AppError,
    metrics as keys,
    middleware::{
        active_session, check_password_length, check_username_exists, check_username_free,
        check_username_present,
    },
    storage::NewUser,
    AppState,
};

pub const GOODBYE: &str = "goodbye";
pub const TRAPPED: &str = "trapped";
pub const STRANGER_DANGER: &str = "stranger danger";

/// Build the session cookie handed out on login
fn session_cookie(settings: &SessionSettings, session_id: String) -> Cookie<'static> {
    Cookie::build((settings.cookie_name.clone(), session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure_cookie)
        .build()
}

fn removal_cookie(settings: &SessionSettings) -> Cookie<'static> {
    Cookie::build((settings.cookie_name.clone(), "")).path("/").build()
}

/// `POST /register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), AppError> {
    let Json(Credentials {
        username,
        mut password,
    }) = payload?;
    // "sue" and " sue " are the same account
    let username = username.trim().to_string();

    check_username_present(&username)?;
    check_username_free(state.users.as_ref(), &username).await?;
    check_password_length(&password, state.settings.password.min_length)?;

    let work_factor = state.settings.password.work_factor;
    let password_hash =
        tokio::task::spawn_blocking(move || hash_password_secure(&mut password, work_factor))
            .await?
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

    let user = state
        .users
        .add(NewUser {
            username,
            password_hash,
        })
        .await?;

    counter!(keys::AUTH_REGISTER).increment(1);
    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    Ok((StatusCode::CREATED, Json(user.view())))
}

/// `POST /login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(CookieJar, Json<MessageBody>), AppError> {
    let Json(Credentials {
        username,
        mut password,
    }) = payload?;
    let username = username.trim().to_string();

    let limiter = &state.rate_limiter;
    if !limiter.check_rate_limit(&username) {
        tracing::warn!(username = %username, "login attempt while locked out");
        return Err(AppError::AuthRateLimited);
    }

    // lockout counters are only kept for registered users
    let user = check_username_exists(state.users.as_ref(), &username)
        .await
        .inspect_err(|e| {
            if matches!(e, AppError::InvalidCredentials) {
                password.zeroize();
                counter!(keys::AUTH_LOGIN_FAILURE).increment(1);
            }
        })?;

    let stored_hash = user.password_hash.clone();
    let matched = tokio::task::spawn_blocking(move || {
        let matched = verify_password(&stored_hash, &password);
        password.zeroize();
        matched
    })
    .await?;

    if !matched {
        limiter.record_failed_attempt(&username);
        counter!(keys::AUTH_LOGIN_FAILURE).increment(1);
        tracing::warn!(username = %username, "login failed: password mismatch");
        return Err(AppError::InvalidCredentials);
    }
    limiter.record_success(&username);

    // never reuse a session id that existed before authentication
    if let Some(cookie) = jar.get(&state.settings.session.cookie_name) {
        if let Err(e) = state.sessions.destroy(cookie.value()).await {
            tracing::warn!("could not drop previous session on login: {e}");
        }
    }

    let session = state.sessions.create(user.view()).await?;

    counter!(keys::AUTH_LOGIN_SUCCESS).increment(1);
    tracing::info!(user_id = user.id, username = %user.username, "user logged in");

    let jar = jar.add(session_cookie(&state.settings.session, session.id));
    Ok((jar, Json(MessageBody::new(format!("welcome {username}")))))
}

/// `GET /logout`
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageBody>) {
    let session = match active_session(&state, &jar).await {
        Ok(Some(session)) => session,
        Ok(None) => return (jar, Json(MessageBody::new(STRANGER_DANGER))),
        Err(e) => {
            tracing::warn!("session lookup failed during logout: {e}");
            return (jar, Json(MessageBody::new(TRAPPED)));
        },
    };

    counter!(keys::AUTH_LOGOUT).increment(1);

    match state.sessions.destroy(&session.id).await {
        Ok(_) => {
            tracing::info!(user_id = session.user.id, "user logged out");
            let jar = jar.remove(removal_cookie(&state.settings.session));
            (jar, Json(MessageBody::new(GOODBYE)))
        },
        Err(e) => {
            tracing::warn!(user_id = session.user.id, "session destroy failed: {e}");
            (jar, Json(MessageBody::new(TRAPPED)))
        },
    }
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "Healthy"
}
