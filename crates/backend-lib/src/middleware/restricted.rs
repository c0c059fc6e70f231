// ============================
// crates/backend-lib/src/middleware/restricted.rs
// ============================
//! Session lookup and the guard for authenticated-only routes.
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{auth::Session, error::AppError, AppState};

/// The session of the caller, placed in request extensions by [`restricted`]
#[derive(Debug, Clone)]
pub struct SessionUser(pub Session);

impl<S: Send + Sync> FromRequestParts<S> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Resolve the session named by the request's session cookie, if it is live
pub async fn active_session(state: &AppState, jar: &CookieJar) -> Result<Option<Session>, AppError> {
    let Some(cookie) = jar.get(&state.settings.session.cookie_name) else {
        return Ok(None);
    };
    Ok(state.sessions.get(cookie.value()).await?)
}

/// Reject the request with 401 unless it carries a live session
pub async fn restricted(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = active_session(&state, &jar)
        .await?
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(SessionUser(session));
    Ok(next.run(request).await)
}
