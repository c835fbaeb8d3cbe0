//! Session cookie authentication.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use common::Role;
use domain::{DomainError, IdentityContext};
use order_store::SessionStore;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the session cookie into an [`IdentityContext`] and admits the
/// request only if it carries `role`.
///
/// The identity is handed to handlers as a request extension.
pub async fn authenticate(
    State((state, role)): State<(Arc<AppState>, Role)>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = match session_token(request.headers(), &state.session_cookie) {
        Some(token) => state
            .sessions
            .find_session(token)
            .await
            .map_err(DomainError::from)?,
        None => None,
    };

    let identity = IdentityContext::resolve(session.as_ref(), Utc::now())?;
    identity.require(role)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Returns the value of the cookie called `name`, if present and non-empty.
fn session_token<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}
