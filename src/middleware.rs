use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{self, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::{error::Error, AppState};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Resolves the caller from the `access_token` cookie (or a bearer header)
/// and stores the `User` in the request extensions.
pub async fn mw_require_auth<B>(
    State(state): State<Arc<AppState>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, Error> {
    let token = session_token(request.headers()).ok_or_else(|| {
        tracing::debug!(path = %request.uri().path(), "no session token presented");
        Error::Unauthenticated
    })?;

    let user = state.sessions.resolve(&token).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// The cookie wins over an `Authorization: Bearer` header when both are sent.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, ACCESS_TOKEN_COOKIE).or_else(|| bearer_token(headers))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.trim_matches('"').to_owned())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())?;
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_owned())
}

pub fn session_cookie(token: &str, ttl: Duration) -> String {
    format!(
        "{ACCESS_TOKEN_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        ttl.as_secs()
    )
}

pub fn clear_session_cookie() -> String {
    format!("{ACCESS_TOKEN_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}
