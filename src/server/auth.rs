use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, TimeDelta, Utc};
use eyre::{Result, eyre};
use tokio::sync::RwLock;
use tower_cookies::{Cookie, Cookies, cookie::SameSite};

use crate::config::constants::SESSION_COOKIE;
use crate::error::Error;

use super::{AppState, LOGIN_PATH, response::ApiError};

/// Rejects ingestion requests whose Authorization header is not exactly the
/// configured shared secret. An empty secret rejects everything.
pub async fn require_api_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if !secret_matches(&state.auth.api_secret, provided) {
        log::warn!(
            "Rejected {} {}: bad or missing api secret",
            request.method(),
            request.uri().path()
        );
        return ApiError(Error::Unauthorized("missing or invalid api secret")).into_response();
    }
    next.run(request).await
}

/// Sends browsers without a live admin session to the login form.
pub async fn require_session(
    State(state): State<AppState>,
    cookies: Cookies,
    request: Request,
    next: Next,
) -> Response {
    if state.sessions.is_authenticated(&cookies).await {
        return next.run(request).await;
    }
    Redirect::to(LOGIN_PATH).into_response()
}

pub(crate) fn secret_matches(expected: &str, provided: Option<&str>) -> bool {
    !expected.is_empty() && provided == Some(expected)
}

#[derive(Debug, Clone)]
struct Session {
    username: String,
    expires_at: DateTime<Utc>,
}

/// Server held admin sessions keyed by the id stored in the session cookie.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: TimeDelta,
}

impl SessionStore {
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Starts a session and returns its id.
    pub async fn create(&self, username: &str) -> Result<String> {
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| eyre!("session expiry is out of range"))?;
        let id = uuid::Uuid::new_v4().to_string();
        let session = Session {
            username: username.to_string(),
            expires_at,
        };
        self.sessions.write().await.insert(id.clone(), session);
        Ok(id)
    }

    /// Returns true for a known, unexpired session. Expired sessions are
    /// dropped on the way.
    pub async fn is_valid(&self, id: &str) -> bool {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                Some(session) if session.expires_at > now => return true,
                None => return false,
                Some(_) => {}
            }
        }

        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.remove(id) {
            log::info!("Session of {} expired", session.username);
        }
        sessions.retain(|_, session| session.expires_at > now);
        false
    }

    pub async fn remove(&self, id: &str) {
        if let Some(session) = self.sessions.write().await.remove(id) {
            log::info!("{} logged out", session.username);
        }
    }

    pub async fn is_authenticated(&self, cookies: &Cookies) -> bool {
        match session_id(cookies) {
            Some(id) => self.is_valid(&id).await,
            None => false,
        }
    }
}

pub fn session_id(cookies: &Cookies) -> Option<String> {
    cookies
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

pub fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}
