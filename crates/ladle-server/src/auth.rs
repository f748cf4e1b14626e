//! Token-based authentication gate.
//!
//! `POST /signin` checks the configured credentials and mints an opaque
//! session token; `POST /refresh` extends a live session. The gate
//! middleware requires a `Authorization: Bearer <token>` header on every
//! recipe route except the public listing. Sessions live in-process with
//! a configurable TTL.

use std::time::Duration;

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header::AUTHORIZATION, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::{json, Value};
use time::OffsetDateTime;

use crate::error::ApiError;
use crate::server::AppState;

/// A live session.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub expires_at: OffsetDateTime,
}

impl Session {
    fn is_expired(&self) -> bool {
        self.expires_at <= OffsetDateTime::now_utc()
    }
}

/// In-process session store keyed by opaque token.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    /// Mint a fresh session token for `username`.
    pub fn create(&self, username: &str) -> (String, Session) {
        let token = uuid::Uuid::new_v4().to_string();
        let session = Session {
            username: username.to_string(),
            expires_at: OffsetDateTime::now_utc() + self.ttl,
        };
        self.sessions.insert(token.clone(), session.clone());
        (token, session)
    }

    /// Look a token up, evicting it if expired.
    pub fn validate(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token)?.value().clone();
        if session.is_expired() {
            drop(self.sessions.remove(token));
            return None;
        }
        Some(session)
    }

    /// Extend a live session by the configured TTL.
    pub fn refresh(&self, token: &str) -> Option<Session> {
        self.validate(token)?;
        let mut entry = self.sessions.get_mut(token)?;
        entry.expires_at = OffsetDateTime::now_utc() + self.ttl;
        Some(entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

fn session_body(token: &str, session: &Session) -> Value {
    json!({
        "token": token,
        "expires_at": session
            .expires_at
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
    })
}

/// POST /signin
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(credentials) = payload.map_err(|e| ApiError::bad_input(e.body_text()))?;

    let auth = &state.config.auth;
    // An unconfigured username never matches, so an instance without
    // credentials cannot be signed into with empty strings.
    let accepted = !auth.username.is_empty()
        && credentials.username == auth.username
        && credentials.password == auth.password;
    if !accepted {
        tracing::debug!(username = %credentials.username, "sign-in rejected");
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let (token, session) = state.sessions.create(&credentials.username);
    tracing::info!(username = %session.username, "session created");
    Ok(Json(session_body(&token, &session)))
}

/// POST /refresh
pub async fn refresh(
    State(state): State<AppState>,
    req: Request<Body>,
) -> Result<Json<Value>, ApiError> {
    let token = bearer_token(&req)
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?
        .to_string();

    match state.sessions.refresh(&token) {
        Some(session) => Ok(Json(session_body(&token, &session))),
        None => Err(ApiError::unauthorized("Invalid or expired token")),
    }
}

/// Authentication middleware over the recipe routes.
///
/// Public endpoints and the recipe listing pass through; everything else
/// requires a live Bearer session. The validated username is stored in
/// request extensions for downstream logging.
pub async fn auth_gate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.auth.enabled || should_skip_authentication(&req) {
        return next.run(req).await;
    }

    let token = match bearer_token(&req) {
        Some(token) => token.to_string(),
        None => {
            tracing::debug!(path = %req.uri().path(), "missing or malformed Authorization header");
            return unauthorized_response("Authentication required");
        }
    };

    match state.sessions.validate(&token) {
        Some(session) => {
            req.extensions_mut().insert(session.username.clone());
            next.run(req).await
        }
        None => unauthorized_response("Invalid or expired token"),
    }
}

/// Extract the Bearer token from the Authorization header, if well-formed.
fn bearer_token(req: &Request<Body>) -> Option<&str> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    match header.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Some(token),
        _ => None,
    }
}

/// Check if a request should skip authentication.
fn should_skip_authentication(req: &Request<Body>) -> bool {
    let path = req.uri().path();

    // Public endpoints that don't require authentication
    let public_paths = ["/", "/healthz", "/readyz", "/metrics", "/signin", "/refresh"];
    if public_paths.contains(&path) {
        return true;
    }

    // The recipe listing is readable without a session.
    req.method() == Method::GET && path == "/recipes"
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [("WWW-Authenticate", "Bearer")],
        Json(json!({ "error": message })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_validate() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (token, _) = store.create("admin");

        let session = store.validate(&token).expect("session is live");
        assert_eq!(session.username, "admin");
        assert!(store.validate("no-such-token").is_none());
    }

    #[test]
    fn expired_sessions_are_evicted() {
        let store = SessionStore::new(Duration::ZERO);
        let (token, _) = store.create("admin");

        assert!(store.validate(&token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn refresh_extends_expiry() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (token, original) = store.create("admin");

        let refreshed = store.refresh(&token).expect("session is live");
        assert!(refreshed.expires_at >= original.expires_at);
        assert!(store.refresh("no-such-token").is_none());
    }
}
