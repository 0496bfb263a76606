use std::collections::HashMap;

use axum::async_trait;
use axum::http::HeaderMap;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

/// Opaque server-side session capability. The authenticators only ever need
/// these three operations; the backing store is an implementation detail.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session bound to the user and return its id.
    async fn insert(&self, user_id: i64) -> Uuid;
    /// Resolve a session id to the bound user, if the session is live.
    async fn get(&self, session_id: Uuid) -> Option<i64>;
    /// Invalidate a session. Destroying an unknown session is a no-op.
    async fn destroy(&self, session_id: Uuid);
}

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, i64>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, user_id: i64) -> Uuid {
        let session_id = Uuid::new_v4();
        self.sessions.write().await.insert(session_id, user_id);
        session_id
    }

    async fn get(&self, session_id: Uuid) -> Option<i64> {
        self.sessions.read().await.get(&session_id).copied()
    }

    async fn destroy(&self, session_id: Uuid) {
        self.sessions.write().await.remove(&session_id);
    }
}

/// Extract the session id from the Cookie header.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let cookie_header = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix("session=") {
            return Uuid::parse_str(value).ok();
        }
    }
    None
}

pub fn session_cookie(session_id: Uuid) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
