use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::session::session_id_from_headers;
use crate::auth::token::TokenSigner;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::User;

/// The authenticated principal for the request, resolved from either a
/// bearer token or a session cookie.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // The bearer authenticator claims the request whenever the scheme
        // matches (any casing); other Authorization schemes fall through to
        // the session path.
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if let Some(header) = auth_header {
            if header.len() >= 7 && header[..7].eq_ignore_ascii_case("Bearer ") {
                return bearer_user(state, &header[7..]).await.map(CurrentUser);
            }
        }

        if let Some(session_id) = session_id_from_headers(&parts.headers) {
            if let Some(user_id) = state.sessions.get(session_id).await {
                return session_user(state, user_id).await.map(CurrentUser);
            }
        }

        Err(ApiError::AuthenticationRequired)
    }
}

async fn bearer_user(state: &AppState, raw_token: &str) -> Result<User, ApiError> {
    let signer = TokenSigner::from_ref(state);
    let user_id = signer.verify(raw_token)?;

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    if !user.is_active() {
        warn!(user_id = %user.id, "token auth on disabled account");
        return Err(if state.config.auth.reveal_disabled_account {
            ApiError::AccountDisabled
        } else {
            ApiError::InvalidCredentials
        });
    }

    Ok(user)
}

async fn session_user(state: &AppState, user_id: i64) -> Result<User, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    // The session path never discloses why the account stopped working.
    if !user.is_active() {
        warn!(user_id = %user.id, "session auth on disabled account");
        return Err(ApiError::InvalidCredentials);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/me");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn missing_credentials_are_rejected() {
        let state = AppState::fake();
        let mut parts = parts_with_headers(&[]);
        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::AuthenticationRequired));
    }

    #[tokio::test]
    async fn non_bearer_scheme_falls_through_to_session_path() {
        let state = AppState::fake();
        let mut parts = parts_with_headers(&[("authorization", "Basic dXNlcjpwYXNz")]);
        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::AuthenticationRequired));
    }

    #[tokio::test]
    async fn empty_bearer_token_is_rejected() {
        let state = AppState::fake();
        let mut parts = parts_with_headers(&[("authorization", "Bearer    ")]);
        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::EmptyToken));
    }

    #[tokio::test]
    async fn bearer_scheme_match_is_case_insensitive() {
        let state = AppState::fake();
        let mut parts = parts_with_headers(&[("authorization", "bEaReR %%%")]);
        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::InvalidEncoding));
    }

    #[tokio::test]
    async fn unknown_session_cookie_is_rejected() {
        let state = AppState::fake();
        let cookie = format!("session={}", uuid::Uuid::new_v4());
        let mut parts = parts_with_headers(&[("cookie", cookie.as_str())]);
        let err = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::AuthenticationRequired));
    }
}
