use axum::{
    extract::{FromRef, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, MessageResponse, PublicUser, RegisterRequest},
        extractors::CurrentUser,
        password::hash_password,
        service::{authenticate, is_valid_email},
        session::{clear_session_cookie, session_cookie, session_id_from_headers},
        token::TokenSigner,
    },
    error::ApiError,
    mailer::{enqueue, EmailMessage},
    state::AppState,
    users::{repo::NewUser, AccountStatus, User, ROLE_USER},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/api/login", post(api_login))
        .route("/api/logout", post(api_logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/api/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::EmailTaken);
    }

    let hash = hash_password(&payload.password)?;

    // Self-registration always starts as an active plain user, whatever the
    // client sent.
    let user = User::create(
        &state.db,
        NewUser {
            email: &payload.email,
            first_name: &payload.first_name,
            last_name: &payload.last_name,
            password_hash: &hash,
            roles: vec![ROLE_USER.to_string()],
            account_status: AccountStatus::Active,
        },
    )
    .await?;

    enqueue(state.mailer.clone(), welcome_email(&state, &user));
    info!(user_id = %user.id, email = %user.email, "user registered");

    Ok((StatusCode::CREATED, Json(PublicUser::from(&user))))
}

fn welcome_email(state: &AppState, user: &User) -> EmailMessage {
    let name = if user.first_name.is_empty() {
        user.email.clone()
    } else {
        user.first_name.clone()
    };
    EmailMessage {
        from: state.config.mail_from.clone(),
        to: user.email.clone(),
        subject: "Welcome! Your account has been created".into(),
        html_body: format!(
            "<p>Hello {name},</p><p>Your account is ready. You can sign in with your email address.</p>"
        ),
    }
}

/// Where a fresh session lands: admins on the user list, everyone else on
/// their own profile.
fn post_login_redirect(user: &User) -> String {
    if user.is_admin() {
        "/users".to_string()
    } else {
        format!("/users/{}", user.id)
    }
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Form(mut payload): Form<LoginRequest>,
) -> Result<(AppendHeaders<[(axum::http::HeaderName, String); 1]>, Redirect), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = authenticate(&state.db, &payload.email, &payload.password)
        .await
        .map_err(collapse_disabled)?;

    let session_id = state.sessions.insert(user.id).await;
    info!(user_id = %user.id, email = %user.email, "user logged in");

    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie(session_id))]),
        Redirect::to(&post_login_redirect(&user)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn api_login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = authenticate(&state.db, &payload.email, &payload.password)
        .await
        .map_err(collapse_disabled)?;

    let signer = TokenSigner::from_ref(&state);
    let token = signer.issue(user.id);
    info!(user_id = %user.id, email = %user.email, "api token issued");

    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

/// Credential login never tells a caller the account exists but is disabled.
fn collapse_disabled(err: ApiError) -> ApiError {
    match err {
        ApiError::AccountDisabled => ApiError::InvalidCredentials,
        other => other,
    }
}

#[instrument(skip(state, headers))]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (AppendHeaders<[(axum::http::HeaderName, String); 1]>, Redirect) {
    if let Some(session_id) = session_id_from_headers(&headers) {
        state.sessions.destroy(session_id).await;
    }
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Redirect::to("/login"),
    )
}

#[instrument(skip(state, headers))]
pub async fn api_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (
    AppendHeaders<[(axum::http::HeaderName, String); 1]>,
    Json<MessageResponse>,
) {
    if let Some(session_id) = session_id_from_headers(&headers) {
        state.sessions.destroy(session_id).await;
    }
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Json(MessageResponse {
            message: "Logout successful",
        }),
    )
}

#[instrument(skip(principal))]
pub async fn get_me(CurrentUser(principal): CurrentUser) -> Json<PublicUser> {
    Json(PublicUser::from(&principal))
}
