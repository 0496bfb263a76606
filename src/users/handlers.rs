use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        extractors::CurrentUser,
        password::{hash_password, verify_password},
        service::is_valid_email,
    },
    error::ApiError,
    state::AppState,
    users::{
        dto::{ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UserSummary},
        policy::{authorize, validate_new_password, UserAction},
        repo::NewUser,
        repo_types::{AccountStatus, User, ROLE_USER},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/api/users", get(list_users))
        .route(
            "/users/:id",
            get(show_user).put(update_user).delete(delete_user),
        )
        .route("/users/:id/toggle-status", post(toggle_status))
        .route("/users/:id/change-password", post(change_password))
}

async fn load_target(state: &AppState, id: i64) -> Result<User, ApiError> {
    User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)
}

#[instrument(skip(state, principal))]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    authorize(&principal, &principal, UserAction::ListAll)?;

    let users = User::list_all(&state.db).await?;
    Ok(Json(users.iter().map(UserSummary::from).collect()))
}

#[instrument(skip(state, principal))]
pub async fn show_user(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<UserSummary>, ApiError> {
    let target = load_target(&state, id).await?;
    authorize(&principal, &target, UserAction::View)?;

    Ok(Json(UserSummary::from(&target)))
}

#[instrument(skip(state, principal, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(mut payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    authorize(&principal, &principal, UserAction::Create)?;

    payload.email = payload.email.trim().to_lowercase();
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::Validation("Password too short".into()));
    }
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::EmailTaken);
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        NewUser {
            email: &payload.email,
            first_name: &payload.first_name,
            last_name: &payload.last_name,
            password_hash: &hash,
            roles: payload
                .roles
                .unwrap_or_else(|| vec![ROLE_USER.to_string()]),
            account_status: payload.account_status.unwrap_or(AccountStatus::Active),
        },
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "user created");
    Ok((StatusCode::CREATED, Json(UserSummary::from(&user))))
}

#[instrument(skip(state, principal, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserSummary>, ApiError> {
    let target = load_target(&state, id).await?;
    authorize(&principal, &target, UserAction::Edit)?;

    let email = match payload.email {
        Some(email) => {
            let email = email.trim().to_lowercase();
            if !is_valid_email(&email) {
                return Err(ApiError::Validation("Invalid email".into()));
            }
            if let Some(existing) = User::find_by_email(&state.db, &email).await? {
                if existing.id != target.id {
                    return Err(ApiError::EmailTaken);
                }
            }
            email
        }
        None => target.email.clone(),
    };
    let first_name = payload.first_name.unwrap_or_else(|| target.first_name.clone());
    let last_name = payload.last_name.unwrap_or_else(|| target.last_name.clone());

    // Role and status fields are admin-only; other callers have them ignored.
    let user = if principal.is_admin() {
        let roles = payload.roles.unwrap_or_else(|| target.roles.clone());
        let account_status = payload.account_status.unwrap_or(target.account_status);
        User::update_admin(
            &state.db,
            target.id,
            &email,
            &first_name,
            &last_name,
            roles,
            account_status,
        )
        .await?
    } else {
        User::update_profile(&state.db, target.id, &email, &first_name, &last_name).await?
    };

    info!(user_id = %user.id, "user updated");
    Ok(Json(UserSummary::from(&user)))
}

#[instrument(skip(state, principal))]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let target = load_target(&state, id).await?;
    authorize(&principal, &target, UserAction::Delete)?;

    User::delete(&state.db, target.id).await?;
    info!(user_id = %target.id, email = %target.email, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, principal))]
pub async fn toggle_status(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<UserSummary>, ApiError> {
    let target = load_target(&state, id).await?;
    authorize(&principal, &target, UserAction::ToggleStatus)?;

    // Mirrors the old boolean toggle: any non-active state flips back to active.
    let next = if target.is_active() {
        AccountStatus::Suspended
    } else {
        AccountStatus::Active
    };
    let user = User::set_status(&state.db, target.id, next).await?;

    info!(user_id = %user.id, status = ?user.account_status, "user status toggled");
    Ok(Json(UserSummary::from(&user)))
}

#[instrument(skip(state, principal, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<UserSummary>, ApiError> {
    let target = load_target(&state, id).await?;
    authorize(&principal, &target, UserAction::ChangePassword)?;

    // Admins changing someone else's password skip the current-password check.
    let require_old_password = principal.id == target.id;
    if require_old_password {
        let old_password = payload
            .old_password
            .as_deref()
            .ok_or_else(|| ApiError::Validation("Please enter your old password".into()))?;
        if !verify_password(old_password, &target.password_hash)? {
            warn!(user_id = %target.id, "change password with incorrect old password");
            return Err(ApiError::Validation("The old password is incorrect".into()));
        }
    }

    validate_new_password(&payload.new_password, &payload.confirm_password)?;

    let hash = hash_password(&payload.new_password)?;
    let user = User::update_password(&state.db, target.id, &hash).await?;

    info!(user_id = %user.id, "user password changed");
    Ok(Json(UserSummary::from(&user)))
}
