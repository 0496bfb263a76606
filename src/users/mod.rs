use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod policy;
pub mod repo;
pub mod repo_types;

pub use repo_types::{AccountStatus, User, ROLE_ADMIN, ROLE_USER};

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
