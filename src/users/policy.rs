use crate::error::ApiError;
use crate::users::repo_types::User;

/// Operations a principal can attempt against a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    View,
    Edit,
    ChangePassword,
    Delete,
    ToggleStatus,
    ListAll,
    Create,
}

/// Central allow/deny decision. Every denial is the same `Forbidden` kind so
/// callers cannot leak why access was refused.
pub fn authorize(principal: &User, target: &User, action: UserAction) -> Result<(), ApiError> {
    let allowed = match action {
        UserAction::Delete | UserAction::ToggleStatus | UserAction::ListAll | UserAction::Create => {
            principal.is_admin()
        }
        UserAction::View | UserAction::Edit | UserAction::ChangePassword => {
            principal.id == target.id || principal.is_admin()
        }
    };

    if allowed {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Form-level password checks, shared by the self-service and admin paths.
pub fn validate_new_password(new_password: &str, confirm_password: &str) -> Result<(), ApiError> {
    if new_password.len() < 8 {
        return Err(ApiError::Validation("Password too short".into()));
    }
    if new_password != confirm_password {
        return Err(ApiError::Validation("Passwords do not match".into()));
    }
    Ok(())
}
