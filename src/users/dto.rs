use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::users::repo_types::{AccountStatus, User};

/// Full projection returned to admins and profile owners.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
    pub account_status: AccountStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            roles: user.effective_roles(),
            account_status: user.account_status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Admin user creation. Role and status fields are honored as given.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
    pub roles: Option<Vec<String>>,
    pub account_status: Option<AccountStatus>,
}

/// Profile edit. Role and status fields are applied only for admin callers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Option<Vec<String>>,
    pub account_status: Option<AccountStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: String,
    pub confirm_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo_types::ROLE_USER;

    #[test]
    fn summary_uses_camel_case_fields() {
        let now = OffsetDateTime::UNIX_EPOCH;
        let user = User {
            id: 1,
            email: "user@example.com".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            password_hash: "$argon2id$fake".into(),
            roles: vec![ROLE_USER.to_string()],
            account_status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&UserSummary::from(&user)).unwrap();
        assert!(json.contains("\"firstName\":\"John\""));
        assert!(json.contains("\"accountStatus\":\"active\""));
        assert!(json.contains("\"createdAt\":\"1970-01-01T00:00:00Z\""));
        assert!(!json.contains("password"));
    }

    #[test]
    fn change_password_request_old_password_is_optional() {
        let parsed: ChangePasswordRequest = serde_json::from_str(
            r#"{"newPassword": "new-password-1", "confirmPassword": "new-password-1"}"#,
        )
        .unwrap();
        assert!(parsed.old_password.is_none());
    }
}
