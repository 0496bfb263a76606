use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

pub const ROLE_USER: &str = "ROLE_USER";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Account lifecycle flag. Only `Active` accounts may authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
    Banned,
}

impl AccountStatus {
    pub fn is_active(self) -> bool {
        self == AccountStatus::Active
    }
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 hash, not exposed in JSON
    pub roles: Vec<String>,
    pub account_status: AccountStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    /// Role set as seen by authorization; every user holds ROLE_USER.
    pub fn effective_roles(&self) -> Vec<String> {
        let mut roles = self.roles.clone();
        if !roles.iter().any(|r| r == ROLE_USER) {
            roles.push(ROLE_USER.to_string());
        }
        roles
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ROLE_ADMIN)
    }

    pub fn is_active(&self) -> bool {
        self.account_status.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_user(id: i64, roles: &[&str], status: AccountStatus) -> User {
        let now = OffsetDateTime::UNIX_EPOCH;
        User {
            id,
            email: format!("user{id}@example.com"),
            first_name: "Test".into(),
            last_name: "User".into(),
            password_hash: "$argon2id$fake".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            account_status: status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn effective_roles_always_include_role_user() {
        let user = sample_user(1, &[ROLE_ADMIN], AccountStatus::Active);
        let roles = user.effective_roles();
        assert!(roles.iter().any(|r| r == ROLE_USER));
        assert!(roles.iter().any(|r| r == ROLE_ADMIN));
    }

    #[test]
    fn effective_roles_does_not_duplicate_role_user() {
        let user = sample_user(1, &[ROLE_USER], AccountStatus::Active);
        assert_eq!(user.effective_roles(), vec![ROLE_USER.to_string()]);
    }

    #[test]
    fn admin_detection() {
        assert!(sample_user(1, &[ROLE_USER, ROLE_ADMIN], AccountStatus::Active).is_admin());
        assert!(!sample_user(2, &[ROLE_USER], AccountStatus::Active).is_admin());
    }

    #[test]
    fn only_active_status_is_active() {
        assert!(AccountStatus::Active.is_active());
        assert!(!AccountStatus::Suspended.is_active());
        assert!(!AccountStatus::Banned.is_active());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AccountStatus::Suspended).unwrap(),
            "\"suspended\""
        );
        assert_eq!(
            serde_json::from_str::<AccountStatus>("\"banned\"").unwrap(),
            AccountStatus::Banned
        );
    }

    #[test]
    fn password_hash_never_serialized() {
        let user = sample_user(1, &[ROLE_USER], AccountStatus::Active);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2"));
    }
}
