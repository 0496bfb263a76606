use serde::{Deserialize, Serialize};

use crate::users::User;

/// Request body for self-registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
}

/// Credentials for both the session and the token login flows.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned by the token login flow.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            roles: user.effective_roles(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serializes_camel_case() {
        let user = PublicUser {
            id: 1,
            email: "admin@example.com".into(),
            first_name: "Admin".into(),
            last_name: "System".into(),
            roles: vec!["ROLE_ADMIN".into(), "ROLE_USER".into()],
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"firstName\":\"Admin\""));
        assert!(json.contains("\"lastName\":\"System\""));
        assert!(json.contains("ROLE_ADMIN"));
    }

    #[test]
    fn register_request_names_are_optional() {
        let parsed: RegisterRequest = serde_json::from_str(
            r#"{"email": "user@example.com", "password": "SecurePass123!"}"#,
        )
        .unwrap();
        assert!(parsed.first_name.is_empty());
        assert!(parsed.last_name.is_empty());
    }
}
