use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub secret: String,
    /// When true the bearer-token path reports a disabled account distinctly;
    /// credential login always answers with a generic message.
    pub reveal_disabled_account: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub auth: AuthConfig,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let auth = AuthConfig {
            secret: std::env::var("APP_SECRET")?,
            reveal_disabled_account: std::env::var("AUTH_REVEAL_DISABLED_ACCOUNT")
                .ok()
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(true),
        };
        let mail_from =
            std::env::var("MAIL_FROM").unwrap_or_else(|_| "noreply@example.com".into());
        Ok(Self {
            database_url,
            auth,
            mail_from,
        })
    }
}
