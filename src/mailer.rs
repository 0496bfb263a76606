use std::sync::Arc;

use axum::async_trait;
use tracing::{error, info};

/// Outbound notification payload handed to the mail collaborator.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> anyhow::Result<()>;
}

/// Hands the message off to a background task. Delivery failures are logged
/// by the collaborator and never reach the caller.
pub fn enqueue(mailer: Arc<dyn Mailer>, message: EmailMessage) {
    tokio::spawn(async move {
        let to = message.to.clone();
        let subject = message.subject.clone();
        match mailer.send(message).await {
            Ok(()) => info!(%to, %subject, "email sent"),
            Err(e) => error!(%to, %subject, error = %e, "failed to send email"),
        }
    });
}

/// Transport stand-in that records the send instead of delivering it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> anyhow::Result<()> {
        info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            "outbound email"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_mailer_accepts_messages() {
        let mailer = LogMailer;
        let result = mailer
            .send(EmailMessage {
                from: "noreply@example.com".into(),
                to: "user@example.com".into(),
                subject: "Welcome".into(),
                html_body: "<p>Welcome</p>".into(),
            })
            .await;
        assert!(result.is_ok());
    }
}
