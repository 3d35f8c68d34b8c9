//! SMTP delivery of notifications through `lettre`.
//!
//! Built from `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD` and
//! `EMAIL_FROM_NAME`. When those are missing the server falls back to
//! `util::notify::LogNotifier`.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::sync::Arc;
use util::{
    config::AppConfig,
    notify::{LogNotifier, Notifier, NotifyError},
};

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, NotifyError> {
        let from: Mailbox = format!("{} <{}>", cfg.email_from_name, cfg.smtp_username).parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_host)?
            .port(cfg.smtp_port)
            .credentials(Credentials::new(
                cfg.smtp_username.clone(),
                cfg.smtp_password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> Result<(), NotifyError> {
        let mut failures = 0usize;

        // One message per recipient so a bad address does not sink the rest.
        for recipient in recipients {
            let to: Mailbox = match recipient.parse() {
                Ok(mailbox) => mailbox,
                Err(e) => {
                    tracing::warn!(recipient, error = %e, "Skipping malformed recipient");
                    failures += 1;
                    continue;
                }
            };

            let message = Message::builder()
                .from(self.from.clone())
                .to(to)
                .subject(subject)
                .header(ContentType::TEXT_PLAIN)
                .body(body.to_string())?;

            if let Err(e) = self.transport.send(message).await {
                tracing::warn!(recipient, error = %e, "SMTP delivery failed");
                failures += 1;
            }
        }

        if failures == recipients.len() && failures > 0 {
            return Err(format!("all {failures} deliveries failed").into());
        }
        Ok(())
    }
}

/// SMTP when configured, otherwise log-only delivery.
pub fn notifier_from_config(cfg: &AppConfig) -> Arc<dyn Notifier> {
    if !cfg.smtp_enabled() {
        tracing::info!("SMTP not configured; notifications will only be logged");
        return Arc::new(LogNotifier);
    }

    match SmtpNotifier::from_config(cfg) {
        Ok(smtp) => Arc::new(smtp),
        Err(e) => {
            tracing::error!(error = %e, "Invalid SMTP settings; falling back to log notifier");
            Arc::new(LogNotifier)
        }
    }
}
