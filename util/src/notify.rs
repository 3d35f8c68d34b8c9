//! Outbound notification seam.
//!
//! Delivery is fail-soft: callers log a returned error and move on.

use async_trait::async_trait;

pub type NotifyError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Writes notifications to the log instead of delivering them.
///
/// Used when no mail transport is configured.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipients: &[String], subject: &str, _body: &str) -> Result<(), NotifyError> {
        tracing::info!(
            recipients = recipients.len(),
            subject,
            "Notification not delivered (no mail transport configured)"
        );
        Ok(())
    }
}
