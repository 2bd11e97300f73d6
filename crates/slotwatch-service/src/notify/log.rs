use async_trait::async_trait;

use super::{DeliveryResult, Notifier};

/// Target name recorded for messages that only went to the log.
pub const LOG_TARGET: &str = "log";

/// Writes messages to the log instead of delivering them anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn target(&self) -> &str {
        LOG_TARGET
    }

    async fn send(&self, text: &str) -> DeliveryResult<()> {
        tracing::info!(text = %text, "Notification (no webhook configured)");
        Ok(())
    }
}
