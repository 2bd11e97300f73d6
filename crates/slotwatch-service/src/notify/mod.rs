//! Delivery of rendered notification messages.

use async_trait::async_trait;
use thiserror::Error;

pub mod discord;
pub mod log;

pub use discord::DiscordWebhook;
pub use log::LogNotifier;

/// Message delivery errors
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Delivery rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

pub type DeliveryResult<T> = std::result::Result<T, DeliveryError>;

/// A place notification messages are sent to.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Stable name of the delivery address, used to key notification records.
    fn target(&self) -> &str;

    /// ## Summary
    /// Delivers one message.
    ///
    /// ## Errors
    /// Returns an error if the message was not accepted.
    async fn send(&self, text: &str) -> DeliveryResult<()>;
}
