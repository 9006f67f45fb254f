pub mod discord;
pub mod format;

pub use discord::DiscordSink;
pub use format::format_notification;

use crate::error::NotifyError;
use async_trait::async_trait;
use std::sync::Arc;

/// Chat message announcing one listing: a plain text prefix plus a single embed
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub content: String,
    pub embed: Embed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Embed {
    pub title: String,
    pub url: String,
    pub description: String,
    pub color: u32,
    /// May be empty when the listing has no pictures
    pub image_url: String,
    /// RFC 3339
    pub timestamp: String,
}

/// Destination for listing notifications
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, channel_id: &str, notification: &Notification) -> Result<(), NotifyError>;
}

#[async_trait]
impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    async fn send(&self, channel_id: &str, notification: &Notification) -> Result<(), NotifyError> {
        (**self).send(channel_id, notification).await
    }
}
