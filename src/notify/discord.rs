use crate::error::NotifyError;
use crate::notify::{Notification, NotificationSink};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

const API_BASE: &str = "https://discord.com/api/v10";
const USER_AGENT: &str = concat!("DiscordBot (qasa-scout, ", env!("CARGO_PKG_VERSION"), ")");

/// Discord bot session talking to the REST API
pub struct DiscordSink {
    client: Client,
    authorization: String,
}

#[derive(Debug, Deserialize)]
struct CurrentUser {
    id: String,
    username: String,
}

#[derive(Debug, Serialize)]
struct MessagePayload<'a> {
    content: &'a str,
    embeds: [EmbedPayload<'a>; 1],
}

#[derive(Debug, Serialize)]
struct EmbedPayload<'a> {
    title: &'a str,
    url: &'a str,
    description: &'a str,
    color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<ImagePayload<'a>>,
    timestamp: &'a str,
}

#[derive(Debug, Serialize)]
struct ImagePayload<'a> {
    url: &'a str,
}

impl DiscordSink {
    /// Open a session with the given bot token, verifying it against the API
    pub async fn connect(token: &str) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        let sink = Self {
            client,
            authorization: format!("Bot {}", token),
        };

        let response = sink
            .client
            .get(format!("{}/users/@me", API_BASE))
            .header(AUTHORIZATION, &sink.authorization)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::InvalidCredential(status));
        }

        let user: CurrentUser = response.json().await?;
        info!("Connected to Discord as {} ({})", user.username, user.id);

        Ok(sink)
    }

    /// End the session. Messages already sent are unaffected.
    pub fn close(&self) {
        info!("Closing Discord session");
    }
}

#[async_trait]
impl NotificationSink for DiscordSink {
    async fn send(&self, channel_id: &str, notification: &Notification) -> Result<(), NotifyError> {
        let url = format!("{}/channels/{}/messages", API_BASE, channel_id);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, &self.authorization)
            .json(&message_payload(notification))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Discord returned status: {}", status);
            return Err(NotifyError::Rejected { status, body });
        }

        debug!("Delivered message to channel {}", channel_id);
        Ok(())
    }
}

fn message_payload(notification: &Notification) -> MessagePayload<'_> {
    let embed = &notification.embed;
    let image = if embed.image_url.is_empty() {
        None
    } else {
        Some(ImagePayload {
            url: &embed.image_url,
        })
    };

    MessagePayload {
        content: &notification.content,
        embeds: [EmbedPayload {
            title: &embed.title,
            url: &embed.url,
            description: &embed.description,
            color: embed.color,
            image,
            timestamp: &embed.timestamp,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Embed;
    use serde_json::json;

    fn notification(image_url: &str) -> Notification {
        Notification {
            content: "🏠 **NEW Apartment for rent!**".to_string(),
            embed: Embed {
                title: "Loft i sentrum".to_string(),
                url: "https://qasa.se/home/1188101".to_string(),
                description: "**Rent:** 19900 NOK/month".to_string(),
                color: 0x00FF00,
                image_url: image_url.to_string(),
                timestamp: "2025-02-14T09:00:00+00:00".to_string(),
            },
        }
    }

    #[test]
    fn payload_has_one_embed_with_image() {
        let n = notification("https://img.qasa.se/1188101/a.jpg");
        let value = serde_json::to_value(message_payload(&n)).unwrap();

        assert_eq!(
            value,
            json!({
                "content": "🏠 **NEW Apartment for rent!**",
                "embeds": [{
                    "title": "Loft i sentrum",
                    "url": "https://qasa.se/home/1188101",
                    "description": "**Rent:** 19900 NOK/month",
                    "color": 65280,
                    "image": { "url": "https://img.qasa.se/1188101/a.jpg" },
                    "timestamp": "2025-02-14T09:00:00+00:00"
                }]
            })
        );
    }

    #[test]
    fn payload_omits_empty_image() {
        let n = notification("");
        let value = serde_json::to_value(message_payload(&n)).unwrap();
        assert!(value["embeds"][0].get("image").is_none());
    }
}
