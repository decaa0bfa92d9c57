// src/services/notifier.rs

//! Change notification sinks.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::NotifierConfig;
use crate::utils::http::{DEFAULT_USER_AGENT, create_async_client};

/// Receives one multi-line change message at a time.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<()>;
}

/// Webhook payload envelope.
#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Posts messages to a chat webhook as `{"content": "..."}`.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, config: &NotifierConfig) -> Result<Self> {
        let client = create_async_client(DEFAULT_USER_AGENT, config.timeout())?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        if message.is_empty() {
            return Ok(());
        }

        self.client
            .post(&self.url)
            .json(&WebhookMessage { content: message })
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(AppError::notify)?;

        log::info!("Notification sent ({} line(s))", message.lines().count());
        Ok(())
    }
}

/// Writes messages to the log when no webhook is configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        for line in message.lines() {
            log::info!("[change] {}", line);
        }
        Ok(())
    }
}

/// Build the configured notifier.
pub fn from_config(config: &NotifierConfig) -> Result<Box<dyn Notifier>> {
    match &config.webhook_url {
        Some(url) => Ok(Box::new(WebhookNotifier::new(url, config)?)),
        None => {
            log::warn!("No webhook configured; changes will only be logged");
            Ok(Box::new(LogNotifier))
        }
    }
}
