//! Critical error alerting layer for tracing.
//!
//! Intercepts ERROR-level events and hands them to an [`AlertSender`]
//! over a bounded channel, so a slow webhook never stalls request
//! handling.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{Event, Subscriber};
use tracing_subscriber::{Layer, layer::Context};

#[derive(Debug, Clone)]
pub struct AlertMessage {
    pub level: String,
    pub message: String,
    pub target: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub fields: Vec<(String, String)>,
}

/// Alert delivery backend. Implement for Slack, PagerDuty, email, etc.
#[async_trait::async_trait]
pub trait AlertSender: Send + Sync {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("Failed to send alert: {0}")]
    SendError(String),
}

/// Writes alerts to stderr. Used in development.
pub struct ConsoleAlertSender {
    service: String,
}

#[async_trait::async_trait]
impl AlertSender for ConsoleAlertSender {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
        let mut details = String::new();
        for (name, value) in &alert.fields {
            details.push_str(&format!("  {name}: {value}\n"));
        }

        eprintln!(
            "\n🚨 CRITICAL ALERT 🚨\n\
             Service: {}\n\
             Level: {}\n\
             Target: {}\n\
             Message: {}\n\
             Time: {}\n{}",
            self.service, alert.level, alert.target, alert.message, alert.timestamp, details
        );
        Ok(())
    }
}

/// Posts alerts to a webhook URL (Slack, Discord, etc.).
pub struct WebhookAlertSender {
    url: String,
    service: String,
    client: reqwest::Client,
}

impl WebhookAlertSender {
    pub fn new(url: String, service: String) -> Self {
        Self {
            url,
            service,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl AlertSender for WebhookAlertSender {
    async fn send(&self, alert: AlertMessage) -> Result<(), AlertError> {
        let payload = serde_json::json!({
            "text": format!(
                "🚨 *CRITICAL ERROR* in `{}`\n*Target:* {}\n*Message:* {}\n*Time:* {}",
                self.service, alert.target, alert.message, alert.timestamp
            )
        });

        self.client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AlertError::SendError(e.to_string()))?;

        Ok(())
    }
}

/// Tracing layer that forwards ERROR events to the alert channel.
pub struct AlertLayer {
    sender: mpsc::Sender<AlertMessage>,
}

impl AlertLayer {
    /// Spawns the drain task. Must be called from within a Tokio runtime.
    pub fn new(alert_sender: Arc<dyn AlertSender>) -> Self {
        let (tx, mut rx) = mpsc::channel::<AlertMessage>(100);

        tokio::spawn(async move {
            while let Some(alert) = rx.recv().await {
                if let Err(e) = alert_sender.send(alert).await {
                    eprintln!("Failed to send alert: {e}");
                }
            }
        });

        Self { sender: tx }
    }

    pub fn console(service: String) -> Self {
        Self::new(Arc::new(ConsoleAlertSender { service }))
    }

    pub fn webhook(url: String, service: String) -> Self {
        Self::new(Arc::new(WebhookAlertSender::new(url, service)))
    }
}

struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn new() -> Self {
        Self {
            message: String::new(),
            fields: Vec::new(),
        }
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }
}

impl<S> Layer<S> for AlertLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != tracing::Level::ERROR {
            return;
        }

        let mut visitor = FieldVisitor::new();
        event.record(&mut visitor);

        let alert = AlertMessage {
            level: event.metadata().level().to_string(),
            message: visitor.message,
            target: event.metadata().target().to_string(),
            timestamp: chrono::Utc::now(),
            fields: visitor.fields,
        };

        // Non-blocking send; drops the alert when the channel is full.
        let _ = self.sender.try_send(alert);
    }
}
