use std::sync::Mutex;

use thiserror::Error;
use uuid::Uuid;

/// A rendered outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub message_id: Uuid,
    /// Recipient user identifier; address resolution happens downstream.
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            message_id: Uuid::now_v7(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Outbound mail boundary. Implementations must be safe to call from a
/// background worker thread.
pub trait Mailer: Send + Sync {
    fn send(&self, message: EmailMessage) -> Result<(), NotifyError>;
}

/// Mailer that logs instead of delivering (dev/default deployment).
#[derive(Debug, Default)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        tracing::info!(
            message_id = %message.message_id,
            to = %message.to,
            subject = %message.subject,
            "email notification"
        );
        Ok(())
    }
}

/// Mailer that records messages in memory (tests).
#[derive(Debug, Default)]
pub struct InMemoryMailer {
    outbox: Mutex<Vec<EmailMessage>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.outbox.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

impl Mailer for InMemoryMailer {
    fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        self.outbox
            .lock()
            .map_err(|_| NotifyError::Transport("outbox poisoned".to_string()))?
            .push(message);
        Ok(())
    }
}
