use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;

use crate::RenderedMail;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("render mail context: {0}")]
    Render(#[from] serde_json::Error),

    #[error("deliver mail: {0}")]
    Delivery(String),
}

/// Hands rendered mail to a delivery mechanism.
///
/// Retries and queueing belong to the implementation, not to callers.
pub trait MailTransport: Send + Sync {
    fn send(&self, to: &str, mail: &RenderedMail) -> Result<(), MailError>;
}

/// Emits each message as a structured log event instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

impl MailTransport for LogTransport {
    fn send(&self, to: &str, mail: &RenderedMail) -> Result<(), MailError> {
        tracing::info!(
            to,
            subject = %mail.subject,
            template = %mail.template,
            "mail handed to log transport"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentMail {
    pub to: String,
    pub mail: RenderedMail,
}

/// Keeps every message in memory (dev/test).
#[derive(Debug, Default)]
pub struct OutboxTransport {
    sent: Mutex<Vec<SentMail>>,
}

impl OutboxTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Most recent message addressed to `to`.
    pub fn last_to(&self, to: &str) -> Option<SentMail> {
        self.sent().into_iter().rev().find(|m| m.to == to)
    }
}

impl MailTransport for OutboxTransport {
    fn send(&self, to: &str, mail: &RenderedMail) -> Result<(), MailError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| MailError::Delivery("outbox lock poisoned".to_string()))?;
        sent.push(SentMail {
            to: to.to_string(),
            mail: mail.clone(),
        });
        Ok(())
    }
}
