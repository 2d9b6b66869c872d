//! Mock Email Service Implementation
//!
//! Captures emails in memory so tests and local runs can inspect what
//! would have been sent. Can also be put into a failing mode to exercise
//! callers that must tolerate delivery outages.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EmailError, EmailMessage, EmailReceipt, EmailService};

/// Email captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub message: EmailMessage,
    pub receipt: EmailReceipt,
    pub captured_at: DateTime<Utc>,
}

impl CapturedEmail {
    /// Listing id carried in the email metadata, if any
    pub fn item_id(&self) -> Option<i64> {
        self.message
            .metadata
            .get("item_id")
            .and_then(|id| id.parse().ok())
    }

    /// Whether this is a conversation-started notification
    pub fn is_conversation_started(&self) -> bool {
        self.message
            .metadata
            .get("email_type")
            .map(|t| t == "conversation_started")
            .unwrap_or(false)
    }
}

/// How the mock reacts to `send_email`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Capture,
    Disabled,
    Failing,
}

/// Mock email service for testing
#[derive(Debug, Clone)]
pub struct MockEmailService {
    emails: Arc<Mutex<Vec<CapturedEmail>>>,
    email_by_recipient: Arc<Mutex<HashMap<String, Vec<CapturedEmail>>>>,
    app_base_url: String,
    mode: Mode,
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self::with_mode(Mode::Capture, "http://localhost:3000".to_string())
    }

    /// Create a capturing mock that builds links against `app_base_url`
    pub fn with_base_url(app_base_url: String) -> Self {
        Self::with_mode(Mode::Capture, app_base_url)
    }

    /// Create a disabled mock email service (accepts and drops everything)
    pub fn new_disabled() -> Self {
        Self::with_mode(Mode::Disabled, "http://localhost:3000".to_string())
    }

    /// Create a mock whose every send fails
    pub fn new_failing() -> Self {
        Self::with_mode(Mode::Failing, "http://localhost:3000".to_string())
    }

    fn with_mode(mode: Mode, app_base_url: String) -> Self {
        Self {
            emails: Arc::new(Mutex::new(Vec::new())),
            email_by_recipient: Arc::new(Mutex::new(HashMap::new())),
            app_base_url,
            mode,
        }
    }

    // A panic while holding the lock only poisons test bookkeeping
    fn emails(&self) -> MutexGuard<'_, Vec<CapturedEmail>> {
        self.emails.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn by_recipient(&self) -> MutexGuard<'_, HashMap<String, Vec<CapturedEmail>>> {
        self.email_by_recipient
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Get all captured emails
    pub fn get_all_emails(&self) -> Vec<CapturedEmail> {
        self.emails().clone()
    }

    /// Get emails sent to a specific recipient
    pub fn get_emails_for_recipient(&self, email: &str) -> Vec<CapturedEmail> {
        self.by_recipient().get(email).cloned().unwrap_or_default()
    }

    /// Get the most recent conversation-started email for a recipient
    pub fn get_latest_conversation_email(&self, email: &str) -> Option<CapturedEmail> {
        self.get_emails_for_recipient(email)
            .into_iter()
            .filter(CapturedEmail::is_conversation_started)
            .max_by_key(|e| e.captured_at)
    }

    /// Count conversation-started emails sent to a recipient
    pub fn conversation_email_count(&self, email: &str) -> usize {
        self.get_emails_for_recipient(email)
            .iter()
            .filter(|e| e.is_conversation_started())
            .count()
    }

    /// Get count of emails sent
    pub fn email_count(&self) -> usize {
        self.emails().len()
    }

    /// Clear all captured emails
    pub fn clear(&self) {
        self.emails().clear();
        self.by_recipient().clear();
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        match self.mode {
            Mode::Failing => {
                tracing::warn!(to = %message.to, "Mock email service configured to fail");
                return Err(EmailError::Delivery(
                    "mock delivery failure".to_string(),
                ));
            }
            Mode::Disabled => {
                tracing::warn!("Mock email service disabled, skipping send");
                return Ok(EmailReceipt {
                    message_id: format!("disabled-{}", Uuid::new_v4()),
                    sent_at: Utc::now(),
                    provider: "mock-disabled".to_string(),
                    metadata: message.metadata.clone(),
                });
            }
            Mode::Capture => {}
        }

        tracing::info!(to = %message.to, subject = %message.subject, "Mock email service capturing email");

        let receipt = EmailReceipt {
            message_id: format!("mock-{}", Uuid::new_v4()),
            sent_at: Utc::now(),
            provider: "mock".to_string(),
            metadata: message.metadata.clone(),
        };

        let captured = CapturedEmail {
            message: message.clone(),
            receipt: receipt.clone(),
            captured_at: Utc::now(),
        };

        self.emails().push(captured.clone());
        self.by_recipient()
            .entry(message.to)
            .or_default()
            .push(captured);

        Ok(receipt)
    }

    fn default_from(&self) -> String {
        "notifications@swapshop.app".to_string()
    }

    fn app_base_url(&self) -> &str {
        &self.app_base_url
    }
}
