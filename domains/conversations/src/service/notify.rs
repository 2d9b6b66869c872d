//! Seller notification on conversation creation
//!
//! Delivery is best effort: a failed send is logged and dropped, and never
//! reaches the caller of `start_conversation`.

use std::sync::Arc;

use swapshop_email::EmailService;

/// Everything the seller email needs
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationStartedNotice {
    pub seller_email: String,
    pub buyer_name: String,
    pub item_name: Option<String>,
    pub item_id: Option<i64>,
    pub initial_message: String,
}

#[derive(Clone)]
pub struct NotificationHook {
    email: Arc<dyn EmailService>,
}

impl NotificationHook {
    pub fn new(email: Arc<dyn EmailService>) -> Self {
        Self { email }
    }

    pub async fn conversation_started(&self, notice: &ConversationStartedNotice) {
        let result = self
            .email
            .send_conversation_started(
                &notice.seller_email,
                &notice.buyer_name,
                notice.item_name.as_deref(),
                notice.item_id,
                &notice.initial_message,
            )
            .await;

        match result {
            Ok(receipt) => tracing::info!(
                message_id = %receipt.message_id,
                item_id = ?notice.item_id,
                "Sent conversation-started notification"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                item_id = ?notice.item_id,
                "Failed to send conversation-started notification"
            ),
        }
    }
}
