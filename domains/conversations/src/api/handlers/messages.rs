//! Message API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use swapshop_auth::AuthUser;
use swapshop_common::{Result, ValidatedJson};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::ConversationsState;
use super::MAX_CONTENT_LENGTH;
use crate::domain::entities::Message;
use crate::domain::views::MessageWithSender;

/// Request for sending a message
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = MAX_CONTENT_LENGTH))]
    pub content: String,
}

/// Read a conversation's messages, marking incoming ones read
pub async fn list_messages(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<Vec<MessageWithSender>>> {
    let messages = state
        .service
        .get_messages(conversation_id, ctx.user_id)
        .await?;
    Ok(Json(messages))
}

/// Send a message in a conversation
pub async fn send_message(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    Path(conversation_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>)> {
    let message = state
        .service
        .send_message(conversation_id, ctx.user_id, req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}
