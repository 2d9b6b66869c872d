//! Conversation API handlers

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
use crate::domain::views::{ConversationSummary, StartedConversation, UnreadCount};

/// Request for contacting a seller
#[derive(Debug, Deserialize, Validate)]
pub struct StartConversationRequest {
    pub seller_id: Uuid,

    /// Listing the conversation is about
    #[serde(default)]
    #[validate(range(min = 1))]
    pub item_id: Option<i64>,

    #[validate(length(min = 1, max = MAX_CONTENT_LENGTH))]
    pub initial_message: String,
}

/// Contact a seller, creating the conversation on first contact
pub async fn start_conversation(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    ValidatedJson(req): ValidatedJson<StartConversationRequest>,
) -> Result<(StatusCode, Json<StartedConversation>)> {
    let started = state
        .service
        .start_conversation(ctx.user_id, req.seller_id, req.item_id, req.initial_message)
        .await?;

    Ok((StatusCode::CREATED, Json(started)))
}

/// List conversations for the authenticated user
pub async fn list_conversations(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
) -> Result<Json<Vec<ConversationSummary>>> {
    let summaries = state.service.list_conversations(ctx.user_id).await?;
    Ok(Json(summaries))
}

/// Get a single conversation by ID
pub async fn get_conversation(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationSummary>> {
    let summary = state.service.get_conversation(id, ctx.user_id).await?;
    Ok(Json(summary))
}

/// Unread badge count for the authenticated user
pub async fn get_unread_count(
    AuthUser(ctx): AuthUser,
    State(state): State<ConversationsState>,
) -> Result<Json<UnreadCount>> {
    let count = state.service.get_unread_count(ctx.user_id).await?;
    Ok(Json(count))
}
