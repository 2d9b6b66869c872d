//! Conversations domain state and auth integration

use crate::service::ConversationService;
use axum::extract::FromRef;
use swapshop_auth::AuthConfig;

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub service: ConversationService,
    pub auth: AuthConfig,
}

impl FromRef<ConversationsState> for AuthConfig {
    fn from_ref(state: &ConversationsState) -> Self {
        state.auth.clone()
    }
}
