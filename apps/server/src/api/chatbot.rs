//! Crypto assistant chat route.
//!
//! Always answers 200 with a chat body. Provider failures are absorbed
//! by the assistant and surface as a canned reply, never as an error
//! status.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::main_lib::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let user_id = request.user_id.as_deref().unwrap_or("anonymous");
    tracing::info!(
        user_id,
        chars = request.message.len(),
        "Received chatbot request"
    );

    let response = state.assistant.answer(&request.message).await;
    Json(ChatResponse { response })
}
