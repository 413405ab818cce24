//! HTTP/WebSocket routing.

use crate::registry::AgentRegistry;
use crate::session::{SessionConfig, handle_session};
use axum::{
    Json, Router,
    extract::{Path, State, WebSocketUpgrade},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<AgentRegistry>,
    pub session_config: SessionConfig,
}

/// Build the application router over an injected registry.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat/:agent_type", get(ws_handler))
        .route("/pools", get(pools_handler))
        .with_state(state)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(agent_type): Path<String>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| {
        handle_session(socket, state.registry, agent_type, state.session_config)
    })
}

/// 池状态摘要（诊断用，非权威）
async fn pools_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.registry.status().await)
}
