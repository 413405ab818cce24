//! Single-shot chat session handler.
//!
//! One WebSocket connection serves exactly one request/response cycle:
//! lease an agent, wait for one request, stream the answer, release the
//! agent. The release runs on every exit path.

use crate::error::WsError;
use crate::message::{
    ChatAction, ChatRequest, EMPTY_INPUT_NOTICE, END_FRAME, data_frame, unknown_agent_type_error,
};
use crate::registry::AgentRegistry;
use axum::extract::ws::{Message as WsMessage, WebSocket};
use devmate_agent::ProgramAgent;
use futures::StreamExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Session handler configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long to wait for the single inbound request.
    pub receive_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            receive_timeout: Duration::from_secs(10),
        }
    }
}

/// Where a session currently is. Strictly forward-moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionPhase {
    AwaitingRequest,
    Streaming,
    Closed,
}

/// Drive one connection through its single request/response cycle.
pub async fn handle_session(
    mut socket: WebSocket,
    registry: Arc<AgentRegistry>,
    agent_type: String,
    config: SessionConfig,
) {
    let session_id = Uuid::new_v4();
    info!(%session_id, agent_type, "chat session opened");

    let mut agent = match registry.acquire(&agent_type).await {
        Ok(agent) => agent,
        Err(WsError::UnknownAgentType(_)) => {
            // No pool interaction happened; report and close.
            let _ = socket
                .send(WsMessage::Text(unknown_agent_type_error()))
                .await;
            let _ = socket.close().await;
            return;
        }
        Err(e) => {
            error!(%session_id, error = %e, "agent construction failed");
            let _ = socket.close().await;
            return;
        }
    };

    // 单次请求；无论哪条路径结束都要归还 agent
    if let Err(e) = run_session(&mut socket, &mut agent, &config, session_id).await {
        error!(%session_id, error = %e, "session ended with error");
    }

    registry.release(&agent_type, agent).await;
    let _ = socket.close().await;
    info!(%session_id, "chat session closed");
}

/// The session body. Returning (with or without an error) always hands
/// control back to `handle_session`, which runs the release path.
async fn run_session(
    socket: &mut WebSocket,
    agent: &mut ProgramAgent,
    config: &SessionConfig,
    session_id: Uuid,
) -> Result<(), WsError> {
    let mut phase = SessionPhase::AwaitingRequest;
    debug!(%session_id, ?phase, "waiting for request");

    let request = match wait_for_request(socket, config.receive_timeout).await {
        RequestOutcome::Request(request) => request,
        RequestOutcome::Timeout => {
            // Nothing is sent to the client on timeout.
            info!(%session_id, "receive timeout, closing");
            return Ok(());
        }
        RequestOutcome::Disconnected => {
            debug!(%session_id, "client disconnected before sending a request");
            return Ok(());
        }
        RequestOutcome::Malformed(e) => {
            warn!(%session_id, error = %e, "malformed request, closing");
            return Ok(());
        }
    };

    match ChatAction::from_request(&request) {
        ChatAction::Start => {}
        ChatAction::ChatStop => {
            // 客户端停止请求：目前无事可做
            debug!(%session_id, "chatStop received, closing");
            return Ok(());
        }
        ChatAction::Unknown => {
            debug!(%session_id, "unrecognized action, closing");
            return Ok(());
        }
    }

    if request.user_input.is_empty() {
        let _ = socket
            .send(WsMessage::Text(EMPTY_INPUT_NOTICE.to_string()))
            .await;
        return Ok(());
    }

    phase = SessionPhase::Streaming;
    debug!(%session_id, ?phase, "forwarding agent chunks");

    let mut chunks = agent.stream(
        &request.user_input,
        &request.user_id,
        &request.conversation_id,
    );

    while let Some(chunk) = chunks.next().await {
        // Agent errors terminate the session; the caller still releases.
        let chunk = chunk?;
        if socket
            .send(WsMessage::Text(data_frame(&chunk)))
            .await
            .is_err()
        {
            debug!(%session_id, "client disconnected mid-stream");
            return Ok(());
        }
    }

    let _ = socket.send(WsMessage::Text(END_FRAME.to_string())).await;

    phase = SessionPhase::Closed;
    debug!(%session_id, ?phase, "end of stream delivered");
    Ok(())
}

enum RequestOutcome {
    Request(ChatRequest),
    Timeout,
    Disconnected,
    Malformed(serde_json::Error),
}

/// Wait for the session's single text request, bounded by `timeout`.
/// Ping/pong and binary frames are ignored while waiting.
async fn wait_for_request(socket: &mut WebSocket, timeout: Duration) -> RequestOutcome {
    let deadline = Instant::now() + timeout;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return RequestOutcome::Timeout;
        }

        match tokio::time::timeout(remaining, socket.recv()).await {
            Ok(Some(Ok(WsMessage::Text(text)))) => {
                return match serde_json::from_str::<ChatRequest>(&text) {
                    Ok(request) => RequestOutcome::Request(request),
                    Err(e) => RequestOutcome::Malformed(e),
                };
            }
            Ok(Some(Ok(WsMessage::Close(_)))) | Ok(None) => return RequestOutcome::Disconnected,
            Ok(Some(Ok(_))) => continue,
            Ok(Some(Err(_))) => return RequestOutcome::Disconnected,
            Err(_) => return RequestOutcome::Timeout,
        }
    }
}
