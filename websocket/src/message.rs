//! Inbound request shape and outbound frame formats for chat sessions.

use serde::Deserialize;

/// 空输入时返回给客户端的提示
pub const EMPTY_INPUT_NOTICE: &str = "不能输入空数据进行咨询哦~";

/// SSE-style end-of-stream marker, sent after the last chunk.
pub const END_FRAME: &str = "event: end\ndata: {}\n\n";

/// The single inbound message of a session.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub user_input: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub conversation_id: String,
}

/// Requested operation. Anything we don't recognize (including a missing
/// `action` field) maps to `Unknown` and falls through to a silent close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    Start,
    /// Present on the wire but currently a no-op; no cancellation semantics.
    ChatStop,
    Unknown,
}

impl ChatAction {
    /// 从请求中解析操作类型
    pub fn from_request(request: &ChatRequest) -> Self {
        match request.action.as_str() {
            "start" => ChatAction::Start,
            "chatStop" => ChatAction::ChatStop,
            _ => ChatAction::Unknown,
        }
    }
}

/// Wrap one output chunk as an SSE-style data frame.
pub fn data_frame(chunk: &str) -> String {
    format!("data: {chunk}\n\n")
}

/// JSON error payload for a request against an unregistered agent type.
pub fn unknown_agent_type_error() -> String {
    serde_json::json!({ "error": "unknown agent_type" }).to_string()
}
