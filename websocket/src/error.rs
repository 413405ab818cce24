use devmate_agent::AgentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WsError {
    /// 请求了未注册的 agent 类型
    #[error("unknown agent_type: {0}")]
    UnknownAgentType(String),

    /// Agent 构造失败（从池 acquire 时向上传播）
    #[error(transparent)]
    Agent(#[from] AgentError),
}

pub type Result<T> = std::result::Result<T, WsError>;
