use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// 聊天后端调用失败
    #[error("chat backend error: {0}")]
    ChatBackend(String),

    /// 外部搜索工具调用失败
    #[error("search failed: {0}")]
    Search(String),

    /// Prompt 文件不存在或无法读取
    #[error("prompt '{name}' could not be loaded: {source}")]
    Prompt {
        name: String,
        source: std::io::Error,
    },

    /// 缺少必须的环境变量
    #[error("missing environment variable: {0}")]
    MissingEnv(String),
}

pub type Result<T> = std::result::Result<T, AgentError>;
