//! DevMate agent library: conversational agents over a remote chat backend.

pub mod chat;
pub mod config;
pub mod error;
pub mod program;
pub mod prompts;
pub mod search;

pub use chat::{ChatMessage, ChatModel, ChunkStream, OpenAiChatModel};
pub use config::AgentConfig;
pub use error::AgentError;
pub use program::ProgramAgent;
pub use search::SearchClient;

/// Implemented by agents that can be returned to a pristine, reusable state.
pub trait Resettable {
    /// Clear all conversation-local state.
    fn reset(&mut self);
}
