//! External web-search tool seam.

use crate::error::AgentError;
use async_trait::async_trait;

/// Web-search tool backend.
///
/// The search server itself (MCP tool process) is an external collaborator;
/// agents only depend on this trait.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a search and return the raw result text.
    async fn search(&self, query: &str) -> Result<String, AgentError>;
}
