//! Registry of agent pools, keyed by agent type.
//!
//! Built once at startup and handed to the connection layer through
//! `AppState`; there is no process-wide global.

use crate::error::{Result, WsError};
use crate::pool::{AgentPool, PoolStatus};
use devmate_agent::ProgramAgent;
use std::collections::HashMap;
use tracing::warn;

pub struct AgentRegistry {
    pools: HashMap<String, AgentPool<ProgramAgent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
        }
    }

    /// Register a pool under an agent type.
    pub fn with_pool(mut self, agent_type: impl Into<String>, pool: AgentPool<ProgramAgent>) -> Self {
        self.pools.insert(agent_type.into(), pool);
        self
    }

    /// Lease an agent of the given type.
    pub async fn acquire(&self, agent_type: &str) -> Result<ProgramAgent> {
        let pool = self
            .pools
            .get(agent_type)
            .ok_or_else(|| WsError::UnknownAgentType(agent_type.to_string()))?;
        Ok(pool.acquire().await?)
    }

    /// Return a leased agent. An unknown type drops the agent.
    pub async fn release(&self, agent_type: &str, agent: ProgramAgent) {
        match self.pools.get(agent_type) {
            Some(pool) => pool.release(agent).await,
            None => warn!(agent_type, "released agent for unknown type, dropping"),
        }
    }

    /// Status snapshot of every registered pool.
    pub async fn status(&self) -> HashMap<String, PoolStatus> {
        let mut statuses = HashMap::new();
        for (agent_type, pool) in &self.pools {
            statuses.insert(agent_type.clone(), pool.status().await);
        }
        statuses
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use devmate_agent::{AgentConfig, AgentError, ChatMessage, ChatModel, ChunkStream};
    use std::sync::Arc;

    struct SilentChat;

    #[async_trait]
    impl ChatModel for SilentChat {
        async fn stream_chat(&self, _messages: Vec<ChatMessage>) -> std::result::Result<ChunkStream, AgentError> {
            Ok(Box::pin(futures::stream::empty()))
        }
    }

    fn test_registry() -> AgentRegistry {
        let config = AgentConfig {
            api_key: "k".to_string(),
            api_base_url: "http://localhost:9".to_string(),
            model_name: "m".to_string(),
            program_prompt: "p".to_string(),
            summary_prompt: "s".to_string(),
        };
        let pool = AgentPool::new(
            2,
            Box::new(move || Ok(ProgramAgent::new(config.clone(), Arc::new(SilentChat), None))),
        );
        AgentRegistry::new().with_pool("program", pool)
    }

    #[tokio::test]
    async fn test_acquire_unknown_type() {
        let registry = test_registry();
        let err = registry.acquire("nope").await.unwrap_err();
        assert!(matches!(err, WsError::UnknownAgentType(_)));
    }

    #[tokio::test]
    async fn test_acquire_and_release_round_trip() {
        let registry = test_registry();

        let agent = registry.acquire("program").await.unwrap();
        assert_eq!(registry.status().await["program"].leased_count, 1);

        registry.release("program", agent).await;
        let statuses = registry.status().await;
        assert_eq!(statuses["program"].leased_count, 0);
        assert_eq!(statuses["program"].idle_count, 1);
    }

    #[tokio::test]
    async fn test_release_unknown_type_drops_agent() {
        let registry = test_registry();
        let agent = registry.acquire("program").await.unwrap();

        registry.release("other", agent).await;
        // Nothing cached anywhere; the "program" pool is still empty.
        assert_eq!(registry.status().await["program"].idle_count, 0);
    }
}
