//! The program agent: plan, search, summarize, answer.

use crate::Resettable;
use crate::chat::{ChatMessage, ChatModel, ChunkStream};
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::search::SearchClient;
use async_stream::try_stream;
use futures::StreamExt;
use std::sync::Arc;
use tracing::debug;

/// 简单规则：输入包含这些关键词时才触发外部搜索
const SEARCH_KEYWORDS: &[&str] = &["天气", "今天", "最新", "附近", "现在", "路线", "推荐"];

/// Stateful conversational agent backed by a remote chat model and an
/// optional web-search tool. Constructed by the pool and leased to one
/// session at a time; `reset` returns it to a pristine state between leases.
pub struct ProgramAgent {
    config: AgentConfig,
    chat: Arc<dyn ChatModel>,
    search: Option<Arc<dyn SearchClient>>,
    /// Conversation-local state, cleared by `reset`.
    last_conversation: Option<String>,
}

impl std::fmt::Debug for ProgramAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramAgent")
            .field("config", &self.config)
            .field("last_conversation", &self.last_conversation)
            .finish_non_exhaustive()
    }
}

impl ProgramAgent {
    pub fn new(
        config: AgentConfig,
        chat: Arc<dyn ChatModel>,
        search: Option<Arc<dyn SearchClient>>,
    ) -> Self {
        Self {
            config,
            chat,
            search,
            last_conversation: None,
        }
    }

    /// The conversation this agent last served, if any. `None` on a
    /// freshly constructed or freshly reset agent.
    pub fn last_conversation(&self) -> Option<&str> {
        self.last_conversation.as_deref()
    }

    /// Stream the answer for one user request.
    ///
    /// The returned stream is finite and not restartable. When the input
    /// matches a search keyword and a search client is configured, progress
    /// markers and a summarized search context precede the final answer.
    pub fn stream(
        &mut self,
        user_input: &str,
        user_id: &str,
        conversation_id: &str,
    ) -> ChunkStream {
        debug!(user_id, conversation_id, "starting agent stream");
        self.last_conversation = Some(conversation_id.to_string());

        let chat = Arc::clone(&self.chat);
        let search = self.search.clone();
        let program_prompt = self.config.program_prompt.clone();
        let summary_prompt = self.config.summary_prompt.clone();
        let user_input = user_input.to_string();

        Box::pin(try_stream! {
            let mut messages = vec![
                ChatMessage::system(&program_prompt),
                ChatMessage::user(&user_input),
            ];

            if need_search(&user_input) {
                if let Some(search) = search {
                    yield "[Planning] External information required.\n".to_string();

                    let raw_search_result = search.search(&user_input).await?;
                    yield "[Tool: search_web] Raw search data retrieved.\n".to_string();

                    yield "[Thinking] Summarizing search results...\n".to_string();
                    let summary =
                        summarize_search_results(&*chat, &summary_prompt, &raw_search_result)
                            .await?;

                    messages.push(ChatMessage::system(format!(
                        "The following is a summarized result of web search:\n{summary}"
                    )));
                }
            }

            let mut answer = chat.stream_chat(messages).await?;
            while let Some(chunk) = answer.next().await {
                let chunk = chunk?;
                yield chunk;
            }
        })
    }
}

impl Resettable for ProgramAgent {
    fn reset(&mut self) {
        self.last_conversation = None;
    }
}

/// 是否需要外部搜索
fn need_search(user_input: &str) -> bool {
    SEARCH_KEYWORDS.iter().any(|k| user_input.contains(k))
}

/// Compress raw search results into concise context via the summary prompt.
async fn summarize_search_results(
    chat: &dyn ChatModel,
    summary_prompt: &str,
    search_results: &str,
) -> Result<String, AgentError> {
    let prompt = summary_prompt.replace("{search_results}", search_results);
    let mut stream = chat.stream_chat(vec![ChatMessage::system(prompt)]).await?;

    let mut summary = String::new();
    while let Some(chunk) = stream.next().await {
        summary.push_str(&chunk?);
    }
    Ok(summary)
}
