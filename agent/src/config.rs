//! Agent configuration.

use crate::error::AgentError;
use crate::prompts::load_prompt;
use std::env;
use std::path::Path;

/// Static configuration shared by every agent a pool constructs.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub model_name: String,
    /// System prompt for the main answer.
    pub program_prompt: String,
    /// Prompt used to compress raw search results; `{search_results}` is
    /// substituted before the call.
    pub summary_prompt: String,
}

impl AgentConfig {
    /// Build the configuration from the environment, loading prompt files
    /// from `prompts_dir`.
    pub fn from_env(prompts_dir: &Path) -> Result<Self, AgentError> {
        Ok(Self {
            api_key: require_env("API_KEY")?,
            api_base_url: require_env("AI_BASE_URL")?,
            model_name: require_env("MODEL_NAME")?,
            program_prompt: load_prompt(prompts_dir, "program_prompt.txt")?,
            summary_prompt: load_prompt(prompts_dir, "search_summary_prompt.txt")?,
        })
    }
}

fn require_env(name: &str) -> Result<String, AgentError> {
    env::var(name).map_err(|_| AgentError::MissingEnv(name.to_string()))
}
