//! Prompt 文件加载。

use crate::error::AgentError;
use std::path::Path;

/// Load a named prompt file from the prompts directory.
///
/// Missing or unreadable files are explicit errors; prompts are required
/// startup resources, not optional extras.
pub fn load_prompt(prompts_dir: &Path, name: &str) -> Result<String, AgentError> {
    let path = prompts_dir.join(name);
    std::fs::read_to_string(&path).map_err(|source| AgentError::Prompt {
        name: name.to_string(),
        source,
    })
}
