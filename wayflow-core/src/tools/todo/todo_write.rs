//! Todo-write tool: replace todo list at XDG state home (e.g. ~/.local/state/loom/todos.json).
//!
//! Accepts a full list of todos (id, content, status, priority); writes JSON.
//! Uses [`cross_xdg`] for path. Interacts with [`Tool`](crate::tools::Tool).
//! Effective definition for LLM comes from `loom/tools/todo_write.yaml` via [`YamlSpecToolSource`](crate::tool_source::YamlSpecToolSource) override.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};
use crate::tools::Tool;

use super::todo_file_path;
use super::TodoInfo;

/// Tool name for writing the todo list.
pub const TOOL_TODO_WRITE: &str = "todo_write";

/// Tool that writes the todo list to XDG state home.
///
/// Path is `state_home()/loom/todos.json`; creates parent dirs if needed.
pub struct TodoWriteTool {
    /// Kept for registration compatibility with file tool source; path uses XDG, not this.
    #[allow(dead_code)]
    pub(crate) working_folder: Arc<std::path::PathBuf>,
}

impl TodoWriteTool {
    /// Creates a new TodoWriteTool with the given working folder.
    pub fn new(working_folder: Arc<std::path::PathBuf>) -> Self {
        Self { working_folder }
    }
}

fn parse_todos(args: &serde_json::Value) -> Result<Vec<TodoInfo>, ToolSourceError> {
    let arr = args
        .get("todos")
        .and_then(|v| v.as_array())
        .ok_or_else(|| ToolSourceError::InvalidInput("missing or invalid 'todos' array".to_string()))?;
    let mut out = Vec::with_capacity(arr.len());
    for (i, v) in arr.iter().enumerate() {
        let obj = v
            .as_object()
            .ok_or_else(|| ToolSourceError::InvalidInput(format!("todos[{}] must be an object", i)))?;
        let id = obj
            .get("id")
            .and_then(|x| x.as_str())
            .map(String::from)
            .ok_or_else(|| ToolSourceError::InvalidInput(format!("todos[{}] missing 'id'", i)))?;
        let content = obj
            .get("content")
            .and_then(|x| x.as_str())
            .map(String::from)
            .ok_or_else(|| ToolSourceError::InvalidInput(format!("todos[{}] missing 'content'", i)))?;
        let status = obj
            .get("status")
            .and_then(|x| x.as_str())
            .map(String::from)
            .unwrap_or_else(|| "pending".to_string());
        let priority = obj
            .get("priority")
            .and_then(|x| x.as_str())
            .map(String::from)
            .unwrap_or_else(|| "medium".to_string());
        out.push(TodoInfo {
            id,
            content,
            status,
            priority,
        });
    }
    Ok(out)
}

#[async_trait]
impl Tool for TodoWriteTool {
    fn name(&self) -> &str {
        TOOL_TODO_WRITE
    }

    /// Minimal spec; overridden by `loom/tools/todo_write.yaml` in YamlSpecToolSource.
    fn spec(&self) -> crate::tool_source::ToolSpec {
        crate::tool_source::ToolSpec {
            name: TOOL_TODO_WRITE.to_string(),
            description: Some("Write or replace the todo list.".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": { "todos": { "type": "array" } },
                "required": ["todos"]
            }),
        }
    }

    async fn call(
        &self,
        args: serde_json::Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let todos = parse_todos(&args)?;
        let path = todo_file_path()?;
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ToolSourceError::Transport(format!("failed to create parent dir: {}", e))
                })?;
            }
        }
        let json_bytes = serde_json::to_string_pretty(&todos).map_err(|e| {
            ToolSourceError::Transport(format!("failed to serialize todos: {}", e))
        })?;
        std::fs::write(&path, json_bytes).map_err(|e| {
            ToolSourceError::Transport(format!("failed to write {}: {}", path.display(), e))
        })?;
        let incomplete = todos
            .iter()
            .filter(|t| t.status != "completed")
            .count();
        let output = serde_json::to_string_pretty(&todos).unwrap_or_else(|_| "[]".to_string());
        Ok(ToolCallContent {
            text: format!("{} todos\n{}", incomplete, output),
        })
    }
}
