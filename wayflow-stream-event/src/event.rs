//! Wire shape for one streamed event: type + payload.
//!
//! Two independent streams use this envelope: (1) LLM completion streaming, which
//! must emit exactly one `Start`, zero-or-more `Text` deltas, and exactly one `End`
//! per assistant message (I4 in the spec's testable properties); (2) tool execution
//! streaming, which emits zero-or-more `ToolChunk`s before the tool's final result.

use serde::Serialize;
use serde_json::Value;

/// Token usage reported on the final chunk of a streamed LLM completion.
#[derive(Clone, Debug, Default, Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Protocol event: wire shape for one stream event.
///
/// `Start`/`Text`/`End` bound one streamed assistant message; concatenating `Text`
/// deltas between `Start` and `End` reproduces the final message content for
/// providers that do not overwrite it wholesale. `ToolChunk` carries intermediate
/// output from a streaming server tool call; it is unrelated to message chunking.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolEvent {
    /// Opens a streamed assistant message.
    Start { message_id: String },
    /// One incremental text delta for the currently open message.
    Text { message_id: String, delta: String },
    /// Closes the currently open message; `usage` is set when the provider reports it.
    End {
        message_id: String,
        content: String,
        usage: Option<TokenUsage>,
    },
    /// Intermediate output from a streaming server tool call.
    ToolChunk {
        tool_request_id: String,
        content: Value,
    },
    /// A step invocation started.
    StepStart { step_id: String },
    /// A step invocation completed.
    StepEnd { step_id: String, branch: String },
    /// Escape hatch for transport-specific or caller-defined payloads.
    Custom { value: Value },
}

impl ProtocolEvent {
    /// Serializes this event to a JSON object (type + payload only; no envelope).
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
