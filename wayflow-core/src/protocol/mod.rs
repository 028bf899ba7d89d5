//! # Protocol module
//!
//! - **WebSocket** (this file): CLI remote mode request/response types. Aligned with [DESIGN_CLI_REMOTE_MODE]
//!   §2.3 (requests) and §2.4 (responses), and with [EXPORT_SPEC] / [USER_GUIDELINE].
//! - **Stream** ([`stream`]): Streaming output protocol (type + payload, envelope) per [protocol_spec].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                           protocol (this crate)                              │
//! ├─────────────────────────────────────────────────────────────────────────────┤
//! │                                                                              │
//! │   Request types (client → server)          Response types (server → client)  │
//! │   ─────────────────────────────           ───────────────────────────────   │
//! │   ClientRequest:                           ServerResponse:                   │
//! │     Run(RunRequest)                          RunStreamEvent(RunStreamEventResponse)  │
//! │     ToolsList(ToolsListRequest)              RunEnd(RunEndResponse)          │
//! │     ToolShow(ToolShowRequest)                ToolsList(ToolsListResponse)     │
//! │     Ping(PingRequest)                        ToolShow(ToolShowResponse)       │
//! │                                              Pong(PongResponse)              │
//! │                                              Error(ErrorResponse)             │
//! │                                                                              │
//! │   ┌──────────────┐    JSON (type + payload)    ┌──────────────┐             │
//! │   │    Client    │ ─────────────────────────►  │    Server    │             │
//! │   │  (WebSocket) │  ◄───────────────────────── │  (WebSocket) │             │
//! │   └──────────────┘                              └──────┬───────┘             │
//! │        │                                                │                    │
//! │        ▼                                                ▼                    │
//! │   ┌─────────────────────────────────────────────────────────────────────┐  │
//! │   │  envelope_state    stream (stream_event bridge)                       │  │
//! │   │  EnvelopeState     StreamEvent<S> ──► ProtocolEvent ──► JSON envelope │  │
//! │   │                    ProtocolEventEnvelope, RunStreamEventResponse     │  │
//! │   └─────────────────────────────────────────────────────────────────────┘  │
//! │                                                                              │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [DESIGN_CLI_REMOTE_MODE]: https://github.com/loom/loom/blob/main/docs/DESIGN_CLI_REMOTE_MODE.md
//! [EXPORT_SPEC]: https://github.com/loom/loom/blob/main/docs/EXPORT_SPEC.md
//! [USER_GUIDELINE]: https://github.com/loom/loom/blob/main/docs/USER_GUIDELINE.md
//! [protocol_spec]: https://github.com/loom/loom/blob/main/docs/protocol_spec.md

pub mod envelope_state;
pub mod stream;

pub use envelope_state::EnvelopeState;
pub use wayflow_stream_event::ProtocolEvent;

use crate::llm::LlmUsage;
use crate::tool_source::ToolSpec;
use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Requests (client → server)
// -----------------------------------------------------------------------------

/// Agent type for run requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    React,
    Dup,
    Tot,
    Got,
}

/// Run request: execute one Agent run (streaming events + final RunEnd).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub message: String,
    pub agent: AgentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// When set with thread_id, the run's thread is associated with this workspace (see loom-workspace).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub got_adaptive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

/// Tools list request: list all tools.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolsListRequest {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

/// Output format for tool_show.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolShowOutput {
    Json,
    Yaml,
}

/// Tool show request: get a single tool definition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolShowRequest {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<ToolShowOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_folder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

/// Ping request: health / keepalive.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PingRequest {
    pub id: String,
}

/// Client-to-server request envelope.
///
/// Each variant maps to a JSON object with `"type": "<variant_name>"`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientRequest {
    Run(RunRequest),
    ToolsList(ToolsListRequest),
    ToolShow(ToolShowRequest),
    Ping(PingRequest),
}

// -----------------------------------------------------------------------------
// Responses (server → client)
// -----------------------------------------------------------------------------

/// Typed protocol stream event payload with optional envelope fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolEventEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<u64>,
    #[serde(flatten)]
    pub event: ProtocolEvent,
}

impl ProtocolEventEnvelope {
    /// Serializes the typed event envelope into a JSON object.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Parses a typed event envelope from a JSON object.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// One stream event (type-safe protocol event + optional envelope) for a run;
/// server sends one per stream event before RunEnd.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunStreamEventResponse {
    pub id: String,
    pub event: ProtocolEventEnvelope,
}

/// RunEnd: final reply for one run (format B from EXPORT_SPEC).
/// Optional envelope fields align with protocol_spec §5 (reply message).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunEndResponse {
    pub id: String,
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<LlmUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_usage: Option<LlmUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<u64>,
}

/// Tools list response (USER_GUIDELINE §4.2).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolsListResponse {
    pub id: String,
    pub tools: Vec<ToolSpec>,
}

/// Tool show response: either `tool` (JSON) or `tool_yaml` (YAML string).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolShowResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_yaml: Option<String>,
}

/// Pong: response to ping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PongResponse {
    pub id: String,
}

/// Error response for any failed request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub error: String,
}

/// Server-to-client response envelope.
///
/// Each variant maps to a JSON object with `"type": "<variant_name>"`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerResponse {
    RunStreamEvent(RunStreamEventResponse),
    RunEnd(RunEndResponse),
    ToolsList(ToolsListResponse),
    ToolShow(ToolShowResponse),
    Pong(PongResponse),
    Error(ErrorResponse),
}
