mod list_memories;
mod recall;
mod remember;
mod search_memories;

pub use list_memories::{ListMemoriesTool, TOOL_LIST_MEMORIES};
pub use recall::{RecallTool, TOOL_RECALL};
pub use remember::{RememberTool, TOOL_REMEMBER};
pub use search_memories::{SearchMemoriesTool, TOOL_SEARCH_MEMORIES};
