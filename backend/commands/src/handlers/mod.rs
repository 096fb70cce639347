//! Built-in command handlers.
//!
//! Each handler is a unit struct implementing `CommandHandler` with its own
//! argument record; behavior lives in the collaborators reached through
//! `CommandContext`.

pub mod agents;
pub mod browse;
pub mod code;
pub mod files;
pub mod memory;
pub mod search;
pub mod system;

pub use agents::{DeleteAgentHandler, ListAgentsHandler, MessageAgentHandler, StartAgentHandler};
pub use browse::{BrowseWebsiteHandler, HyperlinksHandler, UrlTextSummaryHandler};
pub use code::{EvaluateCodeHandler, ExecutePythonHandler, ImproveCodeHandler, WriteTestsHandler};
pub use files::{AppendFileHandler, DeleteFileHandler, ReadFileHandler, WriteFileHandler};
pub use memory::{MemoryAddHandler, MemoryDeleteHandler, MemoryOverwriteHandler};
pub use search::GoogleHandler;
pub use system::{DateTimeHandler, TaskCompleteHandler};

use serde::Serialize;

use crate::error::CommandError;

/// Pretty JSON for replies that hand structured data back to the model.
pub(crate) fn pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CommandError> {
    serde_json::to_string_pretty(value).map_err(|e| CommandError::Handler(e.into()))
}
