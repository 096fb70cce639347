//! Default collaborator implementations used by the command handlers.

pub mod browse;
pub mod execute;
pub mod file;
pub mod summarize;
pub mod web;

pub use browse::{extract_links, extract_text, format_links, HttpScraper};
pub use execute::PythonRunner;
pub use file::Workspace;
pub use summarize::{split_text, LlmSummarizer};
pub use web::{parse_google_response, DuckDuckGoSearch, GoogleCustomSearch};
