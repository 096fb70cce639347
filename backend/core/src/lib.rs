pub mod error;
pub mod traits;
pub mod types;

pub use error::SearchError;
pub use traits::{
    AgentManager, CodeAdvisor, CodeRunner, CustomSearch, LlmProvider, LlmRequest, LlmResponse,
    PageScraper, SpeechOutput, Summarizer, WebSearch,
};
pub use types::{AgentSummary, ChatMessage, ChatRole, CreatedAgent, SearchHit};
