//! TaskPilot sub-agents and code advice.
//!
//! Sub-agents are independent chat conversations kept in memory and keyed by
//! a monotonically increasing number. The code advisor runs prompts that ask
//! the model to act as a typed Python function and return only its value.

pub mod advisor;
pub mod manager;
pub mod session_state;

pub use advisor::{AiFunction, LlmCodeAdvisor};
pub use manager::InMemoryAgentManager;
pub use session_state::AgentSession;
