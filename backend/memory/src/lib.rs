//! Long-term scratch memory for the agent loop.
//!
//! Memory lives for the lifetime of the process only; nothing is persisted.

pub mod store;

pub use store::{InMemoryStore, MemoryStore, TIME_KEY, timestamp_key};
