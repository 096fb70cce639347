use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use taskpilot_memory::{TIME_KEY, timestamp_key};

use crate::context::CommandContext;
use crate::dispatch::CommandHandler;
use crate::error::{CommandError, CommandResult};
use crate::types::CommandOutcome;

#[derive(Debug, Deserialize)]
pub struct MemoryWriteArgs {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct MemoryKeyArgs {
    pub key: String,
}

/// `memory_add`: store a value, overwriting silently. `$time` picks a fresh key.
pub struct MemoryAddHandler;

#[async_trait]
impl CommandHandler for MemoryAddHandler {
    type Args = MemoryWriteArgs;

    async fn handle(&self, ctx: &CommandContext, args: MemoryWriteArgs) -> CommandResult {
        let key = if args.key == TIME_KEY {
            timestamp_key(ctx.memory.as_ref(), Utc::now())
        } else {
            args.key
        };
        ctx.memory.set(&key, &args.value);
        Ok(CommandOutcome::Reply(format!(
            "Committing memory (key:value) \"{key}\":\"{}\"",
            args.value
        )))
    }
}

/// `memory_del`: remove an existing key.
pub struct MemoryDeleteHandler;

#[async_trait]
impl CommandHandler for MemoryDeleteHandler {
    type Args = MemoryKeyArgs;

    async fn handle(&self, ctx: &CommandContext, args: MemoryKeyArgs) -> CommandResult {
        if ctx.memory.remove(&args.key).is_none() {
            return Err(CommandError::State(format!(
                "Invalid key '{}', cannot delete memory.",
                args.key
            )));
        }
        Ok(CommandOutcome::Reply(format!("Deleting memory with key {}", args.key)))
    }
}

/// `memory_ovr`: replace the value of an existing key.
pub struct MemoryOverwriteHandler;

#[async_trait]
impl CommandHandler for MemoryOverwriteHandler {
    type Args = MemoryWriteArgs;

    async fn handle(&self, ctx: &CommandContext, args: MemoryWriteArgs) -> CommandResult {
        if !ctx.memory.contains(&args.key) {
            return Err(CommandError::State(format!(
                "Invalid key '{}', cannot overwrite memory.",
                args.key
            )));
        }
        ctx.memory.set(&args.key, &args.value);
        Ok(CommandOutcome::Reply(format!(
            "Overwriting memory with key {} and value {}",
            args.key, args.value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::TestContext;
    use taskpilot_memory::MemoryStore;

    fn write(key: &str, value: &str) -> MemoryWriteArgs {
        MemoryWriteArgs { key: key.into(), value: value.into() }
    }

    #[tokio::test]
    async fn add_reports_and_stores() {
        let t = TestContext::new();
        let out = MemoryAddHandler.handle(&t.ctx, write("goal", "ship it")).await.unwrap();
        assert_eq!(out.report(), "Committing memory (key:value) \"goal\":\"ship it\"");
        assert_eq!(t.memory.get("goal").as_deref(), Some("ship it"));
    }

    #[tokio::test]
    async fn add_overwrites_ordinary_keys_in_place() {
        let t = TestContext::new();
        MemoryAddHandler.handle(&t.ctx, write("goal", "one")).await.unwrap();
        MemoryAddHandler.handle(&t.ctx, write("goal", "two")).await.unwrap();
        assert_eq!(t.memory.len(), 1);
        assert_eq!(t.memory.get("goal").as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn time_key_generates_distinct_keys() {
        let t = TestContext::new();
        MemoryAddHandler.handle(&t.ctx, write("$time", "first")).await.unwrap();
        MemoryAddHandler.handle(&t.ctx, write("$time", "second")).await.unwrap();

        let keys = t.memory.keys();
        assert_eq!(keys.len(), 2);
        assert!(keys.iter().all(|k| k.starts_with('_')));
        let mut values: Vec<String> = keys.iter().filter_map(|k| t.memory.get(k)).collect();
        values.sort();
        assert_eq!(values, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn delete_missing_key_is_state_error() {
        let t = TestContext::new();
        t.memory.set("keep", "v");
        let err = MemoryDeleteHandler
            .handle(&t.ctx, MemoryKeyArgs { key: "gone".into() })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(t.memory.keys(), vec!["keep".to_string()]);
    }

    #[tokio::test]
    async fn delete_existing_key() {
        let t = TestContext::new();
        t.memory.set("k", "v");
        let out = MemoryDeleteHandler
            .handle(&t.ctx, MemoryKeyArgs { key: "k".into() })
            .await
            .unwrap();
        assert_eq!(out.report(), "Deleting memory with key k");
        assert!(t.memory.is_empty());
    }

    #[tokio::test]
    async fn overwrite_requires_existing_key() {
        let t = TestContext::new();
        let err = MemoryOverwriteHandler
            .handle(&t.ctx, write("missing", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
        assert!(t.memory.is_empty());

        t.memory.set("k", "old");
        let out = MemoryOverwriteHandler.handle(&t.ctx, write("k", "new")).await.unwrap();
        assert_eq!(out.report(), "Overwriting memory with key k and value new");
        assert_eq!(t.memory.get("k").as_deref(), Some("new"));
    }
}
