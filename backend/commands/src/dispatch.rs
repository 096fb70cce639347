/// Command dispatch: route parsed directives to typed handlers.
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use taskpilot_logging::{DirectiveEvent, EventLogger};

use crate::context::CommandContext;
use crate::error::{CommandError, CommandResult};
use crate::parser::parse_directive;
use crate::registry::CommandRegistry;

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// One command's behavior. `Args` is the typed argument record the raw
/// directive arguments are validated into before `handle` runs.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    type Args: DeserializeOwned + Send;

    async fn handle(&self, ctx: &CommandContext, args: Self::Args) -> CommandResult;
}

/// Object-safe form of `CommandHandler` taking untyped arguments.
#[async_trait]
trait ErasedHandler: Send + Sync {
    async fn call(&self, ctx: &CommandContext, name: &str, args: Map<String, Value>) -> CommandResult;
}

#[async_trait]
impl<H> ErasedHandler for H
where
    H: CommandHandler,
{
    async fn call(&self, ctx: &CommandContext, name: &str, args: Map<String, Value>) -> CommandResult {
        let typed = serde_json::from_value::<H::Args>(Value::Object(args)).map_err(|e| {
            CommandError::InvalidArguments {
                command: name.to_string(),
                message: e.to_string(),
            }
        })?;
        self.handle(ctx, typed).await
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct CommandDispatcher {
    registry: CommandRegistry,
    handlers: HashMap<String, Arc<dyn ErasedHandler>>,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            handlers: HashMap::new(),
        }
    }

    pub fn register<H>(&mut self, name: impl Into<String>, handler: H)
    where
        H: CommandHandler + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Validate `args` for `name` and run its handler. Never panics.
    pub async fn execute(
        &self,
        ctx: &CommandContext,
        name: &str,
        args: Map<String, Value>,
    ) -> CommandResult {
        let arguments_json = Value::Object(args.clone()).to_string();
        debug!(command = name, args = %arguments_json, "Directive arguments");
        EventLogger::log_event(
            &ctx.session_id,
            DirectiveEvent::Dispatched {
                command: name.to_string(),
                arguments_json,
            },
        );

        let result = match self.handlers.get(name) {
            Some(handler) => {
                info!(command = name, session = %ctx.session_id, "Dispatching command");
                AssertUnwindSafe(handler.call(ctx, name, args))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| {
                        Err(CommandError::Handler(anyhow::anyhow!(
                            "Handler for '{name}' panicked: {}",
                            panic_message(payload.as_ref())
                        )))
                    })
            }
            None => Err(CommandError::UnknownCommand {
                name: name.to_string(),
            }),
        };

        self.journal(ctx, name, &result);
        result
    }

    /// Parse a raw directive and execute it.
    pub async fn execute_text(&self, ctx: &CommandContext, raw: &str) -> CommandResult {
        match parse_directive(raw) {
            Ok(directive) => self.execute(ctx, &directive.name, directive.args).await,
            Err(e) => {
                let result = Err(CommandError::Parse(e));
                self.journal(ctx, "<unparsed>", &result);
                result
            }
        }
    }

    fn journal(&self, ctx: &CommandContext, name: &str, result: &CommandResult) {
        let event = match result {
            Ok(outcome) => DirectiveEvent::Completed {
                command: name.to_string(),
                output_chars: outcome.report().chars().count(),
            },
            Err(err) => {
                warn!(command = name, kind = err.kind().as_str(), error = %err, "Command failed");
                DirectiveEvent::Failed {
                    command: name.to_string(),
                    kind: err.kind().as_str().to_string(),
                    error_msg: err.to_string(),
                }
            }
        };
        EventLogger::log_event(&ctx.session_id, event);
    }
}
