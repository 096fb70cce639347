/// Directive and command descriptor types.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Directive
// ---------------------------------------------------------------------------

/// A directive reduced to its command name and raw argument mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDirective {
    pub name: String,
    pub args: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// Documentation for one argument of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgSpec {
    pub name: &'static str,
    /// Placeholder shown in the prompt listing, e.g. `<search_query>`.
    pub placeholder: &'static str,
    pub required: bool,
}

/// A fully-defined entry in the command registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    pub id: u32,
    /// Wire name used in directives (e.g. "google", "memory_add").
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub args: Vec<ArgSpec>,
}

impl CommandDescriptor {
    /// One line of the numbered prompt listing.
    pub fn prompt_line(&self) -> String {
        if self.args.is_empty() {
            return format!("{}. {}: \"{}\", args: \"\"", self.id, self.display_name, self.name);
        }
        let args = self
            .args
            .iter()
            .map(|a| format!("\"{}\": \"{}\"", a.name, a.placeholder))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{}. {}: \"{}\", args: {}",
            self.id, self.display_name, self.name, args
        )
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Successful result of a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Text returned to the driving model.
    Reply(String),
    /// The agent declared its task complete; the host should exit.
    Shutdown { reason: Option<String> },
}

impl CommandOutcome {
    pub fn reply(text: impl Into<String>) -> Self {
        Self::Reply(text.into())
    }

    pub fn is_shutdown(&self) -> bool {
        matches!(self, Self::Shutdown { .. })
    }

    /// Human-readable form handed back to the model loop.
    pub fn report(&self) -> String {
        match self {
            Self::Reply(text) => text.clone(),
            Self::Shutdown { reason: Some(reason) } => format!("Shutting down...\n{reason}"),
            Self::Shutdown { reason: None } => "Shutting down...".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

/// A list-valued argument that models send either as a JSON array or a single string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    One(String),
    Many(Vec<String>),
}

impl StringList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) if s.trim().is_empty() => Vec::new(),
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        }
    }
}

impl Default for StringList {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

/// Accepts `"3"` or `3` for identifiers the model may emit as numbers.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Argument record for commands that take none. Extra fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoArgs {}
