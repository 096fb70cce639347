use thiserror::Error;

use crate::types::CommandOutcome;

/// Why a raw directive could not be turned into a command name and arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Missing 'command' object in JSON")]
    MissingCommand,
    #[error("Missing 'name' field in 'command' object")]
    MissingName,
    #[error("Invalid JSON")]
    InvalidJson,
    #[error("{0}")]
    Unknown(String),
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Lookup,
    Handler,
    State,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Lookup => "lookup",
            Self::Handler => "handler",
            Self::State => "state",
        }
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Invalid arguments for '{command}': {message}")]
    InvalidArguments { command: String, message: String },
    #[error("Unknown command '{name}'. Please refer to the 'COMMANDS' list for available commands and only respond in the specified JSON format.")]
    UnknownCommand { name: String },
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
    #[error("{0}")]
    State(String),
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) | Self::InvalidArguments { .. } => ErrorKind::Parse,
            Self::UnknownCommand { .. } => ErrorKind::Lookup,
            Self::Handler(_) => ErrorKind::Handler,
            Self::State(_) => ErrorKind::State,
        }
    }

    pub fn report(&self) -> String {
        format!("Error: {self}")
    }
}

pub type CommandResult = Result<CommandOutcome, CommandError>;

/// String rendering of a dispatch result for the driving model.
pub trait Report {
    fn report(&self) -> String;
}

impl Report for CommandResult {
    fn report(&self) -> String {
        match self {
            Ok(outcome) => outcome.report(),
            Err(err) => err.report(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(CommandError::from(ParseError::InvalidJson).kind(), ErrorKind::Parse);
        assert_eq!(
            CommandError::InvalidArguments { command: "google".into(), message: "x".into() }.kind(),
            ErrorKind::Parse
        );
        assert_eq!(CommandError::UnknownCommand { name: "x".into() }.kind(), ErrorKind::Lookup);
        assert_eq!(CommandError::from(anyhow::anyhow!("boom")).kind(), ErrorKind::Handler);
        assert_eq!(CommandError::State("gone".into()).kind(), ErrorKind::State);
    }

    #[test]
    fn errors_render_with_tag() {
        assert_eq!(
            CommandError::from(ParseError::MissingCommand).report(),
            "Error: Missing 'command' object in JSON"
        );
        let result: CommandResult = Err(CommandError::State("Key 'k' not in memory".into()));
        assert_eq!(result.report(), "Error: Key 'k' not in memory");
        let ok: CommandResult = Ok(CommandOutcome::reply("fine"));
        assert_eq!(ok.report(), "fine");
    }
}
