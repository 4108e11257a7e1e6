//! Chat command tokenizer.

use thiserror::Error;

/// Errors for chat command parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandParseError {
    /// Input was empty.
    #[error("command input cannot be empty")]
    EmptyInput,

    /// Input does not start with `/`.
    #[error("commands must start with '/'")]
    MissingLeadingSlash,

    /// Command name is invalid.
    #[error("invalid command name '{0}'")]
    InvalidCommandName(String),
}

/// A parsed `/command arg1 arg2` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    command: String,
    arguments: Vec<String>,
}

impl CommandInvocation {
    /// Parses `/<command>[@bot] arg...` input.
    ///
    /// Arguments are split on any whitespace. A `@bot` suffix on the command
    /// token is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CommandParseError`] when the input is empty, is not a
    /// command, or names an invalid command.
    pub fn parse(raw_input: &str) -> Result<Self, CommandParseError> {
        let mut tokens = raw_input.split_whitespace();
        let command_token = tokens.next().ok_or(CommandParseError::EmptyInput)?;
        let command = parse_command_token(command_token)?;
        Ok(Self {
            command,
            arguments: tokens.map(str::to_owned).collect(),
        })
    }

    /// Returns the lower-cased command name without slash or bot suffix.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the whitespace-separated arguments.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Returns the argument at `index`, if present.
    #[must_use]
    pub fn argument(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }

    /// Returns all arguments joined by single spaces.
    #[must_use]
    pub fn joined_arguments(&self) -> String {
        self.arguments.join(" ")
    }
}

fn parse_command_token(token: &str) -> Result<String, CommandParseError> {
    let addressed = token
        .strip_prefix('/')
        .ok_or(CommandParseError::MissingLeadingSlash)?;
    let command = addressed
        .split_once('@')
        .map_or(addressed, |(name, _bot)| name);
    if command.is_empty() || !is_valid_identifier(command) {
        return Err(CommandParseError::InvalidCommandName(command.to_owned()));
    }
    Ok(command.to_ascii_lowercase())
}

fn is_valid_identifier(value: &str) -> bool {
    value
        .chars()
        .all(|character| character.is_ascii_alphanumeric() || character == '_')
}
