//! Special commands parser for interactive chat mode
//!
//! Special commands manage sessions from inside the chat loop instead
//! of being sent to the provider. Commands are prefixed with `/`; the
//! command word is case-insensitive, arguments keep their case.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new session and switch to it
    NewSession,

    /// List sessions, optionally filtered by a name search term
    ListSessions(Option<String>),

    /// Switch to the session with this id or id prefix
    SwitchSession(String),

    /// Rename the active session
    Rename(String),

    /// Toggle the pinned flag of the active session
    TogglePin,

    /// Delete a session (the active one when no id is given)
    Delete(Option<String>),

    /// Print the active session's transcript
    Show,

    /// Export all sessions to a file (default `chat_sessions.json`)
    Export(Option<String>),

    /// Import sessions from a file
    Import(String),

    /// Display the active session, model and store status
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent as a chat message.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for an unrecognized `/word`
/// and `CommandError::MissingArgument` when a required argument is absent.
///
/// # Examples
///
/// ```
/// use chatkeep::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewSession);
/// assert_eq!(
///     parse_special_command("/rename Trip to Rome").unwrap(),
///     SpecialCommand::Rename("Trip to Rome".to_string())
/// );
/// assert_eq!(parse_special_command("hello there").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if lower == "exit" || lower == "quit" {
        return Ok(SpecialCommand::Exit);
    }

    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };
    let arg = if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    };

    let required = |usage: &str| {
        arg.clone().ok_or_else(|| CommandError::MissingArgument {
            command: word.clone(),
            usage: usage.to_string(),
        })
    };

    match word.as_str() {
        "/new" => Ok(SpecialCommand::NewSession),
        "/list" | "/sessions" | "/search" => Ok(SpecialCommand::ListSessions(arg.clone())),
        "/switch" | "/open" => required("/switch <id>").map(SpecialCommand::SwitchSession),
        "/rename" => required("/rename <name>").map(SpecialCommand::Rename),
        "/pin" | "/unpin" => Ok(SpecialCommand::TogglePin),
        "/delete" => Ok(SpecialCommand::Delete(arg.clone())),
        "/show" | "/history" => Ok(SpecialCommand::Show),
        "/export" => Ok(SpecialCommand::Export(arg.clone())),
        "/import" => required("/import <path>").map(SpecialCommand::Import),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(word.clone())),
    }
}

/// Print help for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

SESSIONS:
  /new              - Start a new session
  /list [term]      - List sessions, filtered by name when a term is given
  /switch <id>      - Switch to a session (id or unique id prefix)
  /rename <name>    - Rename the active session
  /pin              - Pin or unpin the active session
  /delete [id]      - Delete a session (default: the active one)
  /show             - Print the active session's messages

IMPORT / EXPORT:
  /export [path]    - Write all sessions to a JSON file (default: chat_sessions.json)
  /import <path>    - Merge sessions from a JSON file; existing ids are kept

OTHER:
  /status           - Show active session, model and store
  /help             - Show this help
  /exit, exit, quit - Leave the chat

Anything else is sent as a message to the model.
"#
    );
}
