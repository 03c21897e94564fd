//! Command-line interface definition for Chatkeep
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot sends, session
//! management, and export/import.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chatkeep - chat with a generative model, keep every conversation
#[derive(Parser, Debug, Clone)]
#[command(name = "chatkeep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the session store location
    #[arg(long, global = true)]
    pub store_path: Option<PathBuf>,

    /// Override the model from config
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Chatkeep
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start interactive chat mode
    Chat {
        /// Session to open (id or unique id prefix); defaults to the first listed
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Send a single message and print the reply
    Send {
        /// Session to send in (id or prefix); defaults to a new session
        #[arg(short, long)]
        session: Option<String>,

        /// Message text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Manage stored sessions
    Sessions {
        /// Session subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Write all sessions to a JSON file
    Export {
        /// Output path; `-` writes to stdout
        #[arg(short, long, default_value = crate::commands::DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },

    /// Merge sessions from a JSON file
    Import {
        /// File produced by `export`
        path: PathBuf,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List sessions (pinned first, newest first)
    List {
        /// Only show sessions whose name contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Print the sessions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an empty session and print its id
    New,

    /// Print a session's messages
    Show {
        /// Session id or unique id prefix
        id: String,
    },

    /// Rename a session
    Rename {
        /// Session id or unique id prefix
        id: String,

        /// New name
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Pin or unpin a session
    Pin {
        /// Session id or unique id prefix
        id: String,
    },

    /// Delete a session
    Delete {
        /// Session id or unique id prefix
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["chatkeep", "chat"]).unwrap();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Chat { session: None }));
    }

    #[test]
    fn test_cli_parse_chat_with_session() {
        let cli = Cli::try_parse_from(["chatkeep", "chat", "--session", "01HX"]).unwrap();
        if let Commands::Chat { session } = cli.command {
            assert_eq!(session, Some("01HX".to_string()));
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_send_joins_words() {
        let cli = Cli::try_parse_from(["chatkeep", "send", "hello", "there"]).unwrap();
        if let Commands::Send { session, text } = cli.command {
            assert_eq!(session, None);
            assert_eq!(text, vec!["hello".to_string(), "there".to_string()]);
        } else {
            panic!("Expected Send command");
        }
    }

    #[test]
    fn test_cli_send_requires_text() {
        assert!(Cli::try_parse_from(["chatkeep", "send"]).is_err());
    }

    #[test]
    fn test_cli_parse_sessions_list_search() {
        let cli =
            Cli::try_parse_from(["chatkeep", "sessions", "list", "--search", "rust", "--json"])
                .unwrap();
        if let Commands::Sessions {
            command: SessionCommand::List { search, json },
        } = cli.command
        {
            assert_eq!(search, Some("rust".to_string()));
            assert!(json);
        } else {
            panic!("Expected Sessions List command");
        }
    }

    #[test]
    fn test_cli_parse_sessions_rename() {
        let cli =
            Cli::try_parse_from(["chatkeep", "sessions", "rename", "01HX", "Road", "trip"]).unwrap();
        if let Commands::Sessions {
            command: SessionCommand::Rename { id, name },
        } = cli.command
        {
            assert_eq!(id, "01HX");
            assert_eq!(name.join(" "), "Road trip");
        } else {
            panic!("Expected Sessions Rename command");
        }
    }

    #[test]
    fn test_cli_parse_export_default_output() {
        let cli = Cli::try_parse_from(["chatkeep", "export"]).unwrap();
        if let Commands::Export { output } = cli.command {
            assert_eq!(output, PathBuf::from("chat_sessions.json"));
        } else {
            panic!("Expected Export command");
        }
    }

    #[test]
    fn test_cli_parse_import() {
        let cli = Cli::try_parse_from(["chatkeep", "import", "backup.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Import { .. }));
    }

    #[test]
    fn test_cli_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "chatkeep",
            "chat",
            "--store-path",
            "/tmp/s.db",
            "--model",
            "gemini-x",
        ])
        .unwrap();
        assert_eq!(cli.store_path, Some(PathBuf::from("/tmp/s.db")));
        assert_eq!(cli.model, Some("gemini-x".to_string()));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["chatkeep"]).is_err());
    }
}
