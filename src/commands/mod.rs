/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`      — Interactive chat mode
- `send`      — One-shot message and reply
- `sessions`  — Session listing and management
- `transfer`  — Export and import of the session list

Handlers open the session store described by the configuration and
delegate the actual work to [`ChatController`] and [`SessionStore`].
*/

use crate::config::Config;
use crate::conversation::ChatController;
use crate::error::Result;
use crate::providers::create_provider;
use crate::session::{Message, Sender, Session, SessionStore};
use crate::storage::{KeyValueStore, SledStore};
use colored::Colorize;

// Special commands parser for the chat loop
pub mod special_commands;

// Session management commands
pub mod sessions;

// Export and import commands
pub mod transfer;

/// Default file written by `export` and `/export`
pub const DEFAULT_EXPORT_FILE: &str = "chat_sessions.json";

/// Open the session store described by `config`
///
/// # Errors
///
/// Returns error if the store cannot be opened or its session list is corrupt
pub fn open_store(config: &Config) -> Result<SessionStore<SledStore>> {
    let kv = SledStore::open_configured(config.storage.path.as_deref())?;
    Ok(SessionStore::open(kv)?.with_default_name(config.chat.default_session_name.clone()))
}

/// Open the session store and wire it to the configured provider
pub fn open_controller(config: &Config) -> Result<ChatController<SledStore>> {
    let store = open_store(config)?;
    let provider = create_provider(&config.provider)?;
    Ok(ChatController::new_boxed(provider, store, config.chat.clone()))
}

/// Render one message for the terminal
///
/// User text is printed as typed. Bot replies print one bullet per line.
pub fn format_message(message: &Message) -> String {
    match message.sender {
        Sender::User => format!("{} {}", "You:".green().bold(), message.text.lines().join("\n")),
        Sender::Bot => {
            let mut out = format!("{}", "Bot:".blue().bold());
            for line in message.text.lines() {
                out.push_str(&format!("\n  • {}", line));
            }
            out
        }
    }
}

/// Print every message of `session`
pub fn print_transcript(session: &Session) {
    println!(
        "\n{} {}",
        session.name.bold(),
        format!("({})", session.id).dimmed()
    );
    if session.messages.is_empty() {
        println!("{}", "No messages yet.".yellow());
        return;
    }
    for message in &session.messages {
        println!(
            "{}",
            format!("[{}]", message.timestamp.format("%Y-%m-%d %H:%M")).dimmed()
        );
        println!("{}", format_message(message));
    }
    println!();
}

/// Truncate `text` to `max` characters, marking the cut with `...`
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

/// Resolve an id or id prefix against `store`
pub fn resolve<S: KeyValueStore>(store: &SessionStore<S>, id_or_prefix: &str) -> Result<String> {
    store.resolve_id(id_or_prefix.trim())
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Opens the session store, creates the provider, and runs a
    //! readline-based loop. Lines starting with `/` manage sessions;
    //! everything else is sent to the model in the active session.

    use super::*;
    use crate::commands::sessions::print_session_table;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::commands::transfer::{export_to, read_document};
    use crate::error::ChatkeepError;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::path::Path;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `session` - Optional id or id prefix of the session to open
    ///
    /// # Examples
    ///
    /// ```
    /// use chatkeep::commands::chat;
    /// use chatkeep::config::Config;
    ///
    /// // In application code:
    /// // chat::run_chat(Config::default(), None).await?;
    /// ```
    pub async fn run_chat(config: Config, session: Option<String>) -> Result<()> {
        let mut controller = open_controller(&config)?;

        if let Some(prefix) = session {
            let id = resolve(controller.store(), &prefix)?;
            controller.select_session(&id)?;
        } else if controller.active_id().is_none() {
            controller.create_session()?;
        }

        let mut rl = DefaultEditor::new()?;
        print_welcome_banner(&config);
        if let Some(active) = controller.active_session() {
            println!("Resuming {}\n", active.name.cyan());
        }

        loop {
            let prompt = format_prompt(&controller);
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(trimmed);

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::Exit => break,
                        SpecialCommand::None => {
                            match controller.send(trimmed).await {
                                Ok(Some(reply)) => println!("{}\n", format_message(&reply)),
                                Ok(None) => {}
                                Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                            }
                        }
                        other => {
                            if let Err(e) = handle_command(&mut controller, &config, other) {
                                eprintln!("{}", format!("Error: {}", e).red());
                            }
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Apply a session-management command to the controller
    fn handle_command(
        controller: &mut ChatController<SledStore>,
        config: &Config,
        command: SpecialCommand,
    ) -> Result<()> {
        match command {
            SpecialCommand::NewSession => {
                let id = controller.create_session()?;
                println!("{}", format!("Started new session {}", id).green());
            }
            SpecialCommand::ListSessions(term) => {
                let sessions: Vec<&Session> = match term.as_deref() {
                    Some(term) => controller.store().filter(term),
                    None => controller.store().sessions().iter().collect(),
                };
                print_session_table(&sessions, controller.active_id());
            }
            SpecialCommand::SwitchSession(prefix) => {
                let id = resolve(controller.store(), &prefix)?;
                controller.select_session(&id)?;
                if let Some(session) = controller.active_session() {
                    print_transcript(session);
                }
            }
            SpecialCommand::Rename(name) => {
                let id = require_active(controller)?;
                if controller.rename_session(&id, &name)? {
                    println!("{}", format!("Renamed session to '{}'", name.trim()).green());
                }
            }
            SpecialCommand::TogglePin => {
                let id = require_active(controller)?;
                controller.toggle_pin(&id)?;
                let pinned = controller
                    .active_session()
                    .map(|s| s.pinned)
                    .unwrap_or(false);
                let label = if pinned { "Pinned" } else { "Unpinned" };
                println!("{}", format!("{} session", label).green());
            }
            SpecialCommand::Delete(target) => {
                let id = match target {
                    Some(prefix) => resolve(controller.store(), &prefix)?,
                    None => require_active(controller)?,
                };
                if controller.delete_session(&id)? {
                    println!("{}", format!("Deleted session {}", id).green());
                }
            }
            SpecialCommand::Show => match controller.active_session() {
                Some(session) => print_transcript(session),
                None => println!("{}", "No active session.".yellow()),
            },
            SpecialCommand::Export(path) => {
                let path = path.unwrap_or_else(|| DEFAULT_EXPORT_FILE.to_string());
                let count = export_to(controller.store(), Path::new(&path))?;
                println!("{}", format!("Exported {} sessions to {}", count, path).green());
            }
            SpecialCommand::Import(path) => {
                let document = read_document(Path::new(&path))?;
                let added = controller.import_sessions(&document)?;
                println!("{}", format!("Imported {} sessions", added).green());
            }
            SpecialCommand::ShowStatus => print_status(controller, config),
            SpecialCommand::Help => print_help(),
            SpecialCommand::Exit | SpecialCommand::None => {}
        }
        Ok(())
    }

    fn require_active(controller: &ChatController<SledStore>) -> Result<String> {
        controller
            .active_id()
            .map(str::to_string)
            .ok_or_else(|| ChatkeepError::SessionNotFound("no active session".to_string()).into())
    }

    fn format_prompt(controller: &ChatController<SledStore>) -> String {
        let name = controller
            .active_session()
            .map(|s| truncate(&s.name, 24))
            .unwrap_or_else(|| controller.store().default_name().to_string());
        format!("[{}] >> ", name)
    }

    fn print_welcome_banner(config: &Config) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                Chatkeep Interactive Chat                     ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Model: {}", config.provider.model.cyan());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    /// Display the active session, model and store status
    fn print_status(controller: &ChatController<SledStore>, config: &Config) {
        println!("\n{}", "Status".bold());
        println!("  Model:     {}", config.provider.model);
        println!("  Store:     {}", controller.store().kv().path().display());
        println!("  Sessions:  {}", controller.store().len());
        match controller.active_session() {
            Some(session) => {
                println!("  Active:    {} ({})", session.name, session.id);
                println!("  Messages:  {}", session.messages.len());
                println!("  Pinned:    {}", if session.pinned { "yes" } else { "no" });
            }
            None => println!("  Active:    none"),
        }
        println!("  State:     {:?}\n", controller.state());
    }
}

// One-shot send handler
pub mod send {
    //! Send a single message and print the reply.

    use super::*;

    /// Send `text` and print the bot reply
    ///
    /// Without `session` the message starts a new session.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be resolved or the store fails.
    /// A provider failure is not an error: it is recorded and printed as
    /// the configured error reply.
    pub async fn run_send(config: Config, session: Option<String>, text: String) -> Result<()> {
        let mut controller = open_controller(&config)?;

        match session {
            Some(prefix) => {
                let id = resolve(controller.store(), &prefix)?;
                controller.select_session(&id)?;
            }
            None => {
                controller.create_session()?;
            }
        }

        match controller.send(&text).await? {
            Some(reply) => {
                for line in reply.text.lines() {
                    println!("{}", line);
                }
            }
            None => tracing::warn!("Nothing to send: message is blank"),
        }

        if let Some(id) = controller.active_id() {
            eprintln!("{}", format!("session: {}", id).dimmed());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MessageText;
    use crate::test_utils::{temp_dir, test_config};

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let name = "ééééééééééé";
        assert_eq!(truncate(name, 8), "ééééé...");
    }

    #[test]
    fn test_format_bot_message_prints_bullets() {
        colored::control::set_override(false);
        let message = Message::bot(MessageText::Lines(vec!["one".into(), "two".into()]));
        assert_eq!(format_message(&message), "Bot:\n  • one\n  • two");
    }

    #[test]
    fn test_format_user_message() {
        colored::control::set_override(false);
        let message = Message::user("hello");
        assert_eq!(format_message(&message), "You: hello");
    }

    #[test]
    fn test_open_store_uses_configured_path() {
        let dir = temp_dir();
        let config = test_config(&dir);
        let mut store = open_store(&config).unwrap();
        let id = store.create().unwrap();
        assert_eq!(store.load(&id).unwrap().name, config.chat.default_session_name);
    }
}
