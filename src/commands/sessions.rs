use crate::cli::SessionCommand;
use crate::commands::{open_store, print_transcript, resolve, truncate};
use crate::config::Config;
use crate::error::Result;
use crate::session::Session;
use colored::Colorize;
use prettytable::{format, Table};

/// Handle session management commands
pub fn handle_sessions(config: &Config, command: SessionCommand) -> Result<()> {
    let mut store = open_store(config)?;

    match command {
        SessionCommand::List { search, json } => {
            let sessions: Vec<&Session> = match search.as_deref() {
                Some(term) => store.filter(term),
                None => store.sessions().iter().collect(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
            } else {
                print_session_table(&sessions, None);
            }
        }
        SessionCommand::New => {
            let id = store.create()?;
            println!("{}", id);
        }
        SessionCommand::Show { id } => {
            let id = resolve(&store, &id)?;
            if let Some(session) = store.load(&id) {
                print_transcript(session);
            }
        }
        SessionCommand::Rename { id, name } => {
            let id = resolve(&store, &id)?;
            let name = name.join(" ");
            if store.rename(&id, &name)? {
                println!("{}", format!("Renamed {} to '{}'", id, name.trim()).green());
            } else {
                println!("{}", "Name is blank; nothing changed.".yellow());
            }
        }
        SessionCommand::Pin { id } => {
            let id = resolve(&store, &id)?;
            store.toggle_pin(&id)?;
            let pinned = store.load(&id).map(|s| s.pinned).unwrap_or(false);
            let label = if pinned { "Pinned" } else { "Unpinned" };
            println!("{}", format!("{} {}", label, id).green());
        }
        SessionCommand::Delete { id } => {
            let id = resolve(&store, &id)?;
            store.delete(&id)?;
            println!("{}", format!("Deleted session {}", id).green());
        }
    }

    Ok(())
}

/// Print sessions as a table, marking `active` with `*`
pub fn print_session_table(sessions: &[&Session], active: Option<&str>) {
    if sessions.is_empty() {
        println!("{}", "No sessions found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Name".bold(),
        "Pinned".bold(),
        "Messages".bold(),
        "Last Message".bold()
    ]);

    for session in sessions {
        let marker = if active == Some(session.id.as_str()) {
            "*"
        } else {
            " "
        };
        let pinned = if session.pinned { "yes" } else { "" };
        let last = session
            .messages
            .last()
            .map(|m| m.timestamp.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(prettytable::row![
            format!("{}{}", marker, session.id).cyan(),
            truncate(&session.name, 40),
            pinned,
            session.messages.len(),
            last
        ]);
    }

    println!("\nSessions:");
    table.printstd();
    println!();
    println!(
        "Use {} to continue a session.",
        "chatkeep chat --session <ID>".cyan()
    );
    println!();
}
