//! Interactive chat command
//!
//! One session for the whole loop: the project is analyzed once up front (and
//! again on `/analyze`), and the conversation id carries over between
//! questions.

use anyhow::Result;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::ask::{apply_edits, report_edits};
use super::output::{self, colors, symbols};
use crate::ai::DifyClient;
use crate::config::Config;
use crate::edits::{extract_file_edits, Extraction};
use crate::session::Session;

#[derive(Debug, PartialEq, Eq)]
enum ChatCommand<'a> {
    Exit,
    Help,
    Analyze,
    /// `None` clears the current file
    File(Option<&'a str>),
    Apply,
    Reset,
    Unknown(&'a str),
}

/// `/name` as the first word. A first word with further slashes is a path
/// such as `/etc/hosts`, so the input is a question.
fn is_command(input: &str) -> bool {
    let input = input.trim_start();
    let first = input.split_whitespace().next().unwrap_or("");
    first.starts_with('/') && !first[1..].contains('/') && !input.contains('\n')
}

fn parse_command(input: &str) -> Option<ChatCommand<'_>> {
    let input = input.trim();
    if !is_command(input) {
        return None;
    }

    let (name, arg) = match input.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (input, None),
    };

    let command = match name.to_lowercase().as_str() {
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/analyze" | "/a" => ChatCommand::Analyze,
        "/file" | "/f" => ChatCommand::File(arg),
        "/apply" => ChatCommand::Apply,
        "/reset" | "/clear" | "/c" => ChatCommand::Reset,
        _ => ChatCommand::Unknown(input),
    };
    Some(command)
}

/// Main chat loop
pub async fn run(config: &Config, path: Option<&str>, file: Option<&str>) -> Result<()> {
    let client = DifyClient::from_config(config)?;
    let mut session = super::build_session(config)?;
    let root = super::project_root(path);
    let mut current_file: Option<String> = file.map(String::from);
    let mut pending = Extraction::default();

    print_banner();
    analyze(&mut session, &root).await;

    while let Some(input) = read_input() {
        if let Some(command) = parse_command(&input) {
            match command {
                ChatCommand::Exit => {
                    output::print_success("Goodbye!");
                    break;
                }
                ChatCommand::Help => print_help(),
                ChatCommand::Analyze => analyze(&mut session, &root).await,
                ChatCommand::File(Some(path)) => {
                    current_file = Some(path.to_string());
                    output::print_success(&format!("Current file: {}", path));
                }
                ChatCommand::File(None) => {
                    current_file = None;
                    output::print_success("Current file cleared");
                }
                ChatCommand::Apply => {
                    if pending.edits.is_empty() {
                        output::print_warning("No file changes to apply");
                    } else {
                        match apply_edits(&edit_root(&session, &root), &pending, false) {
                            Ok(true) => pending = Extraction::default(),
                            // Declined; keep them for a later /apply
                            Ok(false) => {}
                            Err(e) => output::print_error(&e.to_string()),
                        }
                    }
                }
                ChatCommand::Reset => {
                    session.reset_conversation();
                    output::print_success("Conversation cleared");
                }
                ChatCommand::Unknown(input) => {
                    output::print_error(&format!("Unknown command: {}", input));
                    println!("{}  Type /help for available commands{}", colors::MUTED, colors::RESET);
                }
            }
            continue;
        }

        let file = match current_file.as_deref().map(|f| super::load_current_file(&session, f)).transpose() {
            Ok(file) => file,
            Err(e) => {
                output::print_error(&format!("{:#}", e));
                None
            }
        };

        output::print_thinking();
        let result = session.ask(&client, &input, file.as_ref()).await;
        output::clear_line();

        match result {
            Ok(answer) => {
                output::print_answer(&answer.text, session.conversation().conversation_id.as_deref());
                pending = extract_file_edits(&answer.text);
                if report_edits(&pending) {
                    println!("{}  Type /apply to write these files{}", colors::MUTED, colors::RESET);
                }
            }
            Err(e) => output::print_error(&e.to_string()),
        }
    }

    println!();
    Ok(())
}

async fn analyze(session: &mut Session, root: &Path) {
    output::print_status(&format!("Analyzing {}...", root.display()));
    match session.analyze(root).await {
        Ok(snapshot) => output::print_success(&format!(
            "Project structure analysis complete ({} files)",
            snapshot.tree.file_count()
        )),
        Err(e) => output::print_error(&e.to_string()),
    }
}

/// Edits land under the analyzed root, or the requested one before any scan
fn edit_root(session: &Session, root: &Path) -> PathBuf {
    session
        .snapshot()
        .map(|snapshot| snapshot.root.clone())
        .unwrap_or_else(|| root.to_path_buf())
}

/// Read multi-line input from user; an empty line sends
fn read_input() -> Option<String> {
    print!(
        "\n{}  > {}",
        colors::PRIMARY, colors::RESET
    );
    io::stdout().flush().ok();

    let mut lines = Vec::new();

    loop {
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {
                let trimmed = line.trim_end();
                if trimmed.is_empty() {
                    if !lines.is_empty() {
                        break;
                    }
                    continue;
                }
                // Commands never span lines
                if lines.is_empty() && is_command(trimmed) {
                    return Some(trimmed.to_string());
                }
                lines.push(trimmed.to_string());
                print!("{}  . {}", colors::MUTED, colors::RESET);
                io::stdout().flush().ok();
            }
            Err(_) => break,
        }
    }

    let input = lines.join("\n").trim().to_string();
    if input.is_empty() {
        None
    } else {
        Some(input)
    }
}

/// Print help information
fn print_help() {
    println!();
    println!(
        "{}{}  Available Commands:{}",
        colors::PRIMARY, colors::BOLD, colors::RESET
    );
    println!("{}  /analyze{}      - Re-scan the project", colors::FG, colors::MUTED);
    println!("{}  /file <path>{}  - Set the current file (no path clears it)", colors::FG, colors::MUTED);
    println!("{}  /apply{}        - Write the files proposed in the last answer", colors::FG, colors::MUTED);
    println!("{}  /reset{}        - Start a new conversation", colors::FG, colors::MUTED);
    println!("{}  /exit{}         - Exit the chat", colors::FG, colors::MUTED);
    println!();
    println!(
        "{}  Type your question and press Enter on an empty line to send{}",
        colors::MUTED, colors::RESET
    );
}

/// Print banner
fn print_banner() {
    println!();
    println!(
        "{}{}  {} codeask v{}{}",
        colors::AI_ACCENT, colors::BOLD, symbols::AI_ICON, env!("CARGO_PKG_VERSION"), colors::RESET
    );
    println!(
        "{}  Commands: /help, /analyze, /file, /apply, /reset, /exit{}",
        colors::MUTED, colors::RESET
    );
    println!(
        "{}{}{}",
        colors::MUTED, symbols::DIVIDER.repeat(55), colors::RESET
    );
}
