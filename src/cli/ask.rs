//! Ask command - query your codebase with AI assistance
//!
//! Scans the project, sends the outline and the current file digest with the
//! question, and optionally applies the file edits proposed in the answer.

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use std::path::Path;

use super::output::{self, colors};
use crate::ai::DifyClient;
use crate::config::Config;
use crate::edits::{apply_file_edits, extract_file_edits, Extraction};

pub struct AskOptions {
    pub path: Option<String>,
    pub file: Option<String>,
    pub conversation: Option<String>,
    pub apply: bool,
    pub assume_yes: bool,
}

pub async fn run(config: &Config, question: &str, options: AskOptions) -> Result<()> {
    output::print_question(question);

    // Fail on a missing key before spending time on the scan
    let client = DifyClient::from_config(config)?;

    let mut session = super::build_session(config)?.with_conversation_id(options.conversation);

    output::print_status("Scanning codebase...");
    let snapshot = session.analyze(&super::project_root(options.path.as_deref())).await?;
    if snapshot.tree.is_empty() {
        output::print_warning("No supported files found; asking without project files");
    }

    let current_file = options
        .file
        .as_deref()
        .map(|f| super::load_current_file(&session, f))
        .transpose()?;

    output::print_thinking();
    let result = session.ask(&client, question, current_file.as_ref()).await;
    output::clear_line();
    let answer = result?;
    output::print_answer(&answer.text, session.conversation().conversation_id.as_deref());

    let extraction = extract_file_edits(&answer.text);
    if !report_edits(&extraction) {
        return Ok(());
    }
    if options.apply {
        apply_edits(&snapshot.root, &extraction, options.assume_yes)?;
    } else {
        println!(
            "{}  Re-run with --apply to write these files{}",
            colors::MUTED, colors::RESET
        );
    }
    Ok(())
}

/// Print parse errors and proposed paths; true when there is something to apply
pub(crate) fn report_edits(extraction: &Extraction) -> bool {
    if extraction.is_empty() {
        return false;
    }
    for err in &extraction.errors {
        output::print_error(&format!("Error parsing file generation instructions: {}", err));
    }
    if extraction.edits.is_empty() {
        return false;
    }

    println!(
        "{}  Proposed file changes:{}",
        colors::PRIMARY, colors::RESET
    );
    for edit in &extraction.edits {
        println!("{}    {}{}", colors::FG, edit.path, colors::RESET);
    }
    true
}

/// Write the edits under `root`, confirming first unless `assume_yes`.
/// Returns false when the user declined.
pub(crate) fn apply_edits(root: &Path, extraction: &Extraction, assume_yes: bool) -> Result<bool> {
    let confirmed = assume_yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Write {} file(s) under {}?", extraction.edits.len(), root.display()))
            .default(false)
            .interact()?;
    if !confirmed {
        output::print_warning("No files written");
        return Ok(false);
    }

    let outcomes = apply_file_edits(root, &extraction.edits);
    output::print_edit_outcomes(&outcomes);
    output::print_success(&format!("Successfully processed {} file(s)", outcomes.len()));
    Ok(true)
}
