//! Analyze command - scan the project and show what the assistant will see

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::output::{colors, symbols};
use crate::config::Config;
use crate::project::ProjectSnapshot;

pub async fn run(config: &Config, path: Option<&str>, json: bool) -> Result<()> {
    let mut session = super::build_session(config)?;
    let root = super::project_root(path);

    let spinner = (!json).then(|| create_spinner(&format!("Scanning {}", root.display())));
    let result = session.analyze(&root).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let snapshot = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot.tree)?);
        return Ok(());
    }

    print_stats(&snapshot, config.verbose);
    if snapshot.tree.is_empty() {
        println!(
            "{}  {} No supported files found in {}{}",
            colors::WARNING, symbols::WARNING, snapshot.root.display(), colors::RESET
        );
        return Ok(());
    }

    print!("{}", session.project_summary()?);
    Ok(())
}

/// Create a styled spinner
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg:.dim}")
        .map(|style| style.tick_strings(&symbols::SPINNER))
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Print the scan statistics
fn print_stats(snapshot: &ProjectSnapshot, verbose: bool) {
    let stats = &snapshot.stats;
    let (icon, color) = if stats.unreadable > 0 {
        (symbols::WARNING, colors::WARNING)
    } else {
        (symbols::SUCCESS, colors::SUCCESS)
    };

    println!(
        "{}{}  {} Project analyzed: {}{}",
        color, colors::BOLD, icon, snapshot.root.display(), colors::RESET
    );
    println!(
        "{}  Files: {}{}{}  Directories: {}{}{}  Lines: {}{}{}  Time: {}{:.2}s{}",
        colors::MUTED,
        colors::FG, snapshot.tree.file_count(), colors::MUTED,
        colors::FG, snapshot.tree.directory_count(), colors::MUTED,
        colors::FG, snapshot.tree.total_lines(), colors::MUTED,
        colors::FG, stats.elapsed_ms as f64 / 1000.0, colors::RESET
    );
    if verbose || stats.unreadable > 0 {
        println!(
            "{}  Skipped: {}  Unreadable: {}{}",
            colors::MUTED, stats.files_skipped, stats.unreadable, colors::RESET
        );
    }
    println!();
}
