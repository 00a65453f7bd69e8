//! Terminal output shared by the commands

use std::io::{self, Write};

use crate::edits::{EditOutcome, EditStatus};

// ANSI color codes from design system
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const PRIMARY: &str = "\x1b[38;2;100;181;246m";      // #64B5F6
    pub const SUCCESS: &str = "\x1b[38;2;165;214;167m";      // #A5D6A7
    pub const WARNING: &str = "\x1b[38;2;255;245;157m";      // #FFF59D
    pub const ERROR: &str = "\x1b[38;2;239;154;154m";        // #EF9A9A
    pub const AI_ACCENT: &str = "\x1b[38;2;255;202;40m";     // #FFCA28
    pub const MUTED: &str = "\x1b[38;2;84;110;122m";         // #546E7A
    pub const FG: &str = "\x1b[38;2;212;212;215m";           // #D4D4D7
}

pub mod symbols {
    pub const AI_ICON: &str = "󰌤";
    pub const SEARCH: &str = "󰍉";
    pub const SUCCESS: &str = "󰄂";
    pub const WARNING: &str = "⚠";
    pub const ERROR: &str = "󰅚";
    pub const FILE: &str = "󰈙";
    pub const DIVIDER: &str = "─";
    pub const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
}

/// Print the question header
pub fn print_question(question: &str) {
    println!();
    println!(
        "{}{}  {} Asking about your codebase...{}",
        colors::PRIMARY, colors::BOLD, symbols::SEARCH, colors::RESET
    );
    for line in question.lines() {
        println!("{}  │ {}{}{}", colors::MUTED, colors::FG, line, colors::RESET);
    }
    println!("{}  ╰{}─{}", colors::MUTED, symbols::DIVIDER.repeat(50), colors::RESET);
}

/// Print a status message
pub fn print_status(message: &str) {
    println!(
        "{}  {} {}{}",
        colors::MUTED, symbols::SPINNER[0], message, colors::RESET
    );
}

/// Print thinking indicator
pub fn print_thinking() {
    print!(
        "\r{}  {} Waiting for an answer {}{}",
        colors::AI_ACCENT, symbols::AI_ICON, symbols::SPINNER[0], colors::RESET
    );
    io::stdout().flush().ok();
}

/// Clear the current line
pub fn clear_line() {
    print!("\r{}\r", " ".repeat(60));
    io::stdout().flush().ok();
}

/// Print the answer bubble
pub fn print_answer(answer: &str, conversation_id: Option<&str>) {
    println!();
    println!(
        "{}{}  {} Answer {}",
        colors::AI_ACCENT, colors::BOLD, symbols::AI_ICON, colors::RESET
    );
    println!("{}  ╭{}─{}", colors::MUTED, symbols::DIVIDER.repeat(50), colors::RESET);
    for line in answer.lines() {
        println!("{}  │ {}{}{}", colors::MUTED, colors::FG, line, colors::RESET);
    }
    println!("{}  ╰{}─{}", colors::MUTED, symbols::DIVIDER.repeat(50), colors::RESET);
    if let Some(id) = conversation_id {
        println!("{}  conversation: {}{}", colors::MUTED, id, colors::RESET);
    }
    println!();
}

/// Print one line per applied edit
pub fn print_edit_outcomes(outcomes: &[EditOutcome]) {
    println!(
        "{}{}  {} Files Generated:{}",
        colors::PRIMARY, colors::BOLD, symbols::FILE, colors::RESET
    );
    for outcome in outcomes {
        let (color, icon) = match outcome.status {
            EditStatus::Created | EditStatus::Updated => (colors::SUCCESS, symbols::SUCCESS),
            EditStatus::Unchanged => (colors::MUTED, symbols::SUCCESS),
            EditStatus::Failed(_) => (colors::ERROR, symbols::ERROR),
        };
        println!("{}  {} {}{}", color, icon, outcome, colors::RESET);
    }
    println!();
}

/// Print success message
pub fn print_success(message: &str) {
    println!(
        "\n{}  {} {}{}",
        colors::SUCCESS, symbols::SUCCESS, message, colors::RESET
    );
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!(
        "\n{}  {} {}{}",
        colors::WARNING, symbols::WARNING, message, colors::RESET
    );
}

/// Print error message
pub fn print_error(message: &str) {
    println!(
        "\n{}  {} Error: {}{}",
        colors::ERROR, symbols::ERROR, message, colors::RESET
    );
}
