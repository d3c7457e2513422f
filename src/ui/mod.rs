//! Terminal output for the command-line tool.
//!
//! Styled status lines and tables for the CLI, plus the progress surfaces
//! ([`ProgressWindow`]) and message catalogue ([`Localization`]) used while
//! retrieving citation counts.

pub mod l10n;
mod progress;

pub use l10n::Localization;
pub use progress::{Icon, ItemId, ProgressWindow, RecordedItem, RecordingProgress, TerminalProgress};

use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::apis::CitationApi;
use crate::models::Item;
use crate::retrieval::{citation_count_column, BatchReport, ItemOutcome};

/// Check if stderr is a terminal.
pub fn is_terminal() -> bool {
    std::io::stderr().is_terminal()
}

/// Icons for the built-in backends.
pub fn api_icon(key: &str) -> &'static str {
    match key {
        "crossref" => "🔗",
        "inspire" => "⚛",
        "semanticscholar" => "🧠",
        _ => "📄",
    }
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Error => println!("{} {}", icon.red().bold(), msg),
        Status::Warning => println!("{} {}", icon.yellow().bold(), msg),
        Status::Info => println!("{} {}", icon.cyan().bold(), msg),
    }
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Print a divider line.
pub fn print_divider() {
    println!("{}", "─".repeat(72).dimmed());
}

/// Print one line per registered backend.
pub fn print_apis(apis: &[std::sync::Arc<dyn CitationApi>], autoretrieve: Option<&str>) {
    print_section("Citation APIs");
    for api in apis {
        let mut ids = Vec::new();
        if api.uses_doi() {
            ids.push("DOI");
        }
        if api.uses_arxiv() {
            ids.push("arXiv");
        }

        let marker = if autoretrieve == Some(api.key()) {
            " (autoretrieve)".green().to_string()
        } else {
            String::new()
        };

        println!(
            "  {} {:<16} {:<18} {}{}",
            api_icon(api.key()),
            api.key().cyan().bold(),
            api.name(),
            ids.join(", ").dimmed(),
            marker
        );
    }
}

/// Print the library as a table with a citation-count column.
pub fn print_items(items: &[Item], column_title: &str) {
    println!(
        "{:<12} {:>9}  {}",
        "Key".bold(),
        column_title.bold(),
        "Title".bold()
    );
    print_divider();
    for item in items {
        println!(
            "{:<12} {:>9}  {}",
            truncate_with_ellipsis(&item.key, 12),
            citation_count_column(&item.extra).yellow(),
            truncate_with_ellipsis(&item.title, 48)
        );
    }
}

/// Print the per-item results and totals of a batch.
pub fn print_report(report: &BatchReport) {
    print_section(&format!("Results from {}", report.api));
    for entry in &report.items {
        match &entry.outcome {
            ItemOutcome::Succeeded { count, source } => println!(
                "  {} {} {}",
                status_icon(Status::Success).green().bold(),
                truncate_with_ellipsis(&entry.title, 48),
                format!("{} citations ({})", count, source).dimmed()
            ),
            ItemOutcome::Failed { message, .. } => println!(
                "  {} {} {}",
                status_icon(Status::Error).red().bold(),
                truncate_with_ellipsis(&entry.title, 48),
                message.red()
            ),
        }
    }
    print_divider();
    println!(
        "  {} succeeded, {} failed",
        report.succeeded().to_string().green().bold(),
        report.failed().to_string().red().bold()
    );
}

/// Truncate text to `max_chars` characters, ending with `...` when cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return "...".to_string();
    }

    let kept: String = text.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("a longer title", 8), "a lon...");
        assert_eq!(truncate_with_ellipsis("anything", 2), "...");
        assert_eq!(truncate_with_ellipsis("Über-Größe", 6), "Übe...");
    }

    #[test]
    fn test_api_icons() {
        assert_eq!(api_icon("crossref"), "🔗");
        assert_eq!(api_icon("unknown"), "📄");
    }

    #[test]
    fn test_status_icons() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Error), "✗");
    }
}
