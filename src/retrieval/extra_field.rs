//! Citation-count lines in an item's `extra` field.
//!
//! A generated line reads `<count> citations (<source>) [<YYYY-MM-DD>]`, dated
//! in UTC. Older
//! releases wrote `Citations (<source>): <count>`; both forms are recognized
//! when replacing a previous count from the same source.

use chrono::{NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::library::{ItemStore, StoreError};
use crate::models::{Field, Item};

static COLUMN_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Format a citation-count line
pub fn citation_line(count: u64, source: &str, date: NaiveDate) -> String {
    format!("{} citations ({}) [{}]", count, source, date.format("%Y-%m-%d"))
}

fn source_pattern(source: &str) -> Regex {
    let source = regex::escape(source);
    Regex::new(&format!(
        r"(?i)^(?:Citations \({source}\):|\d+ citations \({source}\))"
    ))
    .expect("escaped source label yields a valid pattern")
}

/// Rewrite `extra` so it holds exactly one line for `source`, placed first.
///
/// Lines for other sources and unrelated notes keep their relative order.
pub fn merge_citation_count(extra: &str, source: &str, count: u64, date: NaiveDate) -> String {
    let pattern = source_pattern(source);

    let mut lines = vec![citation_line(count, source, date)];
    if !extra.is_empty() {
        lines.extend(
            extra
                .split('\n')
                .filter(|line| !pattern.is_match(line))
                .map(str::to_string),
        );
    }

    lines.join("\n")
}

/// Merge today's (UTC) count into `item` and commit it through `store`.
pub fn set_citation_count(
    item: &mut Item,
    store: &mut dyn ItemStore,
    source: &str,
    count: u64,
) -> Result<(), StoreError> {
    let today = Utc::now().date_naive();
    let extra = merge_citation_count(&item.extra, source, count, today);
    item.set_field(Field::Extra, extra);

    store.save_item(item)
}

/// Value of the citation-count column for an `extra` field: the count of the
/// first citation line, or `-` when there is none.
pub fn citation_count_column(extra: &str) -> String {
    let pattern = COLUMN_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(?:Citations:|\d+ citations)").expect("column pattern is valid")
    });

    extra
        .split('\n')
        .find(|line| pattern.is_match(line))
        .map(|line| {
            line.chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .filter(|digits| !digits.is_empty())
        .unwrap_or_else(|| "-".to_string())
}
