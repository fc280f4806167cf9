use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::ResolvedRecord;
use crate::parser::parse_full_entry;
use crate::resolver::ProductResolver;

/// Reads the diary file into lines.
pub async fn read_food_log(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Resolves every diary line in order. Blank lines and lines that resolve to nothing are skipped.
pub async fn process_food_log<S: AsRef<str>>(
    lines: &[S],
    resolver: &ProductResolver<'_>,
) -> Vec<ResolvedRecord> {
    let mut records = Vec::new();

    for (line_no, raw) in lines.iter().enumerate() {
        let line = raw.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        let record = match parse_full_entry(line) {
            Some(record) => Some(record),
            None => resolver.parse_simple_entry(line).await,
        };

        match record {
            Some(record) => records.push(record),
            None => debug!(line = line_no + 1, text = line, "Skipping unresolved line"),
        }
    }

    info!(
        lines = lines.len(),
        records = records.len(),
        "Food log processed"
    );
    records
}
