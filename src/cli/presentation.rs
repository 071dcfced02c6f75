//! CLI presentation: text rendering of resolved entries.

use crate::content::ContentEntry;
use comfy_table::Table;

fn kind(entry: &ContentEntry) -> &'static str {
    if entry.is_directory() {
        "dir"
    } else {
        "file"
    }
}

fn size(entry: &ContentEntry) -> String {
    entry
        .as_file()
        .map(|file| file.size().to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Table of a directory's children in path order, or a single row for a file.
pub fn format_listing(entry: &ContentEntry) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Type", "Size", "Path"]);
    match entry.as_directory() {
        Some(dir) => {
            for child in dir.children() {
                table.add_row(vec![
                    kind(child).to_string(),
                    size(child),
                    child.path().to_string(),
                ]);
            }
        }
        None => {
            table.add_row(vec![
                kind(entry).to_string(),
                size(entry),
                entry.path().to_string(),
            ]);
        }
    }
    table.to_string()
}

pub fn format_stat(entry: &ContentEntry) -> String {
    format!(
        "identity: {}\ntype: {}\nsize: {}",
        entry.canonicalize(),
        kind(entry),
        size(entry)
    )
}
