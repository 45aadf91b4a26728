use crate::cli::io;
use crate::cli::output::{print_table, section as output_section};
use crate::cli::registry::{CommandEntry, CommandRegistry};

/// Every command, one table per category.
pub fn print_overview(registry: &CommandRegistry) {
    for (category, entries) in registry.by_category() {
        output_section(category.title());
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|entry| vec![entry.name.to_string(), entry.summary.to_string()])
            .collect();
        print_table(&["Command", "What it does"], &rows);
    }
    io::print_hint("`help <command>` shows usage for a single command.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(entry.name);
    io::print_info(entry.summary);
    io::print_info(format!("Usage: {}", entry.usage));
    if !entry.aliases.is_empty() {
        io::print_info(format!("Also available as: {}", entry.aliases.join(", ")));
    }
}
