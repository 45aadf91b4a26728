use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandCategory, CommandEntry};
use crate::storage::json_backend::backup_created_at;

use super::require_args;

const RESTORE_USAGE: &str = "restore <backup name>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandCategory::Backups,
            "backups",
            "List ledger backups, newest first",
            "backups",
            cmd_backups,
        ),
        CommandEntry::new(
            CommandCategory::Backups,
            "backup",
            "Back up the ledger now",
            "backup [note]",
            cmd_backup,
        ),
        CommandEntry::new(
            CommandCategory::Backups,
            "restore",
            "Replace the ledger with a backup",
            RESTORE_USAGE,
            cmd_restore,
        ),
    ]
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.manager.list_backups()?;
    if backups.is_empty() {
        io::print_info("No backups yet.");
        return Ok(());
    }
    output_section("Backups");
    for name in backups {
        match backup_created_at(&name) {
            Some(at) => io::print_info(format!("  {}  ({})", name, at.format("%Y-%m-%d %H:%M:%S"))),
            None => io::print_info(format!("  {}", name)),
        }
    }
    Ok(())
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    match context.manager.backup(note.as_deref())? {
        Some(name) => io::print_success(format!("Backup `{}` created.", name)),
        None => io::print_info("Nothing saved yet; no backup created."),
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, RESTORE_USAGE)?;
    let name = args[0];
    if !context.confirm(&format!("Replace the ledger with `{}`?", name), false)? {
        io::print_info("Restore cancelled.");
        return Ok(());
    }
    let document = context.manager.restore_backup(name)?;
    if let Some(id) = context.active_group {
        if document.group(id).is_none() {
            context.active_group = None;
        }
    }
    io::print_success(format!(
        "Restored `{}` ({} groups).",
        name,
        document.groups.len()
    ));
    Ok(())
}
