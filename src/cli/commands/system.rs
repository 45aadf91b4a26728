use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output::{print_table, section as output_section};
use crate::cli::registry::{CommandCategory, CommandEntry};
use crate::domain::document::CURRENT_SCHEMA_VERSION;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandCategory::General,
            "help",
            "Show commands, or details for one command",
            "help [command]",
            cmd_help,
        )
        .with_aliases(&["?"]),
        CommandEntry::new(
            CommandCategory::General,
            "version",
            "Show version and build details",
            "version",
            cmd_version,
        ),
        CommandEntry::new(
            CommandCategory::General,
            "exit",
            "Leave the shell",
            "exit",
            cmd_exit,
        )
        .with_aliases(&["quit"]),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(topic) = args.first() else {
        help::print_overview(&context.registry);
        return Ok(());
    };
    match context.command(&topic.to_lowercase()) {
        Some(entry) => help::print_command(entry),
        None => context.suggest_command(topic),
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let build = build_info::current();
    output_section(format!("Split Ledger {}", build.summary()));
    let rows = vec![
        vec!["Ledger schema".to_string(), format!("v{}", CURRENT_SCHEMA_VERSION)],
        vec!["Built".to_string(), build.timestamp.to_string()],
        vec!["Target".to_string(), format!("{} ({})", build.target, build.profile)],
        vec!["Compiler".to_string(), build.rustc.to_string()],
    ];
    print_table(&["Detail", "Value"], &rows);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
