use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{print_table, section as output_section};
use crate::cli::registry::{CommandCategory, CommandEntry};
use crate::domain::common::{Displayable, Identifiable};

use super::require_args;

const GROUP_NEW_USAGE: &str = "group-new <name> <member> [member...]";
const GROUP_RENAME_USAGE: &str = "group-rename <new name>";
const USE_USAGE: &str = "use <group name or id>";
const MEMBER_ADD_USAGE: &str = "member-add <name>";
const MEMBER_REMOVE_USAGE: &str = "member-remove <name>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandCategory::Groups,
            "groups",
            "List all groups",
            "groups",
            cmd_groups,
        )
        .with_aliases(&["ls"]),
        CommandEntry::new(
            CommandCategory::Groups,
            "group-new",
            "Create a group and select it",
            GROUP_NEW_USAGE,
            cmd_group_new,
        ),
        CommandEntry::new(
            CommandCategory::Groups,
            "group-delete",
            "Delete a group and all of its expenses",
            "group-delete [group name or id]",
            cmd_group_delete,
        ),
        CommandEntry::new(
            CommandCategory::Groups,
            "group-rename",
            "Rename the selected group",
            GROUP_RENAME_USAGE,
            cmd_group_rename,
        ),
        CommandEntry::new(
            CommandCategory::Groups,
            "use",
            "Select the group to work on",
            USE_USAGE,
            cmd_use,
        ),
        CommandEntry::new(
            CommandCategory::Groups,
            "members",
            "List members of the selected group",
            "members",
            cmd_members,
        ),
        CommandEntry::new(
            CommandCategory::Groups,
            "member-add",
            "Add a member to the selected group",
            MEMBER_ADD_USAGE,
            cmd_member_add,
        ),
        CommandEntry::new(
            CommandCategory::Groups,
            "member-remove",
            "Remove a member and repair their expenses",
            MEMBER_REMOVE_USAGE,
            cmd_member_remove,
        ),
    ]
}

fn cmd_groups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let groups = context.manager.list_groups()?;
    if groups.is_empty() {
        io::print_info("No groups yet. Create one with `group-new`.");
        return Ok(());
    }
    output_section("Groups");
    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|group| {
            let marker = if context.active_group == Some(group.id) {
                "*"
            } else {
                ""
            };
            vec![
                marker.to_string(),
                group.short_id(),
                group.display_label(),
                context.format_amount(group.total_spent()),
            ]
        })
        .collect();
    print_table(&["", "ID", "Group", "Spent"], &rows);
    Ok(())
}

fn cmd_group_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, GROUP_NEW_USAGE)?;
    let members: Vec<String> = args[1..].iter().map(|name| name.to_string()).collect();
    let group = context.manager.create_group(args[0], &members)?;
    context.select_group(&group)?;
    io::print_success(format!(
        "Group `{}` created with {} members.",
        group.name,
        group.members.len()
    ));
    Ok(())
}

fn cmd_group_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let group = match args.first() {
        Some(query) => context.resolve_group(query)?,
        None => context.current_group()?,
    };
    let prompt = format!(
        "Delete `{}` and its {} expenses?",
        group.name,
        group.expenses.len()
    );
    if !context.confirm(&prompt, false)? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    context.manager.delete_group(group.id)?;
    context.forget_group(group.id)?;
    io::print_success(format!("Group `{}` deleted.", group.name));
    Ok(())
}

fn cmd_group_rename(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, GROUP_RENAME_USAGE)?;
    let group = context.current_group()?;
    let name = args.join(" ");
    context.manager.rename_group(group.id, &name)?;
    io::print_success(format!("Group `{}` renamed to `{}`.", group.name, name.trim()));
    Ok(())
}

fn cmd_use(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, USE_USAGE)?;
    let group = context.resolve_group(&args.join(" "))?;
    context.select_group(&group)?;
    io::print_success(format!("Using group `{}`.", group.name));
    Ok(())
}

fn cmd_members(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let group = context.current_group()?;
    output_section(format!("Members of {}", group.name));
    for member in &group.members {
        io::print_info(format!("  {}", member));
    }
    Ok(())
}

fn cmd_member_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, MEMBER_ADD_USAGE)?;
    let group = context.current_group()?;
    for name in args {
        context.manager.add_member(group.id, name)?;
        io::print_success(format!("Added `{}` to `{}`.", name.trim(), group.name));
    }
    Ok(())
}

fn cmd_member_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, MEMBER_REMOVE_USAGE)?;
    let group = context.current_group()?;
    let name = args[0];
    context.require_member(&group, name)?;

    let paid = group
        .expenses
        .iter()
        .filter(|expense| expense.paid_by == name)
        .count();
    let prompt = if paid > 0 {
        format!(
            "Remove `{}`? The {} expenses they paid will be deleted.",
            name, paid
        )
    } else {
        format!("Remove `{}`?", name)
    };
    if !context.confirm(&prompt, false)? {
        io::print_info("Removal cancelled.");
        return Ok(());
    }

    let report = context.manager.remove_member(group.id, name)?;
    io::print_success(format!("Removed `{}` from `{}`.", report.member, group.name));
    if !report.dropped_expenses.is_empty() {
        io::print_warning(format!(
            "{} expenses were deleted.",
            report.dropped_expenses.len()
        ));
    }
    if !report.rebalanced_expenses.is_empty() {
        io::print_info(format!(
            "{} expenses were re-split among the remaining members.",
            report.rebalanced_expenses.len()
        ));
    }
    Ok(())
}
