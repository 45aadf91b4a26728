use std::collections::{BTreeMap, BTreeSet};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{print_table, section as output_section};
use crate::cli::registry::{CommandCategory, CommandEntry};
use crate::domain::{
    common::{Displayable, Identifiable},
    expense::{Distribution, ExpenseDraft, SplitRule},
    group::Group,
};

use super::require_args;

const EXPENSE_ADD_USAGE: &str =
    "expense-add <description> <amount> <paid by> [--exclude NAME]... [--percent NAME=PCT]...";
const EXPENSE_EDIT_USAGE: &str =
    "expense-edit <id> <description> <amount> <paid by> [--exclude NAME]... [--percent NAME=PCT]... [--equal]";
const EXPENSE_DELETE_USAGE: &str = "expense-delete <id>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandCategory::Expenses,
            "expense-add",
            "Record an expense in the selected group",
            EXPENSE_ADD_USAGE,
            cmd_expense_add,
        ),
        CommandEntry::new(
            CommandCategory::Expenses,
            "expense-edit",
            "Replace the details of an expense",
            EXPENSE_EDIT_USAGE,
            cmd_expense_edit,
        ),
        CommandEntry::new(
            CommandCategory::Expenses,
            "expense-delete",
            "Delete an expense",
            EXPENSE_DELETE_USAGE,
            cmd_expense_delete,
        ),
        CommandEntry::new(
            CommandCategory::Expenses,
            "expenses",
            "List expenses of the selected group",
            "expenses",
            cmd_expenses,
        ),
    ]
}

fn cmd_expense_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 3, EXPENSE_ADD_USAGE)?;
    let group = context.current_group()?;
    let (draft, _) = parse_draft(context, &group, args, EXPENSE_ADD_USAGE)?;
    let expense = context.manager.add_expense(group.id, draft)?;
    io::print_success(format!(
        "Recorded `{}` ({}) paid by {} [{}].",
        expense.description,
        context.format_amount(expense.amount),
        expense.paid_by,
        expense.short_id()
    ));
    Ok(())
}

fn cmd_expense_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 4, EXPENSE_EDIT_USAGE)?;
    let group = context.current_group()?;
    let current = context.resolve_expense(&group, args[0])?;
    let (mut draft, split_given) = parse_draft(context, &group, &args[1..], EXPENSE_EDIT_USAGE)?;
    // Without split options a percentage expense keeps its percentages.
    if !split_given && current.distribution == Distribution::Percentage {
        draft.rule = SplitRule::Percentage(current.percentages());
    }
    let expense = context.manager.update_expense(group.id, current.id, draft)?;
    io::print_success(format!("Updated {}.", expense.display_label()));
    Ok(())
}

fn cmd_expense_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, EXPENSE_DELETE_USAGE)?;
    let group = context.current_group()?;
    let expense = context.resolve_expense(&group, args[0])?;
    if !context.confirm(&format!("Delete `{}`?", expense.description), false)? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    let removed = context.manager.delete_expense(group.id, expense.id)?;
    io::print_success(format!("Deleted `{}`.", removed.description));
    Ok(())
}

fn cmd_expenses(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let group = context.current_group()?;
    if group.expenses.is_empty() {
        io::print_info(format!("No expenses in `{}` yet.", group.name));
        return Ok(());
    }
    output_section(format!("Expenses of {}", group.name));
    let rows: Vec<Vec<String>> = group
        .expenses
        .iter()
        .map(|expense| {
            let split = match expense.distribution {
                Distribution::Equal => "equal".to_string(),
                Distribution::Percentage => "percentage".to_string(),
            };
            let excluded = if expense.excluded.is_empty() {
                String::new()
            } else {
                format!(
                    "excl. {}",
                    expense.excluded.iter().cloned().collect::<Vec<_>>().join(", ")
                )
            };
            vec![
                expense.short_id(),
                expense.description.clone(),
                context.format_amount(expense.amount),
                expense.paid_by.clone(),
                split,
                excluded,
            ]
        })
        .collect();
    print_table(
        &["ID", "Description", "Amount", "Paid by", "Split", ""],
        &rows,
    );
    io::print_info(format!(
        "Total spent: {}",
        context.format_amount(group.total_spent())
    ));
    Ok(())
}

/// Parses `<description> <amount> <paid by>` followed by split options.
/// The flag is set when `--percent` or `--equal` chose the split explicitly.
fn parse_draft(
    context: &ShellContext,
    group: &Group,
    args: &[&str],
    usage: &str,
) -> Result<(ExpenseDraft, bool), CommandError> {
    require_args(args, 3, usage)?;
    let description = args[0];
    let amount = parse_amount(args[1])?;
    let paid_by = args[2];
    context.require_member(group, paid_by)?;

    let mut excluded = BTreeSet::new();
    let mut percentages = BTreeMap::new();
    let mut force_equal = false;
    let mut rest = args[3..].iter();
    while let Some(flag) = rest.next() {
        if *flag == "--equal" {
            force_equal = true;
            continue;
        }
        let value = rest.next().ok_or_else(|| {
            CommandError::InvalidArguments(format!("`{}` expects a value. Usage: {}", flag, usage))
        })?;
        match *flag {
            "--exclude" | "-x" => {
                context.require_member(group, value)?;
                excluded.insert(value.to_string());
            }
            "--percent" | "-p" => {
                let (member, pct) = parse_percentage(value)?;
                context.require_member(group, member)?;
                percentages.insert(member.to_string(), pct);
            }
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "Unknown option `{}`. Usage: {}",
                    other, usage
                )))
            }
        }
    }

    if force_equal && !percentages.is_empty() {
        return Err(CommandError::InvalidArguments(format!(
            "`--equal` cannot be combined with `--percent`. Usage: {}",
            usage
        )));
    }
    let split_given = force_equal || !percentages.is_empty();
    let rule = if percentages.is_empty() {
        SplitRule::Equal
    } else {
        SplitRule::Percentage(percentages)
    };
    let draft = ExpenseDraft {
        description: description.to_string(),
        amount,
        paid_by: paid_by.to_string(),
        rule,
        excluded,
    };
    Ok((draft, split_given))
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not a valid amount.", raw)))
}

/// `Alice=40` or `Alice=40%`.
fn parse_percentage(raw: &str) -> Result<(&str, f64), CommandError> {
    let invalid = || {
        CommandError::InvalidArguments(format!(
            "`{}` is not a valid percentage; expected NAME=PCT.",
            raw
        ))
    };
    let (member, value) = raw.split_once('=').ok_or_else(invalid)?;
    let value = value.trim().trim_end_matches('%');
    let pct = value.parse::<f64>().map_err(|_| invalid())?;
    Ok((member.trim(), pct))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::process_script;
    use tempfile::tempdir;

    #[test]
    fn percentage_option_accepts_suffix() {
        assert_eq!(parse_percentage("Alice=40%").unwrap(), ("Alice", 40.0));
        assert!(parse_percentage("Alice").is_err());
        assert!(parse_percentage("Alice=lots").is_err());
        assert!(parse_amount("12.5").is_ok());
        assert!(parse_amount("twelve").is_err());
    }

    #[test]
    fn percentage_expense_is_recorded() {
        let temp = tempdir().unwrap();
        let context = process_script(
            temp.path().to_path_buf(),
            &[
                "group-new Trip Alice Bob Carol",
                "expense-add Hotel 300 Bob -p Alice=50 -p Bob=30 -p Carol=20",
            ],
        )
        .unwrap();
        let group = context
            .manager
            .group(context.active_group.unwrap())
            .unwrap();
        let expense = &group.expenses[0];
        assert_eq!(expense.distribution, Distribution::Percentage);
        assert_eq!(expense.share_of("Carol"), 60.0);
    }

    #[test]
    fn invalid_expenses_are_not_recorded() {
        let temp = tempdir().unwrap();
        let context = process_script(
            temp.path().to_path_buf(),
            &[
                "group-new Trip Alice Bob",
                "expense-add Taxi 0 Alice",
                "expense-add Taxi 10 Mallory",
                "expense-add Taxi 10 Alice --percent Alice=60",
                "expense-add Taxi 10 Alice --exclude Alice --exclude Bob",
                "expense-add Taxi 10 Alice --bogus x",
            ],
        )
        .unwrap();
        let group = context
            .manager
            .group(context.active_group.unwrap())
            .unwrap();
        assert!(group.expenses.is_empty());
    }

    #[test]
    fn edit_keeps_percentages_unless_split_is_given() {
        let temp = tempdir().unwrap();
        let mut context = process_script(
            temp.path().to_path_buf(),
            &[
                "group-new Flat Ann Ben",
                "expense-add Rent 1000 Ann -p Ann=75 -p Ben=25",
            ],
        )
        .unwrap();
        let group_id = context.active_group.unwrap();
        let short = context.manager.group(group_id).unwrap().expenses[0].short_id();

        context
            .process_line(&format!("expense-edit {} Rent 1200 Ann", short))
            .unwrap();
        let expense = context.manager.expenses(group_id).unwrap().remove(0);
        assert_eq!(expense.distribution, Distribution::Percentage);
        assert!((expense.share_of("Ben") - 300.0).abs() < 1e-6);

        context
            .process_line(&format!("expense-edit {} Rent 1200 Ann --equal", short))
            .unwrap();
        let expense = context.manager.expenses(group_id).unwrap().remove(0);
        assert_eq!(expense.distribution, Distribution::Equal);
        assert!((expense.share_of("Ben") - 600.0).abs() < 1e-6);

        assert!(context
            .process_line(&format!("expense-edit {} Rent 10 Ann --equal -p Ann=100", short))
            .is_err());
        let expense = context.manager.expenses(group_id).unwrap().remove(0);
        assert_eq!(expense.amount, 1200.0);
    }

    #[test]
    fn edit_and_delete_by_id_prefix() {
        let temp = tempdir().unwrap();
        let mut context = process_script(
            temp.path().to_path_buf(),
            &["group-new Trip Alice Bob", "expense-add Fuel 40 Alice"],
        )
        .unwrap();
        let group_id = context.active_group.unwrap();
        let short = context.manager.group(group_id).unwrap().expenses[0].short_id();

        context
            .process_line(&format!("expense-edit {} Fuel 60 Bob", short))
            .unwrap();
        let expense = context.manager.expenses(group_id).unwrap().remove(0);
        assert_eq!(expense.amount, 60.0);
        assert_eq!(expense.paid_by, "Bob");

        context
            .process_line(&format!("expense-delete {}", short))
            .unwrap();
        assert!(context.manager.expenses(group_id).unwrap().is_empty());
    }
}
