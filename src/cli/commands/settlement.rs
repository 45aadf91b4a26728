use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{print_table, section as output_section};
use crate::cli::registry::{CommandCategory, CommandEntry};
use crate::domain::settlement::{MemberBalance, Transaction};

const BALANCES_USAGE: &str = "balances [--ranked]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            CommandCategory::Settlement,
            "balances",
            "Show what each member is owed (+) or owes (-)",
            BALANCES_USAGE,
            cmd_balances,
        ),
        CommandEntry::new(
            CommandCategory::Settlement,
            "settle",
            "Suggest payments that settle the selected group",
            "settle",
            cmd_settle,
        ),
    ]
}

/// Member order by default; `--ranked` lists the largest creditor first.
fn cmd_balances(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let ranked = match args {
        [] => false,
        ["--ranked"] => true,
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "Usage: {}",
                BALANCES_USAGE
            )))
        }
    };
    let group = context.current_group()?;
    let balances = context.manager.balances(group.id)?;
    let entries: Vec<&MemberBalance> = if ranked {
        balances.ranked()
    } else {
        balances.iter().collect()
    };
    output_section(format!("Balances of {}", group.name));
    let rows: Vec<Vec<String>> = entries
        .into_iter()
        .map(|entry| {
            let status = if entry.is_creditor() {
                "is owed"
            } else if entry.is_debtor() {
                "owes"
            } else {
                "settled"
            };
            vec![
                entry.member.clone(),
                format_signed(context, entry.amount),
                status.to_string(),
            ]
        })
        .collect();
    print_table(&["Member", "Balance", ""], &rows);
    Ok(())
}

fn cmd_settle(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let group = context.current_group()?;
    let transactions = context.manager.settlement(group.id)?;
    output_section(format!("Settlement for {}", group.name));
    if transactions.is_empty() {
        io::print_success("Everyone is settled up.");
        return Ok(());
    }
    for transaction in &transactions {
        io::print_info(format!("  {}", describe_payment(context, transaction)));
    }
    io::print_info(format!("{} payments needed.", transactions.len()));
    Ok(())
}

/// `Bob -> Alice: ₹30.00`
fn describe_payment(context: &ShellContext, transaction: &Transaction) -> String {
    format!(
        "{} -> {}: {}",
        transaction.from,
        transaction.to,
        context.format_amount(transaction.amount)
    )
}

fn format_signed(context: &ShellContext, amount: f64) -> String {
    let magnitude = context.format_amount(amount.abs());
    if amount < 0.0 && !crate::ledger::is_negligible(amount) {
        format!("-{}", magnitude)
    } else {
        magnitude
    }
}
