use tracing::{debug, warn};

use crate::domain::{group::Group, settlement::BalanceSheet};

pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Nets every expense of `group` into one balance per current member.
    ///
    /// The payer is credited the full amount and every share holder is
    /// debited their share. Names that are no longer members are skipped.
    pub fn compute(group: &Group) -> BalanceSheet {
        let mut sheet = BalanceSheet::for_members(group.members.iter().map(String::as_str));

        for expense in &group.expenses {
            if !sheet.credit(&expense.paid_by, expense.amount) {
                warn!(
                    group = %group.id,
                    expense = %expense.id,
                    payer = %expense.paid_by,
                    "expense paid by a non-member; credit skipped"
                );
            }
            for (member, share) in &expense.shares {
                if !sheet.debit(member, *share) {
                    warn!(
                        group = %group.id,
                        expense = %expense.id,
                        member = %member,
                        "share held by a non-member; debit skipped"
                    );
                }
            }
        }

        debug!(
            group = %group.id,
            members = sheet.len(),
            expenses = group.expenses.len(),
            "computed balances"
        );
        sheet
    }
}
