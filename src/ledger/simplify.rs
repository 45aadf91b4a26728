use tracing::debug;

use crate::domain::settlement::{BalanceSheet, Transaction};
use crate::ledger::money::{is_negligible, round_cents, TOLERANCE};

/// Outstanding amount for one side of the matching.
#[derive(Debug)]
struct Position<'a> {
    person: &'a str,
    remaining: f64,
}

/// Greedy largest-creditor / largest-debtor matching.
///
/// Every balance is fully paid out, but the number of payments is not
/// guaranteed to be the minimum possible. The output holds at most
/// `creditors + debtors - 1` transactions.
pub struct DebtSimplifier;

impl DebtSimplifier {
    pub fn simplify(balances: &BalanceSheet) -> Vec<Transaction> {
        let mut creditors = Vec::new();
        let mut debtors = Vec::new();
        for entry in balances.iter() {
            if is_negligible(entry.amount) {
                continue;
            }
            if entry.amount > 0.0 {
                creditors.push(Position {
                    person: &entry.member,
                    remaining: entry.amount,
                });
            } else {
                debtors.push(Position {
                    person: &entry.member,
                    remaining: -entry.amount,
                });
            }
        }

        // Stable sorts: equal amounts keep member order.
        creditors.sort_by(|a, b| b.remaining.total_cmp(&a.remaining));
        debtors.sort_by(|a, b| b.remaining.total_cmp(&a.remaining));

        let mut transactions =
            Vec::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));
        let (mut ci, mut di) = (0, 0);
        while ci < creditors.len() && di < debtors.len() {
            let creditor = &mut creditors[ci];
            let debtor = &mut debtors[di];
            let amount = creditor.remaining.min(debtor.remaining);

            if amount >= TOLERANCE {
                transactions.push(Transaction::new(
                    debtor.person,
                    creditor.person,
                    round_cents(amount),
                ));
            }

            creditor.remaining -= amount;
            debtor.remaining -= amount;

            if creditor.remaining < TOLERANCE {
                ci += 1;
            }
            if debtor.remaining < TOLERANCE {
                di += 1;
            }
        }

        debug!(
            creditors = creditors.len(),
            debtors = debtors.len(),
            transactions = transactions.len(),
            "simplified debts"
        );
        transactions
    }
}
