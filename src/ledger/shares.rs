//! Turns an expense amount and split instructions into per-member shares.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::expense::{Shares, SplitRule};
use crate::errors::ValidationError;
use crate::ledger::money::{approx_eq, is_valid_amount, round_cents, FULL_PERCENTAGE};

pub struct ShareCalculator;

impl ShareCalculator {
    /// Computes the shares for `amount` among `members` minus `excluded`.
    ///
    /// Fails without producing anything when the amount is not positive, an
    /// excluded or percentage entry names a non-member, nobody is left to
    /// pay, or percentages do not total 100.
    pub fn compute(
        amount: f64,
        rule: &SplitRule,
        members: &[String],
        excluded: &BTreeSet<String>,
    ) -> Result<Shares, ValidationError> {
        if !is_valid_amount(amount) {
            return Err(ValidationError::NonPositiveAmount(amount));
        }
        if let Some(stranger) = excluded.iter().find(|name| !members.contains(name)) {
            return Err(ValidationError::UnknownMember(stranger.clone()));
        }
        let included = included_members(members, excluded);
        match rule {
            SplitRule::Equal => Self::equal(amount, &included),
            SplitRule::Percentage(percentages) => {
                Self::percentage(amount, percentages, members, &included)
            }
        }
    }

    /// Splits `amount` evenly across `included`.
    pub fn equal(amount: f64, included: &[&str]) -> Result<Shares, ValidationError> {
        if included.is_empty() {
            return Err(ValidationError::NoIncludedMembers);
        }
        let share = amount / included.len() as f64;
        Ok(included
            .iter()
            .map(|member| (member.to_string(), share))
            .collect())
    }

    /// Assigns every included member its percentage of `amount`.
    ///
    /// Percentages entered for excluded members are ignored. Included members
    /// without an entry count as 0%. The total may miss 100 by up to one
    /// cent; shares are scaled by the actual total so they still add up to
    /// `amount`.
    pub fn percentage(
        amount: f64,
        percentages: &BTreeMap<String, f64>,
        members: &[String],
        included: &[&str],
    ) -> Result<Shares, ValidationError> {
        if included.is_empty() {
            return Err(ValidationError::NoIncludedMembers);
        }
        if let Some(stranger) = percentages.keys().find(|name| !members.contains(name)) {
            return Err(ValidationError::UnknownMember(stranger.clone()));
        }

        let mut total = 0.0;
        for member in included {
            let value = percentages.get(*member).copied().unwrap_or(0.0);
            if !value.is_finite() || !(0.0..=FULL_PERCENTAGE).contains(&value) {
                return Err(ValidationError::PercentageOutOfRange {
                    member: member.to_string(),
                    value,
                });
            }
            total += value;
        }
        if !approx_eq(total, FULL_PERCENTAGE) {
            return Err(ValidationError::PercentageTotal { total });
        }

        Ok(included
            .iter()
            .map(|member| {
                let value = percentages.get(*member).copied().unwrap_or(0.0);
                (member.to_string(), amount * value / total)
            })
            .collect())
    }

    /// Spreads 100% evenly over the included members, rounded to cents.
    /// The last included member absorbs the rounding remainder so the
    /// suggestion always totals 100. Used to prefill percentage inputs.
    pub fn suggest_percentages(
        members: &[String],
        excluded: &BTreeSet<String>,
    ) -> BTreeMap<String, f64> {
        let included = included_members(members, excluded);
        let Some((last, rest)) = included.split_last() else {
            return BTreeMap::new();
        };
        let each = round_cents(FULL_PERCENTAGE / included.len() as f64);
        let remainder = round_cents(FULL_PERCENTAGE - each * rest.len() as f64);
        rest.iter()
            .map(|member| (member.to_string(), each))
            .chain(std::iter::once((last.to_string(), remainder)))
            .collect()
    }
}

fn included_members<'a>(members: &'a [String], excluded: &BTreeSet<String>) -> Vec<&'a str> {
    members
        .iter()
        .filter(|member| !excluded.contains(*member))
        .map(String::as_str)
        .collect()
}
