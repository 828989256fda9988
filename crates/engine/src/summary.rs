//! Spending aggregation for the summary endpoint.

use crate::history::TransactionRecord;

/// The dominant spending category for a user and its total outflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DominantSpending {
    pub category: String,
    pub total_cents: i64,
}

/// Sums absolute outflow per category and picks the largest total.
///
/// Only categorized records with a negative amount count as spending;
/// deposits and incoming transfers never do. Ties go to the category whose
/// total was established first: totals accumulate in first-seen order and
/// the maximum is taken with a strictly-greater comparison.
pub fn dominant_spending<'a, I>(records: I) -> Option<DominantSpending>
where
    I: Iterator<Item = &'a TransactionRecord>,
{
    let mut totals: Vec<(String, i64)> = Vec::new();

    for record in records {
        let Some(category) = &record.category else {
            continue;
        };
        if record.amount_cents >= 0 {
            continue;
        }
        let spend = record.amount_cents.abs();
        match totals.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => *total += spend,
            None => totals.push((category.clone(), spend)),
        }
    }

    let mut dominant: Option<DominantSpending> = None;
    for (category, total_cents) in totals {
        let beats = dominant
            .as_ref()
            .is_none_or(|best| total_cents > best.total_cents);
        if beats {
            dominant = Some(DominantSpending {
                category,
                total_cents,
            });
        }
    }
    dominant
}
