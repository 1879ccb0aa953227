use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sift_core::{CategoryId, Money, TransactionKind};

/// One row of an existing-record snapshot supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingRecord {
    pub date: NaiveDate,
    pub amount: Money,
    pub category: Option<CategoryId>,
}

impl ExistingRecord {
    pub fn new(date: NaiveDate, amount: Money) -> Self {
        Self { date, amount, category: None }
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    PlannedExpense,
    Expense,
    Income,
}

/// The existing record a candidate row collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMatch {
    pub source: MatchSource,
    /// Position in the snapshot slice for `source`.
    pub index: usize,
    /// `None` when either side has no category.
    pub category_agrees: Option<bool>,
    /// How many records in `source` matched. More than one is ambiguous.
    pub candidates: usize,
}

impl RecordMatch {
    pub fn is_ambiguous(&self) -> bool {
        self.candidates > 1 || self.category_agrees == Some(false)
    }
}

/// Exact date and amount unless widened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub date_window_days: i64,
    pub amount_tolerance_cents: i64,
}

/// Read-only snapshots of what the host has already recorded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistingRecords<'a> {
    pub planned_expenses: &'a [ExistingRecord],
    pub expenses: &'a [ExistingRecord],
    pub incomes: &'a [ExistingRecord],
}

/// The candidate side of a comparison.
#[derive(Debug, Clone, Copy)]
pub struct MatchQuery {
    pub date: NaiveDate,
    pub amount: Money,
    pub kind: TransactionKind,
    pub category: Option<CategoryId>,
}

#[derive(Debug, Default)]
pub struct DuplicateDetector {
    pub config: MatchConfig,
}

impl DuplicateDetector {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Planned expenses are checked first and regardless of kind; a hit there
    /// means the row was already budgeted. Otherwise the recorded snapshot of
    /// the row's own kind is checked.
    pub fn find(&self, query: &MatchQuery, existing: &ExistingRecords<'_>) -> Option<RecordMatch> {
        self.best_in(query, existing.planned_expenses, MatchSource::PlannedExpense)
            .or_else(|| match query.kind {
                TransactionKind::Expense => {
                    self.best_in(query, existing.expenses, MatchSource::Expense)
                }
                TransactionKind::Income => {
                    self.best_in(query, existing.incomes, MatchSource::Income)
                }
            })
    }

    fn best_in(
        &self,
        query: &MatchQuery,
        records: &[ExistingRecord],
        source: MatchSource,
    ) -> Option<RecordMatch> {
        let hits: Vec<(usize, i64, Option<bool>)> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let date_diff = self.score_pair(query, record)?;
                let agrees = query.category.zip(record.category).map(|(a, b)| a == b);
                Some((index, date_diff, agrees))
            })
            .collect();

        // Category is a tie-breaker only: agreeing beats unknown beats disagreeing.
        let (index, _, category_agrees) =
            hits.iter().copied().min_by_key(|&(index, date_diff, agrees)| {
                let rank = match agrees {
                    Some(true) => 0,
                    None => 1,
                    Some(false) => 2,
                };
                (rank, date_diff, index)
            })?;
        Some(RecordMatch { source, index, category_agrees, candidates: hits.len() })
    }

    /// Returns the date distance in days if the pair clears both tolerances.
    fn score_pair(&self, query: &MatchQuery, record: &ExistingRecord) -> Option<i64> {
        let diff = (query.amount.as_decimal() - record.amount.as_decimal()).abs();
        if diff > Money::from_cents(self.config.amount_tolerance_cents).as_decimal() {
            return None;
        }
        let date_diff = (query.date - record.date).num_days().abs();
        (date_diff <= self.config.date_window_days).then_some(date_diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rec(date: NaiveDate, cents: i64) -> ExistingRecord {
        ExistingRecord::new(date, Money::from_cents(cents))
    }

    fn query(kind: TransactionKind, category: Option<i64>) -> MatchQuery {
        MatchQuery {
            date: d(2024, 1, 15),
            amount: Money::from_cents(4999),
            kind,
            category: category.map(CategoryId),
        }
    }

    fn find_default(
        existing: &ExistingRecords<'_>,
        kind: TransactionKind,
        category: Option<i64>,
    ) -> Option<RecordMatch> {
        DuplicateDetector::default().find(&query(kind, category), existing)
    }

    #[test]
    fn exact_match_same_date_and_amount() {
        let expenses = [rec(d(2024, 1, 15), 4999)];
        let existing = ExistingRecords { expenses: &expenses, ..Default::default() };
        let hit = find_default(&existing, TransactionKind::Expense, None).unwrap();
        assert_eq!(hit.source, MatchSource::Expense);
        assert_eq!(hit.index, 0);
        assert_eq!(hit.category_agrees, None);
        assert!(!hit.is_ambiguous());
    }

    #[test]
    fn no_match_different_amount_or_date() {
        let expenses = [rec(d(2024, 1, 15), 5000), rec(d(2024, 1, 16), 4999)];
        let existing = ExistingRecords { expenses: &expenses, ..Default::default() };
        assert!(find_default(&existing, TransactionKind::Expense, None).is_none());
    }

    #[test]
    fn window_and_tolerance_widen_matching() {
        let expenses = [rec(d(2024, 1, 17), 5000)];
        let existing = ExistingRecords { expenses: &expenses, ..Default::default() };
        let detector =
            DuplicateDetector::new(MatchConfig { date_window_days: 3, amount_tolerance_cents: 1 });
        assert!(detector.find(&query(TransactionKind::Expense, None), &existing).is_some());
    }

    #[test]
    fn recorded_match_is_kind_aware() {
        let incomes = [rec(d(2024, 1, 15), 4999)];
        let existing = ExistingRecords { incomes: &incomes, ..Default::default() };
        let detector = DuplicateDetector::default();
        assert!(detector.find(&query(TransactionKind::Expense, None), &existing).is_none());
        let hit = detector.find(&query(TransactionKind::Income, None), &existing).unwrap();
        assert_eq!(hit.source, MatchSource::Income);
    }

    #[test]
    fn planned_expenses_win_over_recorded() {
        let planned = [rec(d(2024, 1, 15), 4999)];
        let expenses = [rec(d(2024, 1, 15), 4999)];
        let existing = ExistingRecords {
            planned_expenses: &planned,
            expenses: &expenses,
            ..Default::default()
        };
        let hit = find_default(&existing, TransactionKind::Income, None).unwrap();
        assert_eq!(hit.source, MatchSource::PlannedExpense);
    }

    // ── Category tie-breaking ────────────────────────────────────────────────

    #[test]
    fn agreeing_category_breaks_ties() {
        let expenses = [
            rec(d(2024, 1, 15), 4999).with_category(CategoryId(2)),
            rec(d(2024, 1, 15), 4999),
            rec(d(2024, 1, 15), 4999).with_category(CategoryId(1)),
        ];
        let existing = ExistingRecords { expenses: &expenses, ..Default::default() };
        let hit = find_default(&existing, TransactionKind::Expense, Some(1)).unwrap();
        assert_eq!(hit.index, 2);
        assert_eq!(hit.category_agrees, Some(true));
        assert_eq!(hit.candidates, 3);
        assert!(hit.is_ambiguous());
    }

    #[test]
    fn disagreeing_category_still_matches() {
        let expenses = [rec(d(2024, 1, 15), 4999).with_category(CategoryId(2))];
        let existing = ExistingRecords { expenses: &expenses, ..Default::default() };
        let hit = find_default(&existing, TransactionKind::Expense, Some(1)).unwrap();
        assert_eq!(hit.category_agrees, Some(false));
        assert!(hit.is_ambiguous());
    }

    #[test]
    fn closest_date_wins_within_window() {
        let expenses = [rec(d(2024, 1, 12), 4999), rec(d(2024, 1, 14), 4999)];
        let existing = ExistingRecords { expenses: &expenses, ..Default::default() };
        let detector =
            DuplicateDetector::new(MatchConfig { date_window_days: 3, ..Default::default() });
        let hit = detector.find(&query(TransactionKind::Expense, None), &existing).unwrap();
        assert_eq!(hit.index, 1);
    }

    // ── Extreme amounts ──────────────────────────────────────────────────────

    #[test]
    fn amounts_beyond_whole_cents_compare_without_overflow() {
        let huge = sift_core::parse_amount("$79228162514264337593543950335").unwrap().magnitude;
        let planned = [ExistingRecord::new(d(2024, 1, 15), huge), rec(d(2024, 1, 15), 4999)];
        let existing = ExistingRecords { planned_expenses: &planned, ..Default::default() };
        let hit = find_default(&existing, TransactionKind::Expense, None).unwrap();
        assert_eq!(hit.index, 1);

        let big_query = MatchQuery { amount: huge, ..query(TransactionKind::Expense, None) };
        let detector = DuplicateDetector::new(MatchConfig {
            amount_tolerance_cents: i64::MAX,
            ..Default::default()
        });
        assert!(detector.find(&big_query, &existing).is_some());
    }
}
