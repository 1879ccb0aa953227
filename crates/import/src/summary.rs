use std::fmt;

use serde::Serialize;
use sift_core::{Money, TransactionKind};

use crate::mapper::{ImportBucket, ImportCandidateRow};

/// Per-bucket counts for a review screen, always tallied from mapped rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub ready: usize,
    pub payment: usize,
    pub possible_match: usize,
    pub possible_duplicate: usize,
    pub needs_more_data: usize,
    pub included: usize,
    pub included_expenses: Money,
    pub included_income: Money,
}

impl ImportSummary {
    pub fn tally(rows: &[ImportCandidateRow]) -> Self {
        rows.iter().fold(Self::default(), |mut s, row| {
            s.total += 1;
            match row.bucket {
                ImportBucket::Ready => s.ready += 1,
                ImportBucket::Payment => s.payment += 1,
                ImportBucket::PossibleMatch => s.possible_match += 1,
                ImportBucket::PossibleDuplicate => s.possible_duplicate += 1,
                ImportBucket::NeedsMoreData => s.needs_more_data += 1,
            }
            if row.include_in_import {
                s.included += 1;
                let total = match row.kind {
                    TransactionKind::Expense => &mut s.included_expenses,
                    TransactionKind::Income => &mut s.included_income,
                };
                *total = *total + row.final_amount;
            }
            s
        })
    }

    pub fn count(&self, bucket: ImportBucket) -> usize {
        match bucket {
            ImportBucket::Ready => self.ready,
            ImportBucket::Payment => self.payment,
            ImportBucket::PossibleMatch => self.possible_match,
            ImportBucket::PossibleDuplicate => self.possible_duplicate,
            ImportBucket::NeedsMoreData => self.needs_more_data,
        }
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ready / {} payments / ", self.ready, self.payment)?;
        write!(
            f,
            "{} possible matches / {} possible duplicates / {} need more data",
            self.possible_match, self.possible_duplicate, self.needs_more_data
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::CategoryId;

    fn row(
        bucket: ImportBucket,
        kind: TransactionKind,
        cents: i64,
        include: bool,
    ) -> ImportCandidateRow {
        ImportCandidateRow {
            source_row: 0,
            date: None,
            description: "X".into(),
            raw_description: "X".into(),
            amount: Money::from_cents(cents),
            kind,
            selected_category: Some(CategoryId(1)),
            source_merchant_key: "X".into(),
            bucket,
            is_blocked: bucket == ImportBucket::PossibleDuplicate,
            include_in_import: include,
            is_missing_required_data: false,
            final_amount: Money::from_cents(cents),
            matched: None,
        }
    }

    #[test]
    fn empty_tally() {
        let s = ImportSummary::tally(&[]);
        assert_eq!(s, ImportSummary::default());
        assert_eq!(
            s.to_string(),
            "0 ready / 0 payments / 0 possible matches / 0 possible duplicates / 0 need more data"
        );
    }

    #[test]
    fn counts_buckets_and_included_totals() {
        let rows = [
            row(ImportBucket::Ready, TransactionKind::Expense, 4544, true),
            row(ImportBucket::Ready, TransactionKind::Expense, 2078, true),
            row(ImportBucket::Payment, TransactionKind::Income, 103_027, true),
            row(ImportBucket::PossibleDuplicate, TransactionKind::Expense, 500, false),
            row(ImportBucket::NeedsMoreData, TransactionKind::Expense, 100, false),
        ];
        let s = ImportSummary::tally(&rows);
        assert_eq!(s.total, 5);
        assert_eq!(s.count(ImportBucket::Ready), 2);
        assert_eq!(s.count(ImportBucket::PossibleDuplicate), 1);
        assert_eq!(s.count(ImportBucket::PossibleMatch), 0);
        assert_eq!(s.included, 3);
        assert_eq!(s.included_expenses, Money::from_cents(6622));
        assert_eq!(s.included_income, Money::from_cents(103_027));
    }
}
