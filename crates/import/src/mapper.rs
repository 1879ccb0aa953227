//! Classification & bucketing: Parsed Document rows in, Import Candidate
//! Rows out.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sift_core::date::parse_date;
use sift_core::{
    category_key, has_payment_vocabulary, normalize_key, parse_amount, resolve_kind, Category,
    CategoryId, Money, ParsedDocument, Sign, SignedAmount, TransactionKind,
};
use tracing::{debug, info};

use crate::config::ImportConfig;
use crate::learning::LearnedRules;
use crate::matching::{
    DuplicateDetector, ExistingRecord, ExistingRecords, MatchQuery, MatchSource, RecordMatch,
};
use crate::summary::ImportSummary;

// ── Column mapping ───────────────────────────────────────────────────────────

const DATE_HEADERS: &[&str] = &[
    "date",
    "transaction date",
    "trans date",
    "posted date",
    "posting date",
    "post date",
    "booking date",
];
const DESCRIPTION_HEADERS: &[&str] = &[
    "description",
    "transaction description",
    "original description",
    "payee",
    "merchant",
    "name",
    "details",
    "memo",
    "narrative",
];
const AMOUNT_HEADERS: &[&str] = &["amount", "transaction amount", "amount usd", "value"];
const DEBIT_HEADERS: &[&str] =
    &["debit", "debits", "debit amount", "withdrawal", "withdrawals", "money out"];
const CREDIT_HEADERS: &[&str] =
    &["credit", "credits", "credit amount", "deposit", "deposits", "money in"];
const CATEGORY_HEADERS: &[&str] = &["category", "transaction category"];
const TYPE_HEADERS: &[&str] = &["type", "transaction type", "kind"];

/// Which document column holds which field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub date_column: Option<usize>,
    pub description_column: Option<usize>,
    pub amount_column: Option<usize>,
    pub debit_column: Option<usize>,
    pub credit_column: Option<usize>,
    pub category_column: Option<usize>,
    pub type_column: Option<usize>,
}

impl ColumnMapping {
    /// Locates columns by header synonym, ignoring case and punctuation.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Self {
        let keys: Vec<String> = headers.iter().map(|h| category_key(h.as_ref())).collect();
        let find = |synonyms: &[&str]| {
            keys.iter().position(|k| synonyms.iter().any(|s| *s == k.as_str()))
        };
        let containing = |word: &str, skip: &[Option<usize>]| {
            keys.iter()
                .enumerate()
                .position(|(i, k)| !skip.contains(&Some(i)) && k.split(' ').any(|w| w == word))
        };

        let debit_column = find(DEBIT_HEADERS);
        let credit_column = find(CREDIT_HEADERS);
        Self {
            date_column: find(DATE_HEADERS).or_else(|| containing("date", &[])),
            description_column: find(DESCRIPTION_HEADERS),
            amount_column: find(AMOUNT_HEADERS)
                .or_else(|| containing("amount", &[debit_column, credit_column])),
            debit_column,
            credit_column,
            category_column: find(CATEGORY_HEADERS),
            type_column: find(TYPE_HEADERS),
        }
    }

    /// A single amount column wins. Otherwise a debit is money out and a
    /// credit is money in.
    fn amount(&self, row: &[String]) -> Option<SignedAmount> {
        let single = parse_amount(cell(row, self.amount_column));
        if single.is_some() {
            return single;
        }
        let debit = parse_amount(cell(row, self.debit_column)).filter(|a| !a.magnitude.is_zero());
        let credit = parse_amount(cell(row, self.credit_column)).filter(|a| !a.magnitude.is_zero());
        match (debit, credit) {
            (Some(d), _) => Some(SignedAmount::new(d.magnitude, Sign::Negative)),
            (None, Some(c)) => Some(SignedAmount::new(c.magnitude, Sign::Positive)),
            (None, None) => None,
        }
    }
}

fn cell(row: &[String], column: Option<usize>) -> &str {
    column.and_then(|i| row.get(i)).map_or("", |s| s.trim())
}

fn lookup_category(categories: &[Category], hint: &str) -> Option<CategoryId> {
    let key = category_key(hint);
    if key.is_empty() {
        return None;
    }
    categories.iter().find(|c| category_key(&c.name) == key).map(|c| c.id)
}

// ── Candidate rows ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportBucket {
    Ready,
    PossibleMatch,
    PossibleDuplicate,
    NeedsMoreData,
    Payment,
}

impl fmt::Display for ImportBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportBucket::Ready => "ready",
            ImportBucket::PossibleMatch => "possible_match",
            ImportBucket::PossibleDuplicate => "possible_duplicate",
            ImportBucket::NeedsMoreData => "needs_more_data",
            ImportBucket::Payment => "payment",
        };
        f.write_str(name)
    }
}

/// A classified, bucketed proposal for one Parsed Document row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCandidateRow {
    /// Index of the row in the Parsed Document.
    pub source_row: usize,
    /// `None` when the date field could not be parsed.
    pub date: Option<NaiveDate>,
    pub description: String,
    pub raw_description: String,
    pub amount: Money,
    pub kind: TransactionKind,
    pub selected_category: Option<CategoryId>,
    pub source_merchant_key: String,
    pub bucket: ImportBucket,
    pub is_blocked: bool,
    pub include_in_import: bool,
    pub is_missing_required_data: bool,
    pub final_amount: Money,
    pub matched: Option<RecordMatch>,
}

impl ImportCandidateRow {
    /// Applies a reviewer's include/exclude decision. Including a matched or
    /// duplicate row unblocks it; a row missing required data can never be
    /// included. Returns the resulting `include_in_import`.
    pub fn override_inclusion(&mut self, include: bool) -> bool {
        if include && self.is_missing_required_data {
            return false;
        }
        if include {
            self.is_blocked = false;
        }
        self.include_in_import = include;
        self.include_in_import
    }
}

// ── Mapper ───────────────────────────────────────────────────────────────────

/// Everything the mapper reads besides the document. All borrowed; nothing is
/// written back.
#[derive(Debug, Clone, Copy)]
pub struct ImportContext<'a> {
    pub categories: &'a [Category],
    pub existing: ExistingRecords<'a>,
    pub learned_rules: &'a LearnedRules,
}

impl<'a> ImportContext<'a> {
    pub fn new(categories: &'a [Category], learned_rules: &'a LearnedRules) -> Self {
        Self { categories, existing: ExistingRecords::default(), learned_rules }
    }

    pub fn with_expenses(mut self, expenses: &'a [ExistingRecord]) -> Self {
        self.existing.expenses = expenses;
        self
    }

    pub fn with_planned_expenses(mut self, planned: &'a [ExistingRecord]) -> Self {
        self.existing.planned_expenses = planned;
        self
    }

    pub fn with_incomes(mut self, incomes: &'a [ExistingRecord]) -> Self {
        self.existing.incomes = incomes;
        self
    }
}

#[derive(Default)]
pub struct ImportMapper {
    detector: DuplicateDetector,
}

impl ImportMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &ImportConfig) -> Self {
        Self { detector: DuplicateDetector::new(config.matching) }
    }

    /// One candidate per document row, in document order. Rows are
    /// independent: an existing record may match several rows.
    pub fn map(
        &self,
        document: &ParsedDocument,
        context: &ImportContext<'_>,
    ) -> Vec<ImportCandidateRow> {
        let columns = ColumnMapping::detect(document.headers());
        debug!(?columns, "column mapping");

        let rows: Vec<ImportCandidateRow> = document
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| self.map_row(i, row, &columns, context))
            .collect();

        let summary = ImportSummary::tally(&rows);
        info!(
            total = summary.total,
            ready = summary.ready,
            payment = summary.payment,
            possible_match = summary.possible_match,
            possible_duplicate = summary.possible_duplicate,
            needs_more_data = summary.needs_more_data,
            included = summary.included,
            "import mapped"
        );
        rows
    }

    fn map_row(
        &self,
        source_row: usize,
        row: &[String],
        columns: &ColumnMapping,
        context: &ImportContext<'_>,
    ) -> ImportCandidateRow {
        let raw_description = cell(row, columns.description_column).to_string();
        let type_field = cell(row, columns.type_column);
        let parsed = columns.amount(row);
        let date = parse_date(cell(row, columns.date_column));

        let sign = parsed.map_or(Sign::Unsigned, |a| a.sign);
        let resolution =
            resolve_kind(TransactionKind::from_hint(type_field), sign, &raw_description);
        let by_vocabulary = resolution.by_vocabulary
            || (resolution.kind == TransactionKind::Income && has_payment_vocabulary(type_field));

        let source_merchant_key = normalize_key(&raw_description);
        let rule = context.learned_rules.get(&source_merchant_key);
        let selected_category =
            lookup_category(context.categories, cell(row, columns.category_column))
                .or_else(|| rule.and_then(|r| r.preferred_category));
        let description = rule
            .and_then(|r| r.preferred_display_name.clone())
            .unwrap_or_else(|| raw_description.clone());

        let amount = parsed.map(|a| a.magnitude).filter(|m| !m.is_zero());
        let is_missing_required_data =
            amount.is_none() || date.is_none() || raw_description.is_empty();

        let matched = date.zip(amount).and_then(|(date, amount)| {
            let query =
                MatchQuery { date, amount, kind: resolution.kind, category: selected_category };
            self.detector.find(&query, &context.existing)
        });

        // First match wins; a duplicate outranks everything.
        let bucket = match matched.map(|m| m.source) {
            Some(MatchSource::PlannedExpense) => ImportBucket::PossibleDuplicate,
            Some(MatchSource::Expense | MatchSource::Income) => ImportBucket::PossibleMatch,
            None if by_vocabulary => ImportBucket::Payment,
            None if is_missing_required_data || selected_category.is_none() => {
                ImportBucket::NeedsMoreData
            }
            None => ImportBucket::Ready,
        };
        let is_blocked = bucket == ImportBucket::PossibleDuplicate;
        let include_in_import = matches!(bucket, ImportBucket::Ready | ImportBucket::Payment)
            && !is_blocked
            && !is_missing_required_data;

        debug!(
            row = source_row,
            %bucket,
            kind = %resolution.kind,
            merchant_key = %source_merchant_key,
            include_in_import,
            "candidate row"
        );

        let amount = amount.unwrap_or_else(Money::zero);
        ImportCandidateRow {
            source_row,
            date,
            description,
            raw_description,
            amount,
            kind: resolution.kind,
            selected_category,
            source_merchant_key,
            bucket,
            is_blocked,
            include_in_import,
            is_missing_required_data,
            final_amount: amount,
            matched,
        }
    }
}

/// Maps a document against host snapshots with exact `(date, amount)` matching.
pub fn map(
    document: &ParsedDocument,
    categories: &[Category],
    existing_expenses: &[ExistingRecord],
    existing_planned_expenses: &[ExistingRecord],
    existing_incomes: &[ExistingRecord],
    learned_rules: &LearnedRules,
) -> Vec<ImportCandidateRow> {
    let context = ImportContext::new(categories, learned_rules)
        .with_expenses(existing_expenses)
        .with_planned_expenses(existing_planned_expenses)
        .with_incomes(existing_incomes);
    ImportMapper::new().map(document, &context)
}
