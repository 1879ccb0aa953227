pub mod amount;
pub mod category;
pub mod date;
pub mod document;
pub mod merchant;
pub mod money;
pub mod payroll;
pub mod period;
pub mod vocabulary;

pub use amount::{find_amounts, parse_amount, AmountToken, Sign, SignedAmount};
pub use category::{category_key, Category, CategoryId};
pub use document::{
    DocumentBuilder, ParsedDocument, TransactionFields, TransactionKind, CANONICAL_HEADERS,
};
pub use merchant::normalize_key;
pub use money::Money;
pub use payroll::PayrollSignals;
pub use period::DateRange;
pub use vocabulary::{
    has_payment_vocabulary, is_statement_boilerplate, resolve_kind, KindResolution,
};

/// Declares a function returning a lazily compiled, process-wide `Regex`.
///
/// Patterns are string literals, so a compile failure is a programming error.
#[macro_export]
macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static ::regex::Regex {
            static R: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            R.get_or_init(|| ::regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}
