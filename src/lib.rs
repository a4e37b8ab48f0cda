//! Ledger is a single-user personal finance tracker.
//!
//! This library provides the persistence and aggregation layer: a SQLite backed
//! [LedgerStore] that records income and expense transactions against
//! categories and rolls them up by category, kind and calendar month.
//!
//! ```no_run
//! use ledger_rs::{LedgerStore, TransactionKind};
//! use time::macros::date;
//!
//! # fn main() -> Result<(), ledger_rs::Error> {
//! let store = LedgerStore::open("expenses.db")?;
//! let food = store.list_categories()?.remove(0);
//!
//! store.add_transaction(12.5, food.id, date!(2024 - 03 - 15), Some("lunch"), TransactionKind::Expense)?;
//!
//! for row in store.category_summary(2024, 3)? {
//!     println!("{} {} {:.2}", row.category_name, row.kind, row.total);
//! }
//!
//! store.close()
//! # }
//! ```

#![warn(missing_docs)]

mod category;
mod database_id;
mod db;
mod month;
pub mod report;
mod store;
mod summary;
mod transaction;

pub use category::{
    Category, CategoryName, DEFAULT_CATEGORIES, DEFAULT_CATEGORY_COLOR, NewCategory,
};
pub use database_id::{CategoryId, TransactionId};
pub use store::LedgerStore;
pub use summary::CategorySummaryRow;
pub use transaction::{
    Transaction, TransactionBuilder, TransactionKind, TransactionWithCategory, parse_date,
    validate_amount,
};

/// The errors that may occur when using the ledger.
///
/// Errors fall into three groups: validation errors are raised before
/// anything reaches storage, integrity errors are constraint violations
/// reported by the database, and everything else is an unexpected SQL error.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction amount was zero, negative or not a finite number.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// A transaction kind other than "expense" or "income" was given.
    #[error("\"{0}\" is not a valid transaction kind, expected \"expense\" or \"income\"")]
    InvalidKind(String),

    /// A month number outside of 1 to 12 was given.
    #[error("{0} is not a valid month, expected a number from 1 to 12")]
    InvalidMonth(u8),

    /// A year that cannot be written with four digits was given.
    #[error("{0} is not a valid year, expected a number from 0 to 9999")]
    InvalidYear(i32),

    /// A date string could not be parsed as an ISO 8601 calendar date.
    #[error("could not parse \"{0}\" as a date, expected the format YYYY-MM-DD")]
    InvalidDate(String),

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The category ID used to create a transaction did not match a category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// A category with the same name already exists.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// The requested record was not found.
    ///
    /// Internally, this error occurs when a query returns no rows.
    #[error("the requested record could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl Error {
    /// Whether the error was caused by malformed input that was rejected
    /// before reaching storage.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidAmount(_)
                | Error::InvalidKind(_)
                | Error::InvalidMonth(_)
                | Error::InvalidYear(_)
                | Error::InvalidDate(_)
                | Error::EmptyCategoryName
        )
    }

    /// Whether the error was caused by a storage constraint violation.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            Error::InvalidCategory(_) | Error::DuplicateCategoryName(_)
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
