//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{
    Error,
    database_id::{CategoryId, TransactionId},
    transaction::TransactionKind,
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent or earned, always greater than zero.
    pub amount: f64,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// Whether the money was spent or earned.
    pub kind: TransactionKind,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, category_id: CategoryId, date: Date) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            category_id,
            date,
            description: None,
            kind: TransactionKind::default(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The amount, category and date are required, the description defaults to
/// `None` and the kind defaults to [TransactionKind::Expense].
///
/// # Examples
///
/// ```
/// use ledger_rs::{Transaction, TransactionKind};
/// use time::macros::date;
///
/// let builder = Transaction::build(2500.0, 8, date!(2024 - 03 - 01))
///     .description(Some("March salary"))
///     .kind(TransactionKind::Income);
///
/// assert_eq!(builder.kind, TransactionKind::Income);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction.
    ///
    /// Amounts are always positive, [TransactionBuilder::kind] determines
    /// whether the money was spent or earned.
    pub amount: f64,

    /// The category of the transaction. Must refer to an existing category.
    pub category_id: CategoryId,

    /// The date when the transaction occurred.
    pub date: Date,

    /// An optional human-readable description of the transaction.
    pub description: Option<String>,

    /// Whether the transaction is an expense or income.
    pub kind: TransactionKind,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(ToOwned::to_owned);
        self
    }

    /// Set the kind of the transaction.
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Check that `amount` is a finite number greater than zero.
///
/// # Errors
/// Returns [Error::InvalidAmount] otherwise.
pub fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

/// Parse an ISO 8601 calendar date such as `2024-03-15`.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// The amount is validated before anything is written.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is not greater than zero,
/// - or [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_amount(builder.amount)?;

    let transaction = connection
        .prepare(
            "INSERT INTO expenses (amount, category_id, date, description, type)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, amount, category_id, date, description, type",
        )?
        .query_row(
            (
                builder.amount,
                builder.category_id,
                builder.date,
                &builder.description,
                builder.kind,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory(builder.category_id),
            error => error.into(),
        })?;

    tracing::debug!(
        "Created {} transaction {} for {:.2}",
        transaction.kind,
        transaction.id,
        transaction.amount
    );

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, amount, category_id, date, description, type FROM expenses WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Delete a transaction by ID.
///
/// Deleting a transaction that does not exist is not an error. Returns whether
/// a transaction was removed.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<bool, Error> {
    let rows_affected = connection.execute("DELETE FROM expenses WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        tracing::debug!("Transaction {id} does not exist, nothing to delete");
    } else {
        tracing::debug!("Deleted transaction {id}");
    }

    Ok(rows_affected > 0)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expenses;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL CHECK(amount > 0),
                category_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                description TEXT,
                type TEXT CHECK(type IN ('expense', 'income')) DEFAULT 'expense',
                FOREIGN KEY(category_id) REFERENCES categories(id)
                )",
        (),
    )?;

    // Month queries filter on the date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    map_transaction_row_with_offset(row, 0)
}

/// Map a database row to a Transaction, starting from column `offset`.
///
/// Expects the columns id, amount, category_id, date, description, type.
pub(crate) fn map_transaction_row_with_offset(
    row: &Row,
    offset: usize,
) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(offset)?;
    let amount = row.get(offset + 1)?;
    let category_id = row.get(offset + 2)?;
    let date = row.get(offset + 3)?;
    let description = row.get(offset + 4)?;
    let kind = row.get(offset + 5)?;

    Ok(Transaction {
        id,
        amount,
        category_id,
        date,
        description,
        kind,
    })
}

// ============================================================================
// TESTS
// ============================================================================
