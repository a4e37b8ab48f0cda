//! The ledger store: one open SQLite database holding categories and transactions.

use std::path::Path;

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    category::{
        Category, NewCategory, create_category, get_all_categories, get_category,
        insert_category_if_absent,
    },
    database_id::{CategoryId, TransactionId},
    db::initialize,
    month::YearMonth,
    summary::{CategorySummaryRow, get_category_summary},
    transaction::{
        Transaction, TransactionKind, TransactionWithCategory, count_transactions,
        create_transaction, delete_transaction, get_all_transactions, get_transaction,
        get_transactions_in_month,
    },
};

/// Durable storage for categories and transactions.
///
/// A store owns a single connection for its whole lifetime. Construct one
/// with [LedgerStore::open] and hand out references to whatever needs it,
/// then release it with [LedgerStore::close].
#[derive(Debug)]
pub struct LedgerStore {
    connection: Connection,
}

impl LedgerStore {
    /// Open the ledger stored at `path`, creating the file, tables and
    /// default categories as needed.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the file cannot be opened or the
    /// schema cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        tracing::debug!("Opening ledger at {path:?}");

        Self::from_connection(Connection::open(path)?)
    }

    /// Open a ledger that only lives in memory.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an already open connection, initializing the schema on it.
    pub fn from_connection(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self { connection })
    }

    /// Close the underlying database connection.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if SQLite could not close the database.
    pub fn close(self) -> Result<(), Error> {
        self.connection
            .close()
            .map_err(|(_connection, error)| Error::from(error))?;

        tracing::debug!("Closed ledger");

        Ok(())
    }

    /// Record a transaction and return its new ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] if `amount` is not greater than zero,
    /// - or [Error::InvalidCategory] if `category_id` does not refer to a category,
    /// - or [Error::SqlError] if there is some other SQL error.
    ///
    /// Nothing is stored when an error is returned.
    pub fn add_transaction(
        &self,
        amount: f64,
        category_id: CategoryId,
        date: Date,
        description: Option<&str>,
        kind: TransactionKind,
    ) -> Result<TransactionId, Error> {
        let builder = Transaction::build(amount, category_id, date)
            .description(description)
            .kind(kind);

        create_transaction(builder, &self.connection).map(|transaction| transaction.id)
    }

    /// Every transaction with its category, most recent first.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if any stored date is not in the
    /// `YYYY-MM-DD` form.
    pub fn list_all(&self) -> Result<Vec<TransactionWithCategory>, Error> {
        get_all_transactions(&self.connection)
    }

    /// The transactions dated in `month` of `year`, most recent first.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] or [Error::InvalidYear] for out of range
    /// input. A month without transactions is not an error.
    pub fn list_by_month(
        &self,
        year: i32,
        month: u8,
    ) -> Result<Vec<TransactionWithCategory>, Error> {
        get_transactions_in_month(YearMonth::new(year, month)?, &self.connection)
    }

    /// Totals per (category, kind) for `month` of `year`, largest first.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] or [Error::InvalidYear] for out of range
    /// input. A month without transactions is not an error.
    pub fn category_summary(&self, year: i32, month: u8) -> Result<Vec<CategorySummaryRow>, Error> {
        get_category_summary(YearMonth::new(year, month)?, &self.connection)
    }

    /// All categories ordered by name.
    pub fn list_categories(&self) -> Result<Vec<Category>, Error> {
        get_all_categories(&self.connection)
    }

    /// Delete a transaction. Deleting a missing transaction is a no-op.
    ///
    /// Returns whether a transaction was removed.
    pub fn delete_transaction(&self, id: TransactionId) -> Result<bool, Error> {
        delete_transaction(id, &self.connection)
    }

    /// Create a category.
    ///
    /// # Errors
    /// Returns [Error::DuplicateCategoryName] if the name is taken.
    pub fn create_category(&self, category: NewCategory) -> Result<Category, Error> {
        create_category(category, &self.connection)
    }

    /// Create a category unless the name is taken, in which case `None` is
    /// returned.
    pub fn insert_category_if_absent(&self, category: NewCategory) -> Result<Option<Category>, Error> {
        insert_category_if_absent(category, &self.connection)
    }

    /// Get a category by ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such category.
    pub fn get_category(&self, id: CategoryId) -> Result<Category, Error> {
        get_category(id, &self.connection)
    }

    /// Get a transaction by ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such transaction.
    pub fn get_transaction(&self, id: TransactionId) -> Result<Transaction, Error> {
        get_transaction(id, &self.connection)
    }

    /// The number of stored transactions.
    pub fn count_transactions(&self) -> Result<u32, Error> {
        count_transactions(&self.connection)
    }
}
