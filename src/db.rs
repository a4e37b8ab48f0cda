//! Schema setup for the ledger database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    category::{create_category_table, seed_default_categories},
    transaction::create_transaction_table,
};

/// Enable the connection settings the ledger relies on.
///
/// SQLite does not enforce foreign keys unless asked to, and the pragma must
/// be set outside of a transaction.
pub fn configure_connection(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    Ok(())
}

/// Create the ledger tables if they do not exist and seed the default
/// categories.
///
/// Safe to call on an existing ledger: tables are only created when missing
/// and seed categories that already exist are skipped.
///
/// # Errors
/// Returns an [Error::SqlError] if the schema cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    configure_connection(connection)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    let seeded = seed_default_categories(&transaction)?;

    transaction.commit()?;

    tracing::debug!("Initialized ledger database, seeded {seeded} categories");

    Ok(())
}
