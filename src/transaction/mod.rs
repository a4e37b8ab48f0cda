//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The `TransactionKind` that marks a transaction as an expense or income
//! - Database functions for storing, listing and deleting transactions

mod core;
mod kind;
mod query;

pub use self::core::{
    Transaction, TransactionBuilder, count_transactions, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, parse_date, validate_amount,
};
pub use kind::TransactionKind;
pub use query::{TransactionWithCategory, get_all_transactions, get_transactions_in_month};
