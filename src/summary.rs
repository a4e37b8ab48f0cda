//! Monthly totals per category and transaction kind.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error, category::CategoryName, database_id::CategoryId, month::YearMonth,
    transaction::TransactionKind,
};

/// The summed amount of one category's transactions of one kind in a month.
///
/// A category with both expenses and income in the same month produces two
/// rows, one per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummaryRow {
    /// The ID of the category.
    pub category_id: CategoryId,
    /// The name of the category.
    pub category_name: CategoryName,
    /// The display color of the category.
    pub color: String,
    /// Whether `total` sums expenses or income.
    pub kind: TransactionKind,
    /// The sum of the transaction amounts.
    pub total: f64,
}

/// Sum the transactions in `year_month` by category and kind.
///
/// Rows are ordered by total, largest first. Equal totals are ordered by
/// category ID and then kind. Returns an empty vector when the month has no
/// transactions.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub fn get_category_summary(
    year_month: YearMonth,
    connection: &Connection,
) -> Result<Vec<CategorySummaryRow>, Error> {
    connection
        .prepare(
            "SELECT c.id, c.name, c.color, e.type, SUM(e.amount) AS total
             FROM expenses e
             INNER JOIN categories c ON e.category_id = c.id
             WHERE strftime('%Y', e.date) = ?1 AND strftime('%m', e.date) = ?2
             GROUP BY c.id, e.type
             ORDER BY total DESC, c.id ASC, e.type ASC",
        )?
        .query_map([year_month.year_key(), year_month.month_key()], map_row)?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}

fn map_row(row: &Row) -> Result<CategorySummaryRow, rusqlite::Error> {
    let raw_name: String = row.get(1)?;
    let color: Option<String> = row.get(2)?;

    Ok(CategorySummaryRow {
        category_id: row.get(0)?,
        category_name: CategoryName::new_unchecked(&raw_name),
        color: color.unwrap_or_default(),
        kind: row.get(3)?,
        total: row.get(4)?,
    })
}
