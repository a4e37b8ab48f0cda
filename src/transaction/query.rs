//! Database queries for listing transactions with their category.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::CategoryName,
    month::YearMonth,
    transaction::{Transaction, core::map_transaction_row_with_offset},
};

/// A transaction joined with the name and color of its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionWithCategory {
    /// The stored transaction.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// The name of the category the transaction belongs to.
    pub category_name: CategoryName,
    /// The display color of the category.
    pub category_color: String,
}

const SELECT_WITH_CATEGORY: &str = "SELECT e.id, e.amount, e.category_id, e.date, e.description, e.type, c.name, c.color \
    FROM expenses e \
    INNER JOIN categories c ON e.category_id = c.id";

// Most recent first, then newest insert first for transactions on the same day.
const ORDER_MOST_RECENT_FIRST: &str = "ORDER BY e.date DESC, e.id DESC";

/// Get every transaction, most recent first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
/// Dates must be stored as `YYYY-MM-DD`, a single row with any other date
/// format fails the whole listing.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<TransactionWithCategory>, Error> {
    let query = format!("{SELECT_WITH_CATEGORY} {ORDER_MOST_RECENT_FIRST}");

    connection
        .prepare(&query)?
        .query_map([], map_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Get the transactions dated within `year_month`, most recent first.
///
/// Dates are matched on their year and month components only, so every day
/// of the month is included. Returns an empty vector when nothing matches.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub fn get_transactions_in_month(
    year_month: YearMonth,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    let query = format!(
        "{SELECT_WITH_CATEGORY} \
        WHERE strftime('%Y', e.date) = ?1 AND strftime('%m', e.date) = ?2 \
        {ORDER_MOST_RECENT_FIRST}"
    );

    connection
        .prepare(&query)?
        .query_map([year_month.year_key(), year_month.month_key()], map_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

fn map_row(row: &Row) -> Result<TransactionWithCategory, rusqlite::Error> {
    let transaction = map_transaction_row_with_offset(row, 0)?;
    let raw_name: String = row.get(6)?;
    let category_color: Option<String> = row.get(7)?;

    Ok(TransactionWithCategory {
        transaction,
        category_name: CategoryName::new_unchecked(&raw_name),
        category_color: category_color.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{CategoryName, NewCategory, create_category},
        db::initialize,
        month::YearMonth,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{get_all_transactions, get_transactions_in_month};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn get_all_joins_category_name_and_color() {
        let conn = get_test_connection();
        let category = create_category(
            NewCategory::new(CategoryName::new_unchecked("Books")).color("#ABCDEF"),
            &conn,
        )
        .unwrap();
        let created = create_transaction(
            Transaction::build(50.0, category.id, date!(2024 - 03 - 15))
                .description(Some("test"))
                .kind(TransactionKind::Expense),
            &conn,
        )
        .unwrap();

        let got = get_all_transactions(&conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].transaction, created);
        assert_eq!(got[0].category_name, category.name);
        assert_eq!(got[0].category_color, "#ABCDEF");
    }

    #[test]
    fn get_all_orders_by_date_then_insertion_descending() {
        let conn = get_test_connection();
        let older = create_transaction(Transaction::build(1.0, 1, date!(2024 - 01 - 01)), &conn)
            .unwrap();
        let same_day_first =
            create_transaction(Transaction::build(2.0, 1, date!(2024 - 05 - 05)), &conn).unwrap();
        let same_day_second =
            create_transaction(Transaction::build(3.0, 1, date!(2024 - 05 - 05)), &conn).unwrap();
        let newest = create_transaction(Transaction::build(4.0, 1, date!(2024 - 12 - 31)), &conn)
            .unwrap();

        let ids: Vec<i64> = get_all_transactions(&conn)
            .unwrap()
            .into_iter()
            .map(|row| row.transaction.id)
            .collect();

        assert_eq!(
            ids,
            vec![newest.id, same_day_second.id, same_day_first.id, older.id]
        );
    }

    #[test]
    fn get_all_on_empty_database_returns_empty_vec() {
        let conn = get_test_connection();

        assert_eq!(get_all_transactions(&conn).unwrap(), vec![]);
    }

    #[test]
    fn get_all_fails_on_date_that_is_not_iso_formatted() {
        let conn = get_test_connection();
        conn.execute(
            "INSERT INTO expenses (amount, category_id, date, type) VALUES (5.0, 1, '2024-3-5', 'expense')",
            (),
        )
        .unwrap();

        let got = get_all_transactions(&conn);

        assert!(
            matches!(got, Err(Error::SqlError(_))),
            "want SQL error, got {got:?}"
        );
    }

    #[test]
    fn month_filter_skips_date_that_is_not_iso_formatted() {
        let conn = get_test_connection();
        conn.execute(
            "INSERT INTO expenses (amount, category_id, date, type) VALUES (5.0, 1, '2024-3-5', 'expense')",
            (),
        )
        .unwrap();

        let got = get_transactions_in_month(YearMonth::new(2024, 3).unwrap(), &conn);

        assert_eq!(got, Ok(vec![]));
    }

    #[test]
    fn month_filter_returns_only_that_month_most_recent_first() {
        let conn = get_test_connection();
        create_transaction(Transaction::build(1.0, 1, date!(2024 - 01 - 15)), &conn).unwrap();
        let early_feb =
            create_transaction(Transaction::build(2.0, 1, date!(2024 - 02 - 10)), &conn).unwrap();
        let late_feb =
            create_transaction(Transaction::build(3.0, 1, date!(2024 - 02 - 28)), &conn).unwrap();

        let got = get_transactions_in_month(YearMonth::new(2024, 2).unwrap(), &conn).unwrap();

        let ids: Vec<i64> = got.iter().map(|row| row.transaction.id).collect();
        assert_eq!(ids, vec![late_feb.id, early_feb.id]);
    }

    #[test]
    fn month_filter_does_not_cross_years() {
        let conn = get_test_connection();
        create_transaction(Transaction::build(1.0, 1, date!(2023 - 02 - 15)), &conn).unwrap();
        let wanted =
            create_transaction(Transaction::build(2.0, 1, date!(2024 - 02 - 15)), &conn).unwrap();

        let got = get_transactions_in_month(YearMonth::new(2024, 2).unwrap(), &conn).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].transaction, wanted);
    }

    #[test]
    fn month_filter_includes_first_and_last_day() {
        let conn = get_test_connection();
        create_transaction(Transaction::build(1.0, 1, date!(2024 - 03 - 01)), &conn).unwrap();
        create_transaction(Transaction::build(2.0, 1, date!(2024 - 03 - 31)), &conn).unwrap();
        create_transaction(Transaction::build(3.0, 1, date!(2024 - 04 - 01)), &conn).unwrap();

        let got = get_transactions_in_month(YearMonth::new(2024, 3).unwrap(), &conn).unwrap();

        assert_eq!(got.len(), 2);
    }

    #[test]
    fn month_filter_with_no_matches_returns_empty_vec() {
        let conn = get_test_connection();
        create_transaction(Transaction::build(1.0, 1, date!(2024 - 01 - 15)), &conn).unwrap();

        let got = get_transactions_in_month(YearMonth::new(2024, 6).unwrap(), &conn).unwrap();

        assert!(got.is_empty());
    }
}
