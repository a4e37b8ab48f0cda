//! Monthly report figures derived from store query results.
//!
//! The store only sums transactions per category and kind. The functions in
//! this module turn those query results into the figures a report shows:
//! income, expense and balance totals, each category's share of the month's
//! expenses, and a per-category income/expense/net table.

use serde::Serialize;

use crate::{
    category::CategoryName,
    database_id::CategoryId,
    summary::CategorySummaryRow,
    transaction::{TransactionKind, TransactionWithCategory},
};

/// Income, expenses and the balance between them for a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthlyTotals {
    /// The sum of all income.
    pub income: f64,
    /// The sum of all expenses.
    pub expenses: f64,
    /// Income minus expenses.
    pub balance: f64,
}

impl MonthlyTotals {
    /// Sum `transactions` by kind.
    pub fn from_transactions(transactions: &[TransactionWithCategory]) -> Self {
        let mut totals = Self::default();

        for row in transactions {
            match row.transaction.kind {
                TransactionKind::Income => totals.income += row.transaction.amount,
                TransactionKind::Expense => totals.expenses += row.transaction.amount,
            }
        }

        totals.balance = totals.income - totals.expenses;
        totals
    }
}

/// A category summary row with its percentage of the month's expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseShare {
    /// The summary row the share was calculated for.
    #[serde(flatten)]
    pub row: CategorySummaryRow,
    /// `row.total` as a percentage of all expenses in the month.
    pub percentage: f64,
}

/// Calculate each summary row's share of the total expenses.
///
/// Every row is expressed relative to the expense total, including income
/// rows. When there are no expenses all percentages are zero. Row order is
/// preserved.
pub fn expense_shares(rows: &[CategorySummaryRow]) -> Vec<ExpenseShare> {
    let total_expenses: f64 = rows
        .iter()
        .filter(|row| row.kind == TransactionKind::Expense)
        .map(|row| row.total)
        .sum();

    rows.iter()
        .map(|row| {
            let percentage = if total_expenses > 0.0 {
                row.total / total_expenses * 100.0
            } else {
                0.0
            };

            ExpenseShare {
                row: row.clone(),
                percentage,
            }
        })
        .collect()
}

/// One category's income, expenses and net amount for a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryReportRow {
    /// The name of the category.
    pub category_name: CategoryName,
    /// The category's income.
    pub income: f64,
    /// The category's expenses.
    pub expenses: f64,
    /// Income minus expenses.
    pub net: f64,
}

/// Merge the per-kind summary rows into one row per category.
///
/// Categories appear in the order they are first seen in `rows`.
pub fn category_report(rows: &[CategorySummaryRow]) -> Vec<CategoryReportRow> {
    let mut report: Vec<(CategoryId, CategoryReportRow)> = Vec::new();

    for row in rows {
        let index = match report.iter().position(|(id, _)| *id == row.category_id) {
            Some(index) => index,
            None => {
                report.push((
                    row.category_id,
                    CategoryReportRow {
                        category_name: row.category_name.clone(),
                        income: 0.0,
                        expenses: 0.0,
                        net: 0.0,
                    },
                ));
                report.len() - 1
            }
        };

        let (_, entry) = &mut report[index];
        match row.kind {
            TransactionKind::Income => entry.income += row.total,
            TransactionKind::Expense => entry.expenses += row.total,
        }
        entry.net = entry.income - entry.expenses;
    }

    report.into_iter().map(|(_, row)| row).collect()
}

/// Format an amount with exactly two decimal places, e.g. `1234.50`.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        category::CategoryName,
        report::{MonthlyTotals, category_report, expense_shares, format_amount},
        summary::CategorySummaryRow,
        transaction::{Transaction, TransactionKind, TransactionWithCategory},
    };

    fn summary_row(id: i64, name: &str, kind: TransactionKind, total: f64) -> CategorySummaryRow {
        CategorySummaryRow {
            category_id: id,
            category_name: CategoryName::new_unchecked(name),
            color: "#000000".to_owned(),
            kind,
            total,
        }
    }

    fn listed(id: i64, amount: f64, kind: TransactionKind) -> TransactionWithCategory {
        TransactionWithCategory {
            transaction: Transaction {
                id,
                amount,
                category_id: 1,
                date: date!(2024 - 03 - 01),
                description: None,
                kind,
            },
            category_name: CategoryName::new_unchecked("Food"),
            category_color: "#FF6B6B".to_owned(),
        }
    }

    #[test]
    fn monthly_totals_sum_by_kind() {
        let transactions = vec![
            listed(1, 100.0, TransactionKind::Income),
            listed(2, 30.0, TransactionKind::Expense),
            listed(3, 20.0, TransactionKind::Expense),
        ];

        let totals = MonthlyTotals::from_transactions(&transactions);

        assert_eq!(
            totals,
            MonthlyTotals {
                income: 100.0,
                expenses: 50.0,
                balance: 50.0
            }
        );
    }

    #[test]
    fn monthly_totals_of_nothing_are_zero() {
        assert_eq!(MonthlyTotals::from_transactions(&[]), MonthlyTotals::default());
    }

    #[test]
    fn balance_can_be_negative() {
        let totals = MonthlyTotals::from_transactions(&[listed(1, 75.0, TransactionKind::Expense)]);

        assert_eq!(totals.balance, -75.0);
    }

    #[test]
    fn shares_are_relative_to_expenses() {
        let rows = vec![
            summary_row(1, "Rent", TransactionKind::Expense, 75.0),
            summary_row(2, "Food", TransactionKind::Expense, 25.0),
        ];

        let percentages: Vec<f64> = expense_shares(&rows)
            .into_iter()
            .map(|share| share.percentage)
            .collect();

        assert_eq!(percentages, vec![75.0, 25.0]);
    }

    #[test]
    fn shares_are_zero_without_expenses() {
        let rows = vec![summary_row(8, "Salary", TransactionKind::Income, 1000.0)];

        let shares = expense_shares(&rows);

        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].percentage, 0.0);
    }

    #[test]
    fn report_merges_kinds_per_category() {
        let rows = vec![
            summary_row(1, "A", TransactionKind::Income, 100.0),
            summary_row(2, "B", TransactionKind::Expense, 60.0),
            summary_row(1, "A", TransactionKind::Expense, 50.0),
        ];

        let report = category_report(&rows);

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].category_name.as_ref(), "A");
        assert_eq!(report[0].income, 100.0);
        assert_eq!(report[0].expenses, 50.0);
        assert_eq!(report[0].net, 50.0);
        assert_eq!(report[1].category_name.as_ref(), "B");
        assert_eq!(report[1].income, 0.0);
        assert_eq!(report[1].net, -60.0);
    }

    #[test]
    fn formats_two_decimal_places() {
        assert_eq!(format_amount(50.0), "50.00");
        assert_eq!(format_amount(1234.5), "1234.50");
        assert_eq!(format_amount(0.129), "0.13");
    }
}
