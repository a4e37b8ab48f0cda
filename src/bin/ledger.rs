use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use clap::{Parser, Subcommand};
use serde::Serialize;
use time::{Date, OffsetDateTime};
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use ledger_rs::{
    CategoryId, CategoryName, LedgerStore, NewCategory, TransactionKind, TransactionWithCategory,
    parse_date,
    report::{MonthlyTotals, category_report, expense_shares, format_amount},
    validate_amount,
};

/// Record income and expenses and view monthly summaries.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the ledger SQLite database.
    #[arg(long, default_value = "expenses.db")]
    db_path: PathBuf,

    /// Print results as JSON instead of tables.
    #[arg(long)]
    json: bool,

    /// Append debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new transaction.
    Add {
        /// The amount of money, must be greater than zero.
        #[arg(long, value_parser = parse_amount, allow_negative_numbers = true)]
        amount: f64,

        /// The category ID or name.
        #[arg(long)]
        category: String,

        /// The date of the transaction as YYYY-MM-DD, defaults to today.
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<Date>,

        /// What the transaction was for.
        #[arg(long)]
        description: Option<String>,

        /// Either "expense" or "income".
        #[arg(long, default_value = "expense")]
        kind: TransactionKind,
    },
    /// List every transaction, most recent first.
    List,
    /// List the transactions in a month, most recent first.
    Month { year: i32, month: u8 },
    /// Show the totals per category for a month with each category's share of expenses.
    Summary { year: i32, month: u8 },
    /// Show income, expenses and balance for a month along with a per-category breakdown.
    Report { year: i32, month: u8 },
    /// List the categories.
    Categories,
    /// Add a category.
    AddCategory {
        /// The unique category name.
        name: String,

        /// The display color, e.g. "#4ECDC4".
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a transaction by ID.
    Delete { id: i64 },
}

fn main() -> ExitCode {
    let args = Args::parse();

    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Nothing more can be reported if stderr is unwritable.
            let _ = write_error(&mut io::stderr(), error.as_ref());
            ExitCode::FAILURE
        }
    }
}

fn try_main(args: Args) -> Result<(), Box<dyn Error>> {
    setup_logging(args.log_file.as_deref())?;

    let store = LedgerStore::open(&args.db_path)?;
    let result = run(&store, args.command, args.json);
    let closed = store.close();

    command_result(result, closed)
}

/// The command's error takes precedence over an error closing the ledger.
fn command_result(
    result: Result<(), Box<dyn Error>>,
    closed: Result<(), ledger_rs::Error>,
) -> Result<(), Box<dyn Error>> {
    result?;
    closed?;

    Ok(())
}

fn write_error(writer: &mut impl Write, error: &dyn Error) -> io::Result<()> {
    writeln!(writer, "Error: {error}")
}

fn run(store: &LedgerStore, command: Command, json: bool) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Add {
            amount,
            category,
            date,
            description,
            kind,
        } => {
            let category_id = resolve_category(store, &category)?;
            let date = date.unwrap_or_else(today);
            let id = store.add_transaction(amount, category_id, date, description.as_deref(), kind)?;

            if json {
                print_json(&store.get_transaction(id)?)?;
            } else {
                println!("Added {kind} transaction {id}");
            }
        }
        Command::List => print_transactions(&store.list_all()?, json)?,
        Command::Month { year, month } => {
            print_transactions(&store.list_by_month(year, month)?, json)?
        }
        Command::Summary { year, month } => {
            let shares = expense_shares(&store.category_summary(year, month)?);

            if json {
                print_json(&shares)?;
            } else {
                println!("{:<16} {:>12} {:>8} {:<8}", "Category", "Total", "Share", "Kind");
                for share in shares {
                    println!(
                        "{:<16} {:>12} {:>7.1}% {:<8}",
                        share.row.category_name,
                        format_amount(share.row.total),
                        share.percentage,
                        share.row.kind
                    );
                }
            }
        }
        Command::Report { year, month } => {
            let totals = MonthlyTotals::from_transactions(&store.list_by_month(year, month)?);
            let categories = category_report(&store.category_summary(year, month)?);

            if json {
                #[derive(Serialize)]
                struct Report {
                    totals: MonthlyTotals,
                    categories: Vec<ledger_rs::report::CategoryReportRow>,
                }

                print_json(&Report { totals, categories })?;
            } else {
                println!("Income:   {}", format_amount(totals.income));
                println!("Expenses: {}", format_amount(totals.expenses));
                println!("Balance:  {}", format_amount(totals.balance));
                println!();
                println!("{:<16} {:>12} {:>12} {:>12}", "Category", "Income", "Expenses", "Net");
                for row in categories {
                    println!(
                        "{:<16} {:>12} {:>12} {:>12}",
                        row.category_name,
                        format_amount(row.income),
                        format_amount(row.expenses),
                        format_amount(row.net)
                    );
                }
            }
        }
        Command::Categories => {
            let categories = store.list_categories()?;

            if json {
                print_json(&categories)?;
            } else {
                println!("{:>4} {:<16} {:<8}", "ID", "Name", "Color");
                for category in categories {
                    println!("{:>4} {:<16} {:<8}", category.id, category.name, category.color);
                }
            }
        }
        Command::AddCategory { name, color } => {
            let mut new_category = NewCategory::new(CategoryName::new(&name)?);
            if let Some(color) = color {
                new_category = new_category.color(&color);
            }

            let category = store.create_category(new_category)?;

            if json {
                print_json(&category)?;
            } else {
                println!("Added category {} ({})", category.name, category.id);
            }
        }
        Command::Delete { id } => {
            let removed = store.delete_transaction(id)?;

            if json {
                print_json(&serde_json::json!({ "id": id, "deleted": removed }))?;
            } else if removed {
                println!("Deleted transaction {id}");
            } else {
                println!("No transaction with ID {id}");
            }
        }
    }

    Ok(())
}

/// Find a category by ID, or by name if `category` is not the ID of a
/// category.
fn resolve_category(store: &LedgerStore, category: &str) -> Result<CategoryId, Box<dyn Error>> {
    if let Ok(id) = category.trim().parse::<CategoryId>() {
        match store.get_category(id) {
            Ok(found) => return Ok(found.id),
            Err(ledger_rs::Error::NotFound) => {}
            Err(error) => return Err(error.into()),
        }
    }

    let name = CategoryName::new(category)?;

    store
        .list_categories()?
        .into_iter()
        .find(|candidate| candidate.name == name)
        .map(|candidate| candidate.id)
        .ok_or_else(|| format!("there is no category with the ID or name \"{name}\"").into())
}

fn print_transactions(
    transactions: &[TransactionWithCategory],
    json: bool,
) -> Result<(), Box<dyn Error>> {
    if json {
        return print_json(&transactions);
    }

    println!(
        "{:>6} {:>12} {:<16} {:<10} {:<8} Description",
        "ID", "Amount", "Category", "Date", "Kind"
    );
    for row in transactions {
        let transaction = &row.transaction;
        println!(
            "{:>6} {:>12} {:<16} {:<10} {:<8} {}",
            transaction.id,
            format_amount(transaction.amount),
            row.category_name,
            transaction.date,
            transaction.kind,
            transaction.description.as_deref().unwrap_or_default()
        );
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_amount(text: &str) -> Result<f64, String> {
    let amount: f64 = text
        .parse()
        .map_err(|_| format!("\"{text}\" is not a number"))?;

    validate_amount(amount).map_err(|error| error.to_string())
}

fn parse_date_arg(text: &str) -> Result<Date, String> {
    parse_date(text).map_err(|error| error.to_string())
}

fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

fn setup_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));

    let debug_log = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use clap::Parser;
    use ledger_rs::{CategoryName, LedgerStore, NewCategory, TransactionKind};
    use time::macros::date;

    use super::{Args, Command, command_result, parse_amount, resolve_category, write_error};

    #[test]
    fn parse_amount_accepts_positive_numbers() {
        assert_eq!(parse_amount("12.50"), Ok(12.5));
    }

    #[test]
    fn parse_amount_rejects_zero_negative_and_text() {
        for text in ["0", "-5", "abc", "NaN", "inf"] {
            assert!(parse_amount(text).is_err(), "{text} should be rejected");
        }
    }

    #[test]
    fn add_rejects_negative_amount_before_opening_the_ledger() {
        let args = Args::try_parse_from(["ledger", "add", "--amount", "-5", "--category", "1"]);

        assert!(args.is_err());
    }

    #[test]
    fn add_defaults_to_expense_without_a_date() {
        let args =
            Args::try_parse_from(["ledger", "add", "--amount", "9.99", "--category", "طعام"])
                .unwrap();

        match args.command {
            Command::Add {
                amount,
                category,
                date,
                kind,
                ..
            } => {
                assert_eq!(amount, 9.99);
                assert_eq!(category, "طعام");
                assert_eq!(date, None);
                assert_eq!(kind, TransactionKind::Expense);
            }
            other => panic!("want add command, got {other:?}"),
        }
    }

    #[test]
    fn add_parses_date_and_kind() {
        let args = Args::try_parse_from([
            "ledger",
            "add",
            "--amount",
            "3000",
            "--category",
            "8",
            "--date",
            "2024-03-01",
            "--kind",
            "income",
        ])
        .unwrap();

        match args.command {
            Command::Add { date, kind, .. } => {
                assert_eq!(date, Some(date!(2024 - 03 - 01)));
                assert_eq!(kind, TransactionKind::Income);
            }
            other => panic!("want add command, got {other:?}"),
        }
    }

    #[test]
    fn add_rejects_malformed_date_and_unknown_kind() {
        let bad_date = Args::try_parse_from([
            "ledger", "add", "--amount", "1", "--category", "1", "--date", "01/03/2024",
        ]);
        let bad_kind = Args::try_parse_from([
            "ledger", "add", "--amount", "1", "--category", "1", "--kind", "transfer",
        ]);

        assert!(bad_date.is_err());
        assert!(bad_kind.is_err());
    }

    #[test]
    fn resolve_category_finds_name() {
        let store = LedgerStore::open_in_memory().unwrap();
        let food = store
            .list_categories()
            .unwrap()
            .into_iter()
            .find(|category| category.name.as_ref() == "طعام")
            .unwrap();

        assert_eq!(resolve_category(&store, "طعام").unwrap(), food.id);
    }

    #[test]
    fn resolve_category_finds_id() {
        let store = LedgerStore::open_in_memory().unwrap();

        assert_eq!(resolve_category(&store, "3").unwrap(), 3);
    }

    #[test]
    fn resolve_category_rejects_unknown_name() {
        let store = LedgerStore::open_in_memory().unwrap();

        assert!(resolve_category(&store, "Groceries").is_err());
        assert!(resolve_category(&store, "9999").is_err());
    }

    #[test]
    fn resolve_category_falls_back_to_numeric_name() {
        let store = LedgerStore::open_in_memory().unwrap();
        let category = store
            .create_category(NewCategory::new(CategoryName::new("2024").unwrap()))
            .unwrap();

        assert_eq!(resolve_category(&store, "2024").unwrap(), category.id);
    }

    #[test]
    fn command_error_wins_over_close_error() {
        let result = command_result(
            Err("command failed".into()),
            Err(ledger_rs::Error::NotFound),
        );

        assert_eq!(result.unwrap_err().to_string(), "command failed");
    }

    #[test]
    fn close_error_is_reported_after_successful_command() {
        let result = command_result(Ok(()), Err(ledger_rs::Error::NotFound));

        assert_eq!(
            result.unwrap_err().to_string(),
            ledger_rs::Error::NotFound.to_string()
        );
    }

    #[test]
    fn errors_are_written_with_their_message() {
        let error: Box<dyn Error> = ledger_rs::Error::InvalidCategory(9999).into();
        let mut output = Vec::new();

        write_error(&mut output, error.as_ref()).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Error: the category ID 9999 does not refer to a valid category\n"
        );
    }
}
