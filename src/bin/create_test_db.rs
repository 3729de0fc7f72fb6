use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use ledger_api::{
    Amount, Transaction, initialize_db,
    stores::{SQLiteTransactionStore, TransactionStore},
};

/// A utility for creating a test database for the transaction ledger API.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The user that owns the sample transactions.
    #[arg(long, short, default_value = "demo_user")]
    user_id: String,
}

/// Title, amount in cents, category and age in days of each sample transaction.
const SAMPLE_LEDGER: &[(&str, i64, &str, i64)] = &[
    ("Salary", 350_000, "Income", 28),
    ("Rent", -150_000, "Housing", 27),
    ("Groceries", -12_345, "Food & Drinks", 20),
    ("Electricity", -8_990, "Utilities", 14),
    ("Freelance work", 45_000, "Income", 9),
    ("Movie tickets", -3_200, "Entertainment", 5),
    ("Bus fare", -450, "Transport", 2),
    ("Coffee", -450, "Food & Drinks", 0),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample transactions for {}...", args.user_id);

    let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)));
    let now = OffsetDateTime::now_utc();

    for &(title, cents, category, age_in_days) in SAMPLE_LEDGER {
        let builder = Transaction::build(&args.user_id, title, Amount::from_cents(cents), category)
            .created_at(Some(now - Duration::days(age_in_days)));

        store.create(builder)?;
    }

    println!("Created {} transactions.", store.count()?);
    println!("Success!");

    Ok(())
}
