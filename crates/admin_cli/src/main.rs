use std::{error::Error, fs::File, io};

use clap::{Args, Parser, Subcommand};
use engine::{CategoryTable, Engine, EngineError, ExpenseRecord};
use migration::{DEFAULT_DATABASE_URL, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "kakeibo_admin")]
#[command(about = "Admin utilities for the kakeibo expense ledger")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the most recent expenses.
    List(ListArgs),
    /// Delete a single expense.
    Delete(DeleteArgs),
    /// Write expenses as CSV.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Category code (e.g. `F`) or label (e.g. `Food`).
    #[arg(long)]
    category: Option<String>,
    #[arg(long, default_value_t = 20)]
    limit: u64,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    #[arg(long)]
    category: String,
    /// Exact `recorded_at` value as shown by `list`. When several expenses
    /// share it, the last one recorded is deleted.
    #[arg(long)]
    recorded_at: String,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[arg(long)]
    category: Option<String>,
    /// Output file; stdout when omitted.
    #[arg(long)]
    output: Option<String>,
}

/// Codes and labels of the default table are resolved, anything else is
/// taken as a label verbatim so custom deployments can still be queried.
fn category_label(raw: &str) -> String {
    CategoryTable::default()
        .resolve(raw)
        .map(ToString::to_string)
        .unwrap_or_else(|| raw.trim().to_string())
}

fn write_csv<W: io::Write>(
    writer: W,
    records: &[ExpenseRecord],
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build();

    match cli.command {
        Command::List(args) => {
            let label = args.category.as_deref().map(category_label);
            let records = engine
                .list_expenses(label.as_deref(), Some(args.limit))
                .await?;
            if records.is_empty() {
                println!("no expenses");
            }
            for record in records {
                println!(
                    "{}\t{}\t{}\t{}",
                    record.recorded_at, record.category_label, record.amount, record.user_id
                );
            }
        }
        Command::Delete(args) => {
            let label = category_label(&args.category);
            match engine.delete_expense(&label, &args.recorded_at).await {
                Ok(()) => println!("deleted expense: {label} @ {}", args.recorded_at),
                Err(err @ EngineError::KeyNotFound(_)) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Export(args) => {
            let label = args.category.as_deref().map(category_label);
            let records = engine.list_expenses(label.as_deref(), None).await?;
            match args.output {
                Some(path) => {
                    write_csv(File::create(&path)?, &records)?;
                    eprintln!("exported {} expenses to {path}", records.len());
                }
                None => write_csv(io::stdout().lock(), &records)?,
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_accepts_code_label_or_custom() {
        assert_eq!(category_label("f"), "Food");
        assert_eq!(category_label("transportation"), "Transportation");
        assert_eq!(category_label(" Eating out "), "Eating out");
    }

    #[test]
    fn csv_has_header_and_rows() {
        let records = vec![ExpenseRecord {
            category_label: "Food".to_string(),
            amount: 250,
            recorded_at: "2024-05-01 09:00:00.000000".to_string(),
            user_id: "U1".to_string(),
        }];
        let mut out = Vec::new();
        write_csv(&mut out, &records).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "category_label,amount,recorded_at,user_id\nFood,250,2024-05-01 09:00:00.000000,U1\n"
        );
    }

    #[test]
    fn cli_parses_delete() {
        let cli = Cli::try_parse_from([
            "kakeibo_admin",
            "--database-url",
            "sqlite::memory:",
            "delete",
            "--category",
            "F",
            "--recorded-at",
            "2024-05-01 09:00:00.000000",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Delete(_)));
    }
}
