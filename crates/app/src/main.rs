use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tally", about = "Categorised transaction ledger", version)]
struct Cli {
    /// Path to the ledger database (defaults to the platform data directory)
    #[arg(long, value_name = "PATH", global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import transactions from a CSV file, deleting it on success
    Import {
        /// CSV file with title, type, value and category columns
        file: PathBuf,
    },
    /// List stored transactions
    List {
        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Show income, outcome and total
    Balance,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let db_path = match cli.db {
        Some(path) => path,
        None => default_db_path()?,
    };
    tracing::debug!("using database {}", db_path.display());

    let db = tally_storage::create_db(&db_path)
        .await
        .with_context(|| format!("could not open database at {}", db_path.display()))?;

    match cli.command {
        Command::Import { file } => {
            let transactions = tally_import::import_file(&db, &file)
                .await
                .with_context(|| format!("import of {} failed", file.display()))?;
            println!("Imported {} transactions", transactions.len());
        }
        Command::List { json } => {
            let entries = tally_storage::list_transactions(&db).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in &entries {
                    println!(
                        "{:>5}  {:<7}  {:>12}  {:<18}  {}",
                        entry.id,
                        entry.kind.as_str(),
                        entry.value.to_string(),
                        entry.category,
                        entry.title,
                    );
                }
            }
        }
        Command::Balance => {
            let balance = tally_storage::balance(&db).await?;
            println!("Income:  {}", balance.income);
            println!("Outcome: {}", balance.outcome);
            println!("Total:   {}", balance.total());
        }
    }

    Ok(())
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "tally", "Tally")
        .context("could not determine the application data directory")?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("could not create {}", data_dir.display()))?;
    Ok(data_dir.join("ledger.db"))
}
