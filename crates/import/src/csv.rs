use rust_decimal::Decimal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use tally_core::{Money, TransactionKind};

/// A validated line from the source file, ready for reconciliation.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub title: String,
    pub kind: TransactionKind,
    pub value: Money,
    pub category: String,
}

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("row reader task failed: {0}")]
    ReaderTask(#[from] tokio::task::JoinError),
}

/// Read every valid row from the file at `path`, in file order.
///
/// The file is decoded on a blocking task that pushes rows through a bounded
/// channel; this function drains the channel to completion before the reader
/// result is inspected, so a parse failure anywhere in the stream fails the
/// whole read. The first line is a header and is skipped; rows missing a
/// required field are dropped.
pub async fn read_rows(path: &Path) -> Result<Vec<RawRecord>, CsvError> {
    let (tx, mut rx) = mpsc::channel(64);
    let reader = spawn_row_reader(path.to_path_buf(), tx);

    let mut rows = Vec::new();
    while let Some(row) = rx.recv().await {
        rows.push(row);
    }

    reader.await??;

    Ok(rows)
}

fn spawn_row_reader(
    path: PathBuf,
    rows: mpsc::Sender<RawRecord>,
) -> JoinHandle<Result<(), CsvError>> {
    tokio::task::spawn_blocking(move || {
        let file = File::open(&path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        for result in reader.records() {
            let record = result?;

            let Some(row) = parse_record(&record) else {
                continue;
            };

            // Receiver gone means the caller gave up; stop reading.
            if rows.blocking_send(row).is_err() {
                break;
            }
        }

        Ok(())
    })
}

fn parse_record(record: &csv::StringRecord) -> Option<RawRecord> {
    let title = record.get(0).unwrap_or_default().trim();
    let kind = record.get(1).unwrap_or_default().trim();
    let value = record.get(2).unwrap_or_default().trim();
    let category = record.get(3).unwrap_or_default().trim();

    if title.is_empty() || kind.is_empty() || value.is_empty() || category.is_empty() {
        tracing::debug!("skipping row with missing fields: {record:?}");
        return None;
    }

    let Ok(kind) = kind.parse::<TransactionKind>() else {
        tracing::debug!("skipping row with unknown kind '{kind}'");
        return None;
    };

    let Ok(value) = parse_amount(value) else {
        tracing::debug!("skipping row with unparseable value '{value}'");
        return None;
    };

    Some(RawRecord {
        title: title.to_string(),
        kind,
        value,
        category: category.to_string(),
    })
}

fn parse_amount(s: &str) -> Result<Money, CsvError> {
    let s = s.trim();
    let (negative, s) = if s.starts_with('(') && s.ends_with(')') {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };
    let s = s.replace([',', '$', ' '], "");
    let mut dec = Decimal::from_str(&s).map_err(|_| CsvError::InvalidAmount(s.to_string()))?;
    if negative {
        dec = -dec;
    }
    Ok(Money::from_decimal(dec))
}
