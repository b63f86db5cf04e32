use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use tally_core::{Category, Transaction, TransactionDraft};
use tally_storage::{save_transactions, DbPool};

use crate::csv::{read_rows, CsvError, RawRecord};
use crate::reconcile::reconcile_categories;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
    /// Reconciliation postcondition violated: a referenced category name has
    /// no resolved entry. Indicates a bug, not a recoverable condition.
    #[error("no category resolved for '{title}'")]
    UnresolvedCategory { title: String },
}

/// Import every valid transaction from the CSV file at `path`.
///
/// Rows are drained from the file, their categories reconciled against the
/// catalog (missing ones created exactly once each), and the resulting drafts
/// persisted in a single bulk save. On success the source file is deleted;
/// deletion is best-effort and a failure there never masks the already
/// persisted result. Returns the stored transactions in input-row order.
pub async fn import_file(db: &DbPool, path: &Path) -> Result<Vec<Transaction>, ImportError> {
    let rows = read_rows(path).await?;
    let names: Vec<String> = rows.iter().map(|row| row.category.clone()).collect();

    let resolved = reconcile_categories(db, &names).await?;
    let drafts = build_drafts(&rows, &resolved)?;
    let transactions = save_transactions(db, &drafts).await?;

    tracing::info!(
        "imported {} transactions from {}",
        transactions.len(),
        path.display()
    );

    if let Err(error) = tokio::fs::remove_file(path).await {
        tracing::warn!("could not remove source file {}: {error}", path.display());
    }

    Ok(transactions)
}

/// Pair each raw row with its resolved category reference.
fn build_drafts(
    rows: &[RawRecord],
    resolved: &HashMap<String, Category>,
) -> Result<Vec<TransactionDraft>, ImportError> {
    rows.iter()
        .map(|row| {
            let category_id = resolved
                .get(&row.category)
                .and_then(|category| category.id)
                .ok_or_else(|| ImportError::UnresolvedCategory {
                    title: row.category.clone(),
                })?;

            Ok(TransactionDraft {
                title: row.title.clone(),
                kind: row.kind,
                value: row.value,
                category_id,
            })
        })
        .collect()
}
