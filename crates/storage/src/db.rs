use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;

use tally_core::{Balance, Category, CategoryId, Money, Transaction, TransactionDraft, TransactionKind};

pub type DbPool = Pool<Sqlite>;

pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            kind TEXT NOT NULL,
            value_cents INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (category_id) REFERENCES categories(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch the categories whose title appears in `titles`.
///
/// Returns an empty list for an empty title set without touching the
/// database.
pub async fn find_categories_by_titles(
    pool: &DbPool,
    titles: &[String],
) -> Result<Vec<Category>, sqlx::Error> {
    if titles.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; titles.len()].join(", ");
    let sql = format!("SELECT id, title FROM categories WHERE title IN ({placeholders})");

    let mut query = sqlx::query_as::<_, (i64, String)>(&sql);
    for title in titles {
        query = query.bind(title);
    }

    let rows = query.fetch_all(pool).await?;

    Ok(rows
        .into_iter()
        .map(|(id, title)| Category {
            id: Some(CategoryId(id)),
            title,
        })
        .collect())
}

/// Persist category drafts, returning the stored rows in draft order.
///
/// Creation is conflict-safe: `categories.title` is UNIQUE and an insert that
/// loses a race resolves to the already-existing row instead of failing, so
/// the same title never yields two catalog entries.
pub async fn save_categories(
    pool: &DbPool,
    drafts: &[Category],
) -> Result<Vec<Category>, sqlx::Error> {
    let mut saved = Vec::with_capacity(drafts.len());

    for draft in drafts {
        saved.push(upsert_category(pool, &draft.title).await?);
    }

    Ok(saved)
}

async fn upsert_category(pool: &DbPool, title: &str) -> Result<Category, sqlx::Error> {
    let inserted = sqlx::query_as::<_, (i64, String)>(
        "INSERT INTO categories (title) VALUES (?) ON CONFLICT(title) DO NOTHING RETURNING id, title",
    )
    .bind(title)
    .fetch_optional(pool)
    .await?;

    let (id, title) = match inserted {
        Some(row) => row,
        // Conflict: another writer created the row first; resolve to it.
        None => {
            sqlx::query_as::<_, (i64, String)>("SELECT id, title FROM categories WHERE title = ?")
                .bind(title)
                .fetch_one(pool)
                .await?
        }
    };

    Ok(Category {
        id: Some(CategoryId(id)),
        title,
    })
}

/// Persist transaction drafts in a single storage transaction.
///
/// Either every draft is stored or none is. Rows are returned with their
/// assigned identifiers, in draft order.
pub async fn save_transactions(
    pool: &DbPool,
    drafts: &[TransactionDraft],
) -> Result<Vec<Transaction>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut saved = Vec::with_capacity(drafts.len());

    for draft in drafts {
        let (id, created_at) = sqlx::query_as::<_, (i64, NaiveDateTime)>(
            "INSERT INTO transactions (title, kind, value_cents, category_id)
             VALUES (?, ?, ?, ?)
             RETURNING id, created_at",
        )
        .bind(&draft.title)
        .bind(draft.kind.as_str())
        .bind(draft.value.to_cents())
        .bind(draft.category_id.0)
        .fetch_one(&mut *tx)
        .await?;

        saved.push(Transaction {
            id,
            title: draft.title.clone(),
            kind: draft.kind,
            value: draft.value,
            category_id: draft.category_id,
            created_at: Some(created_at),
        });
    }

    tx.commit().await?;

    Ok(saved)
}

/// A stored transaction joined with its category title, for display.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub title: String,
    pub kind: TransactionKind,
    pub value: Money,
    pub category: String,
}

pub async fn list_transactions(pool: &DbPool) -> Result<Vec<LedgerEntry>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, String, String, i64, String)>(
        "SELECT t.id, t.title, t.kind, t.value_cents, c.title
         FROM transactions t
         JOIN categories c ON c.id = t.category_id
         ORDER BY t.id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, title, kind, value_cents, category)| LedgerEntry {
            id,
            title,
            kind: kind.parse().unwrap_or(TransactionKind::Outcome),
            value: Money::from_cents(value_cents),
            category,
        })
        .collect())
}

pub async fn balance(pool: &DbPool) -> Result<Balance, sqlx::Error> {
    let (income_cents, outcome_cents) = sqlx::query_as::<_, (i64, i64)>(
        "SELECT
            COALESCE(SUM(CASE WHEN kind = 'income' THEN value_cents ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN kind = 'outcome' THEN value_cents ELSE 0 END), 0)
         FROM transactions",
    )
    .fetch_one(pool)
    .await?;

    Ok(Balance {
        income: Money::from_cents(income_cents),
        outcome: Money::from_cents(outcome_cents),
    })
}
