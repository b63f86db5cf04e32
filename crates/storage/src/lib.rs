pub mod db;

pub use db::{
    balance, create_db, find_categories_by_titles, list_transactions, save_categories,
    save_transactions, DbPool, LedgerEntry,
};
