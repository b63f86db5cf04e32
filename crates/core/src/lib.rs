pub mod category;
pub mod money;
pub mod transaction;

pub use category::{Category, CategoryId};
pub use money::Money;
pub use transaction::{Balance, Transaction, TransactionDraft, TransactionKind};
