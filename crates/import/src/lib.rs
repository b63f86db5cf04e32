pub mod csv;
pub mod reconcile;
pub mod service;

pub use csv::{CsvError, RawRecord};
pub use reconcile::reconcile_categories;
pub use service::{import_file, ImportError};
