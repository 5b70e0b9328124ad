pub mod products;
pub mod query;
pub mod reviews;

use std::path::PathBuf;

use rusqlite::types::Value;

pub use products::ProductsDb;
pub use query::{CatalogQuery, FilterOptions};
pub use reviews::ReviewsDb;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database not available at {}", .0.display())]
    Unavailable(PathBuf),

    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Text rendering of a loosely typed column.
pub(crate) fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Blob(_) => None,
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(r) => Some(r.to_string()),
        Value::Text(s) => Some(s),
    }
}

pub(crate) fn value_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Real(r) => Some(*r),
        Value::Text(s) => s.trim().parse().ok(),
        Value::Null | Value::Blob(_) => None,
    }
}
