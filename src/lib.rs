//! District rainfall reports for the Bihar monsoon.
//!
//! Raw CSV rows are normalized into [`RainfallRecord`]s, classified into
//! IMD status categories and reconciled across two periods into
//! [`ComparisonRecord`]s for display.

pub mod classify;
pub mod columns;
pub mod config;
pub mod error;
pub mod loader;
pub mod monsoon;
pub mod output;
pub mod reconcile;
pub mod reports;
pub mod types;
pub mod util;

pub use classify::{classify, StatusCategory};
pub use columns::{normalize_columns, ColumnMap, ColumnStrategy, ExplicitColumns, HeaderHeuristic};
pub use config::{Config, Month};
pub use error::{MonsoonError, Result};
pub use reconcile::reconcile;
pub use types::{ComparisonRecord, RainfallRecord, RawRow};
pub use util::coerce_number;
