//! Conversion core: extraction, reshaping, and the unified entrypoints.
//!
//! Most callers should use [`convert_str`] or [`convert_path`] (from [`unified`]) which:
//!
//! - extract the XML record list into an in-memory [`crate::types::Table`]
//! - reshape it into wide format when the data qualifies as panel data
//! - optionally report success/failure/alerts to a [`ConversionObserver`]
//!
//! The individual stages are also available under:
//! - [`extract`]
//! - [`reshape`]

pub mod extract;
pub mod observability;
pub mod reshape;
pub mod unified;

pub use extract::{
    extract_records, extract_records_bytes, Extraction, DEFAULT_NAMESPACE, NUMERIC_COLUMNS,
};
pub use observability::{
    CompositeObserver, ConversionContext, ConversionObserver, ConversionSeverity,
    ConversionSource, ConversionStats, FileObserver, StdErrObserver,
};
pub use reshape::{reshape, IDENTIFIER_COLUMNS, PERIOD_COLUMN, VALUE_COLUMN};
pub use unified::{convert_bytes, convert_path, convert_str, Conversion, ConversionOptions};
