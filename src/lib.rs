//! `xml2xlsx` converts a semi-structured XML export (a flat list of typed records) into a
//! reshaped tabular XLSX workbook, pivoting long-format time-series data into wide format
//! (one column per period) when the data qualifies.
//!
//! The primary entrypoints are [`conversion::convert_str`] (in-memory XML) and
//! [`conversion::convert_path`] (a file on disk). Both run record extraction followed by
//! pivot reshaping and return a [`conversion::Conversion`]; the workbook layer serializes
//! that into the three-sheet artifact.
//!
//! ## Pipeline
//!
//! 1. **Extraction** ([`conversion::extract`]): parse the XML, locate the `DataList`
//!    container (with or without the publisher namespace), flatten every `TN_DT` record
//!    into a row, align columns in first-seen order, and coerce the numeric columns
//!    per-cell. Malformed or empty documents abort the conversion.
//! 2. **Reshaping** ([`conversion::reshape`]): if `Period`/`DTVAL_CO` columns and at least
//!    one identifier column are present, and more than one period occurs, pivot to one
//!    column per period with stable first-wins aggregation. Never fails hard: ineligible
//!    data passes through unchanged with an explanatory message.
//! 3. **Workbook** ([`workbook`]): `Data` + `Metadata` sheets, plus `Original_Data`
//!    exactly when reshaping changed the column count.
//!
//! ## Quick example
//!
//! ```
//! use xml2xlsx::conversion::{convert_str, ConversionOptions};
//! use xml2xlsx::workbook::workbook_to_bytes;
//!
//! # fn main() -> Result<(), xml2xlsx::ConvertError> {
//! let xml = r#"
//!     <Root><DataList>
//!         <TN_DT><CODE>A1</CODE><Period>2020</Period><DTVAL_CO>5</DTVAL_CO></TN_DT>
//!         <TN_DT><CODE>A1</CODE><Period>2021</Period><DTVAL_CO>7</DTVAL_CO></TN_DT>
//!     </DataList></Root>
//! "#;
//!
//! let conversion = convert_str(xml, &ConversionOptions::default())?;
//! assert_eq!(conversion.parse_message, "Successfully parsed 2 records");
//!
//! let xlsx = workbook_to_bytes(&conversion, None)?;
//! assert!(!xlsx.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`conversion`]: extraction, reshaping, unified entrypoints, observers
//! - [`types`]: tagged cell values and the fixed-schema table
//! - [`workbook`]: three-sheet XLSX serialization
//! - [`error`]: error types used across conversion

pub mod conversion;
pub mod error;
pub mod types;
pub mod workbook;

pub use error::{ConvertError, ConvertResult, ExtractError};
