//! Unified conversion entrypoint.
//!
//! Most callers should use [`convert_str`] (in-memory XML) or [`convert_path`] (file on
//! disk), which run extraction followed by reshaping and return a [`Conversion`] holding
//! both tables and both status messages.
//!
//! If a [`ConversionObserver`] is provided via [`ConversionOptions`], success/failure/
//! alerts are reported to it.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ConvertError, ConvertResult};
use crate::types::Table;

use super::extract::{extract_records, extract_records_bytes, Extraction};
use super::observability::{
    ConversionContext, ConversionObserver, ConversionSeverity, ConversionSource, ConversionStats,
};
use super::reshape::reshape;

/// Result of a full conversion: extraction plus (attempted) reshaping.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// The output table: reshaped wide format when eligible, the original otherwise.
    pub data: Table,
    /// The original long-format table as extracted.
    pub original: Table,
    /// Extraction status, `"Successfully parsed {N} records"`.
    pub parse_message: String,
    /// Reshape status: pivot summary or the reason the table passed through unchanged.
    pub reshape_message: String,
    /// Number of records extracted from the document.
    pub record_count: usize,
}

impl Conversion {
    /// Whether reshaping changed the table shape.
    ///
    /// This drives the `Original_Data` sheet: it is included exactly when the wide
    /// table's column count differs from the original's.
    pub fn was_pivoted(&self) -> bool {
        self.data.column_count() != self.original.column_count()
    }
}

/// Options controlling unified conversion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ConversionOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ConversionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ConversionSeverity,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: ConversionSeverity::Critical,
        }
    }
}

impl fmt::Debug for ConversionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

/// Convert XML text: extract records, then reshape when eligible.
///
/// Extraction errors abort the conversion; reshape never does — an ineligible or failed
/// pivot returns the original table with an explanatory message in
/// [`Conversion::reshape_message`].
///
/// # Examples
///
/// ```
/// use xml2xlsx::conversion::{convert_str, ConversionOptions};
///
/// # fn main() -> Result<(), xml2xlsx::ConvertError> {
/// let xml = r#"
///     <Root><DataList>
///         <TN_DT><CODE>1</CODE><Period>2020</Period><DTVAL_CO>5</DTVAL_CO></TN_DT>
///         <TN_DT><CODE>1</CODE><Period>2021</Period><DTVAL_CO>7</DTVAL_CO></TN_DT>
///         <TN_DT><CODE>1</CODE><Period>2022</Period><DTVAL_CO>9</DTVAL_CO></TN_DT>
///     </DataList></Root>
/// "#;
/// let conversion = convert_str(xml, &ConversionOptions::default())?;
/// assert_eq!(conversion.record_count, 3);
/// assert!(conversion.was_pivoted());
/// # Ok(())
/// # }
/// ```
pub fn convert_str(xml: &str, options: &ConversionOptions) -> ConvertResult<Conversion> {
    let ctx = ConversionContext {
        source: ConversionSource::Inline,
    };
    run_reported(ctx, options, || Ok(extract_records(xml)?))
}

/// Convert raw XML bytes (decoded as UTF-8).
pub fn convert_bytes(bytes: &[u8], options: &ConversionOptions) -> ConvertResult<Conversion> {
    let ctx = ConversionContext {
        source: ConversionSource::Inline,
    };
    run_reported(ctx, options, || Ok(extract_records_bytes(bytes)?))
}

/// Convert an XML file on disk.
pub fn convert_path(path: impl AsRef<Path>, options: &ConversionOptions) -> ConvertResult<Conversion> {
    let path = path.as_ref();
    let ctx = ConversionContext {
        source: ConversionSource::File(path.to_path_buf()),
    };
    run_reported(ctx, options, || {
        let bytes = fs::read(path)?;
        Ok(extract_records_bytes(&bytes)?)
    })
}

fn run_reported<F>(
    ctx: ConversionContext,
    options: &ConversionOptions,
    extract: F,
) -> ConvertResult<Conversion>
where
    F: FnOnce() -> Result<Extraction, ConvertError>,
{
    let result = extract().map(finish_conversion);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(conversion) => obs.on_success(
                &ctx,
                ConversionStats {
                    records: conversion.record_count,
                    pivoted: conversion.was_pivoted(),
                },
            ),
            Err(e) => {
                let severity = severity_for_error(e);
                obs.on_failure(&ctx, severity, e);
                if severity >= options.alert_at_or_above {
                    obs.on_alert(&ctx, severity, e);
                }
            }
        }
    }

    result
}

fn finish_conversion(extraction: Extraction) -> Conversion {
    let Extraction { table, message } = extraction;
    let record_count = table.row_count();
    let (data, reshape_message) = reshape(&table);
    Conversion {
        data,
        original: table,
        parse_message: message,
        reshape_message,
        record_count,
    }
}

fn severity_for_error(e: &ConvertError) -> ConversionSeverity {
    match e {
        // I/O failures are infrastructure problems; everything else is a rejected input.
        ConvertError::Io(_) => ConversionSeverity::Critical,
        ConvertError::Extract(_) => ConversionSeverity::Error,
        ConvertError::Xlsx(_) => ConversionSeverity::Error,
    }
}
