use thiserror::Error;

/// Convenience result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Error type returned by the record extractor.
///
/// Extraction is all-or-nothing: any of these aborts the whole conversion and no partial
/// table is visible to the caller.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Input is not well-formed XML; carries the underlying parser detail.
    #[error("malformed XML: {0}")]
    Malformed(#[from] roxmltree::Error),

    /// No `DataList` container element found under either namespace resolution.
    #[error("No DataList found in XML")]
    MissingContainer,

    /// Container found but it holds zero `TN_DT` record elements.
    #[error("No data records found")]
    NoRecords,

    /// Any other extraction failure (e.g. input bytes are not valid UTF-8).
    #[error("{0}")]
    Other(String),
}

/// Error type for the full conversion pipeline (extract + workbook output).
///
/// Reshape failures are deliberately absent: the reshaper degrades to the original table
/// instead of erroring.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Underlying I/O error (e.g. input file not found, output directory not writable).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Record extraction failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Workbook serialization failed.
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
