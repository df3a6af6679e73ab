//! Record extraction: raw XML text into an aligned [`Table`].
//!
//! The expected document shape is a flat list of typed records: a `DataList` container
//! holding `TN_DT` record elements, each with one child element per field. Documents may
//! use the publisher's data-contract namespace or none at all; both extract identically.

use roxmltree::{Document, Node};

use crate::error::ExtractError;
use crate::types::{Table, Value};

/// Default namespace URI the export format declares on its payload elements.
pub const DEFAULT_NAMESPACE: &str =
    "http://schemas.datacontract.org/2004/07/E1212_ServiceAPI.Models";

/// Container element holding the record list.
const CONTAINER_TAG: &str = "DataList";

/// Repeating record element inside the container.
const RECORD_TAG: &str = "TN_DT";

/// Columns coerced to numeric after alignment, when present.
pub const NUMERIC_COLUMNS: [&str; 5] = ["DTVAL_CO", "Period", "CODE", "CODE1", "CODE2"];

/// Successful extraction: the aligned table plus its status message.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Records aligned into a fixed-column table.
    pub table: Table,
    /// Human-readable status, `"Successfully parsed {N} records"`.
    pub message: String,
}

/// Extract the record list from raw XML text.
///
/// Rules:
///
/// - The `DataList` container is searched anywhere in the document: first under
///   [`DEFAULT_NAMESPACE`], then by local name with no namespace constraint.
/// - `TN_DT` record elements are collected from the container's descendants with the same
///   two-phase search.
/// - Each record's direct child elements become fields, in document order; the local tag
///   name is the field name and the text content the value. Elements with no text (empty
///   or self-closing) become [`Value::Missing`].
/// - Columns are ordered by first appearance across the whole record sequence; records
///   missing a field get [`Value::Missing`] there.
/// - [`NUMERIC_COLUMNS`] are coerced to numeric per-cell; unparseable cells become
///   [`Value::Missing`] without failing the extraction.
pub fn extract_records(xml: &str) -> Result<Extraction, ExtractError> {
    let doc = Document::parse(xml)?;

    let container = find_container(&doc).ok_or(ExtractError::MissingContainer)?;

    let records = collect_records(container);
    if records.is_empty() {
        return Err(ExtractError::NoRecords);
    }

    let mut table = align_records(records);
    for column in NUMERIC_COLUMNS {
        table.coerce_numeric_column(column);
    }

    let message = format!("Successfully parsed {} records", table.row_count());
    Ok(Extraction { table, message })
}

/// Extract from raw bytes, decoding as UTF-8 first.
///
/// Transport layers hand us bytes; anything that is not valid UTF-8 is an extraction
/// failure, not a panic.
pub fn extract_records_bytes(bytes: &[u8]) -> Result<Extraction, ExtractError> {
    let xml = std::str::from_utf8(bytes)
        .map_err(|e| ExtractError::Other(format!("input is not valid UTF-8: {e}")))?;
    extract_records(xml)
}

fn find_container<'a>(doc: &'a Document<'a>) -> Option<Node<'a, 'a>> {
    doc.descendants()
        .find(|n| n.has_tag_name((DEFAULT_NAMESPACE, CONTAINER_TAG)))
        .or_else(|| {
            doc.descendants()
                .find(|n| n.is_element() && n.tag_name().name() == CONTAINER_TAG)
        })
}

fn collect_records<'a>(container: Node<'a, 'a>) -> Vec<Vec<(String, Value)>> {
    let namespaced: Vec<Node> = container
        .descendants()
        .filter(|n| n.has_tag_name((DEFAULT_NAMESPACE, RECORD_TAG)))
        .collect();

    let elements = if namespaced.is_empty() {
        container
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == RECORD_TAG)
            .collect()
    } else {
        namespaced
    };

    elements.iter().map(|n| flatten_record(*n)).collect()
}

/// Flatten one record element into (field, value) pairs in document order.
///
/// A repeated field name within one record keeps the last occurrence.
fn flatten_record(node: Node) -> Vec<(String, Value)> {
    let mut fields: Vec<(String, Value)> = Vec::new();
    for child in node.children().filter(|n| n.is_element()) {
        let name = child.tag_name().name().to_string();
        let value = match child.text() {
            Some(text) if !text.is_empty() => Value::Text(text.to_string()),
            _ => Value::Missing,
        };
        match fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => fields.push((name, value)),
        }
    }
    fields
}

/// Align heterogeneous records into a table: union of columns in first-seen order,
/// absent fields filled with the missing-marker.
fn align_records(records: Vec<Vec<(String, Value)>>) -> Table {
    let mut columns: Vec<String> = Vec::new();
    for record in &records {
        for (name, _) in record {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.clone());
            }
        }
    }

    let rows = records
        .into_iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| {
                    record
                        .iter()
                        .find(|(name, _)| name == column)
                        .map(|(_, value)| value.clone())
                        .unwrap_or(Value::Missing)
                })
                .collect()
        })
        .collect();

    Table::new(columns, rows)
}
