//! Pivot reshaping: long-format panel data into one column per period.
//!
//! The reshaper looks only at the extracted table's column set, never at the XML that
//! produced it. It never fails hard — every exit path returns a usable table, so callers
//! always get a spreadsheet.

use std::collections::HashMap;

use thiserror::Error;

use crate::types::{Table, Value};

/// Measurement column pivoted into the wide cells.
pub const VALUE_COLUMN: &str = "DTVAL_CO";

/// Long-format period column; its distinct values become wide columns.
pub const PERIOD_COLUMN: &str = "Period";

/// Identifier columns, in priority order. Every one present in the input is kept.
pub const IDENTIFIER_COLUMNS: [&str; 5] = ["CODE", "SCR_MN", "SCR_ENG", "SCR_MN1", "SCR_ENG1"];

/// Reshape a long-format table into wide format, if it qualifies as panel data.
///
/// Eligibility gates, short-circuiting in order:
///
/// 1. both [`PERIOD_COLUMN`] and [`VALUE_COLUMN`] exist
/// 2. at least one of [`IDENTIFIER_COLUMNS`] exists
/// 3. more than one distinct period value is present
///
/// A table failing a gate is returned unchanged (cloned) with the matching explanatory
/// message. An unexpected failure during the pivot itself also degrades to the original
/// table rather than propagating an error. The input table is never mutated.
pub fn reshape(table: &Table) -> (Table, String) {
    if !table.has_column(PERIOD_COLUMN) || !table.has_column(VALUE_COLUMN) {
        return (
            table.clone(),
            "No pivot - missing required columns".to_string(),
        );
    }

    let id_columns: Vec<&str> = IDENTIFIER_COLUMNS
        .iter()
        .copied()
        .filter(|c| table.has_column(c))
        .collect();
    if id_columns.is_empty() {
        return (
            table.clone(),
            "No pivot - no identifier columns found".to_string(),
        );
    }

    if table.distinct_labels(PERIOD_COLUMN).len() <= 1 {
        return (table.clone(), "No pivot - only one period found".to_string());
    }

    match pivot_wide(table, &id_columns) {
        Ok((wide, message)) => (wide, message),
        Err(e) => (
            table.clone(),
            format!("Pivot failed: {e}, using original format"),
        ),
    }
}

/// Internal pivot failure; surfaces only through the degraded-output message.
#[derive(Debug, Error)]
#[error("{message}")]
struct PivotError {
    message: String,
}

fn column_index(table: &Table, name: &str) -> Result<usize, PivotError> {
    table.column_index(name).ok_or_else(|| PivotError {
        message: format!("column '{name}' not found"),
    })
}

fn pivot_wide(table: &Table, id_columns: &[&str]) -> Result<(Table, String), PivotError> {
    let period_idx = column_index(table, PERIOD_COLUMN)?;
    let value_idx = column_index(table, VALUE_COLUMN)?;
    let id_idxs = id_columns
        .iter()
        .map(|c| column_index(table, c))
        .collect::<Result<Vec<usize>, PivotError>>()?;

    // Distinct periods in encounter order; sorted for column layout afterwards.
    let mut period_labels: Vec<String> = Vec::new();
    let mut period_slots: HashMap<String, usize> = HashMap::new();

    // Groups keyed by the identifier tuple, in encounter order. `None` keys a missing cell.
    let mut group_keys: HashMap<Vec<Option<String>>, usize> = HashMap::new();
    let mut group_ids: Vec<Vec<Value>> = Vec::new();
    let mut group_cells: Vec<Vec<Option<Value>>> = Vec::new();

    for row in &table.rows {
        let period = &row[period_idx];
        // The pivot drops rows without a period key.
        if period.is_missing() {
            continue;
        }
        let period_label = period.label();
        let slot = *period_slots.entry(period_label.clone()).or_insert_with(|| {
            period_labels.push(period_label);
            period_labels.len() - 1
        });

        let key: Vec<Option<String>> = id_idxs
            .iter()
            .map(|&i| match &row[i] {
                Value::Missing => None,
                cell => Some(cell.label()),
            })
            .collect();
        let group = *group_keys.entry(key).or_insert_with(|| {
            group_ids.push(id_idxs.iter().map(|&i| row[i].clone()).collect());
            group_cells.push(Vec::new());
            group_ids.len() - 1
        });

        let cells = &mut group_cells[group];
        if cells.len() <= slot {
            cells.resize(slot + 1, None);
        }
        // First-wins: later duplicates for the same (group, period) pair are dropped.
        if cells[slot].is_none() {
            cells[slot] = Some(row[value_idx].clone());
        }
    }

    // Identifier columns first, then periods ascending by integer value; labels that do
    // not parse sort after all numeric ones, keeping their encounter order.
    let mut order: Vec<usize> = (0..period_labels.len()).collect();
    order.sort_by_key(|&i| period_sort_key(&period_labels[i]));

    let mut columns: Vec<String> = id_columns.iter().map(|c| c.to_string()).collect();
    columns.extend(order.iter().map(|&i| period_labels[i].clone()));

    let rows: Vec<Vec<Value>> = group_ids
        .into_iter()
        .zip(group_cells)
        .map(|(ids, cells)| {
            let mut row = ids;
            row.extend(order.iter().map(|&i| {
                cells.get(i).cloned().flatten().unwrap_or(Value::Missing)
            }));
            row
        })
        .collect();

    let message = format!(
        "Pivoted data: {} categories across {} periods",
        rows.len(),
        period_labels.len()
    );
    Ok((Table::new(columns, rows), message))
}

/// Sort key for a period label: numeric labels ascending by signed value, everything
/// else after them.
fn period_sort_key(label: &str) -> (bool, i64) {
    match label.trim().parse::<i64>() {
        Ok(n) => (false, n),
        Err(_) => (true, 0),
    }
}
