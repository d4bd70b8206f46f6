//! Partitioning of rows into time-series groups.

use crate::error::{AssumptionError, Result};
use crate::model::Row;

/// Split rows into groups, each starting at a row with a non-empty key.
///
/// Concatenating the returned slices reproduces `rows` exactly. A keyless
/// row before the first group head, or a head flagged as a continuation, is
/// a structural error.
pub fn group_time_series(rows: &[Row]) -> Result<Vec<&[Row]>> {
    let mut groups = Vec::new();
    let mut start: Option<usize> = None;

    for (index, row) in rows.iter().enumerate() {
        if row.is_group_head() {
            if row.is_nested_row {
                return Err(AssumptionError::NestedGroupHead { index });
            }
            if let Some(begin) = start {
                groups.push(&rows[begin..index]);
            }
            start = Some(index);
        } else if start.is_none() {
            return Err(AssumptionError::UngroupedRow { index });
        }
    }

    if let Some(begin) = start {
        groups.push(&rows[begin..]);
    }

    Ok(groups)
}
