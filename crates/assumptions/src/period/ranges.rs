//! Period window computation over grouped rows.

use tracing::debug;

use crate::model::{Boundary, CellValue, PeriodWindow, Row};

use super::criteria::{normalize_period, period_months, CriteriaKind};

/// Fold state of one `adjust_ranges` pass.
struct RangeState<'a> {
    parent_key: Option<&'a str>,
    parent_criteria: &'a str,
    accumulator: i64,
}

impl<'a> RangeState<'a> {
    fn new() -> Self {
        Self {
            parent_key: None,
            parent_criteria: "",
            accumulator: 1,
        }
    }

    fn enter_group(&mut self, head: &'a Row) {
        self.parent_key = head.key.as_deref().map(str::trim);
        self.parent_criteria = head.criteria_str();
        self.accumulator = 1;
    }
}

/// Compute the period window of every row.
///
/// Each row's `end` is the next row's `start` within the same group, so the
/// windows of a group form a contiguous partition. Groups keyed by one of
/// `non_range_keys` get blank windows instead. Returns new rows; the input
/// is not modified.
pub fn adjust_ranges(rows: &[Row], non_range_keys: &[String], rate_labels: &[String]) -> Vec<Row> {
    let mut state = RangeState::new();
    let mut adjusted: Vec<Row> = Vec::with_capacity(rows.len());
    let mut groups = 0usize;

    for (index, row) in rows.iter().enumerate() {
        let is_head = row.is_group_head();
        if is_head {
            state.enter_group(row);
            groups += 1;
        }

        let criteria = if state.parent_criteria.is_empty() {
            row.criteria_str()
        } else {
            state.parent_criteria
        };
        let is_last_row = rows.get(index + 1).is_none_or(Row::is_group_head);
        let mut next = row.clone();

        let non_ranged = state
            .parent_key
            .is_some_and(|key| non_range_keys.iter().any(|k| k == key));
        if non_ranged {
            next.window = Some(PeriodWindow::blank(criteria, is_last_row));
            if !row.is_elt_row && next.value.as_ref().is_none_or(CellValue::is_blank) {
                next.value = Some(CellValue::Number(0.0));
            }
            adjusted.push(next);
            continue;
        }

        let kind = CriteriaKind::classify(criteria, rate_labels);
        let normalized = normalize_period(row.period.as_ref(), kind);

        let start = if kind.is_anchored() {
            normalized.clone().map(Boundary::from)
        } else {
            Some(Boundary::Offset(state.accumulator))
        };
        if kind.accumulates() {
            state.accumulator = state.accumulator.saturating_add(period_months(row.period.as_ref()));
        }

        next.period = normalized.clone();
        next.window = Some(PeriodWindow {
            criteria: criteria.to_string(),
            start: start.clone(),
            end: Some(kind.open_end()),
            next_period: None,
            is_last_row,
        });

        if !is_head {
            if let Some(previous) = adjusted.last_mut() {
                previous.window = previous
                    .window
                    .as_ref()
                    .map(|window| window.closed_by(start, normalized));
            }
        }

        adjusted.push(next);
    }

    debug!(rows = rows.len(), groups, "adjusted period ranges");
    adjusted
}
