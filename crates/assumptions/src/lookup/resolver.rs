//! Expansion of lookup-table references into inline data rows.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::model::{CellValue, LookupTable, MatchBehavior, Row, Rule, RuleRow, Sentinel, WellHeaderValues};

use super::matcher::{MatchRequest, RuleMatcher, WellContext};
use super::style::style_tag;

/// Caller-supplied test of whether a lookup column is numerical under a rule.
pub type NumericColumnFn<'a> = &'a dyn Fn(&str, &Rule) -> bool;

/// Outcome of matching a table's rules against the selected well.
#[derive(Debug, Clone, Copy)]
enum RuleMatch<'t> {
    /// No well or no header values to match on.
    NoWell,
    Unmatched,
    Matched(&'t Rule),
}

/// Expands rows that reference lookup tables.
///
/// The resolver never loads tables itself; it only consumes the already
/// resolved entries in `tables`.
pub struct LookupResolver<'a, M> {
    tables: &'a HashMap<String, LookupTable>,
    well: Option<&'a WellContext>,
    matcher: M,
    numeric: Option<NumericColumnFn<'a>>,
}

impl<'a, M: RuleMatcher> LookupResolver<'a, M> {
    /// Create a resolver over loaded tables with the given rule matcher.
    pub fn new(tables: &'a HashMap<String, LookupTable>, matcher: M) -> Self {
        Self {
            tables,
            well: None,
            matcher,
            numeric: None,
        }
    }

    /// Set the well lookups are evaluated against.
    pub fn with_well(mut self, well: Option<&'a WellContext>) -> Self {
        self.well = well;
        self
    }

    /// Override how numerical columns are detected.
    ///
    /// By default a column is numerical when the rule's root value is a number.
    pub fn with_numeric_columns(mut self, numeric: NumericColumnFn<'a>) -> Self {
        self.numeric = Some(numeric);
        self
    }

    /// Emit every row followed by the data lines of the table it references.
    ///
    /// Data lines already present in `rows` directly after a reference to a
    /// loaded table are replaced by the regenerated ones, at most one per
    /// table line. Any other data line passes through, so the output is
    /// never shorter than the input.
    pub fn expand(&self, rows: &[Row]) -> Vec<Row> {
        let mut expanded = Vec::with_capacity(rows.len());
        let mut stale = 0usize;
        // Table of the last expanded reference and how many of its lines
        // may still replace a stale one.
        let mut replaceable: Option<(&str, usize)> = None;

        for row in rows {
            if row.is_from_elt_data_lines {
                if let Some((elt_id, remaining)) = replaceable.as_mut() {
                    if *remaining > 0 && row.elt_id.as_deref() == Some(*elt_id) {
                        *remaining -= 1;
                        stale += 1;
                        continue;
                    }
                }
                expanded.push(row.clone());
                continue;
            }
            replaceable = None;
            expanded.push(row.clone());

            let Some(elt_id) = row.elt_id.as_deref() else {
                continue;
            };
            let Some(table) = self.tables.get(elt_id) else {
                warn!(row = %row.id, elt_id, "lookup table is not loaded; skipping expansion");
                continue;
            };

            let matched = self.match_rule(table);
            expanded.extend(
                table
                    .lines
                    .iter()
                    .map(|line| self.expand_line(row, elt_id, line, table, matched)),
            );
            replaceable = Some((elt_id, table.lines.len()));
        }

        if stale > 0 {
            warn!(stale, "replaced previously expanded lookup data lines");
        }
        debug!(rows = rows.len(), expanded = expanded.len(), "expanded lookup tables");
        expanded
    }

    fn match_rule<'t>(&self, table: &'t LookupTable) -> RuleMatch<'t> {
        let Some(well) = self.well.filter(|w| w.is_evaluable()) else {
            return RuleMatch::NoWell;
        };

        let request = MatchRequest {
            selected_headers: &table.configuration.selected_headers,
            header_types: &well.header_types,
            well_header_values: &well.header_values,
            match_behaviors: &table.configuration.selected_headers_match_behavior,
        };

        match self
            .matcher
            .find_rule(&request, &table.rules)
            .and_then(|index| table.rules.get(index))
        {
            Some(rule) => RuleMatch::Matched(rule),
            None => RuleMatch::Unmatched,
        }
    }

    fn expand_line(
        &self,
        parent: &Row,
        elt_id: &str,
        line: &Row,
        table: &LookupTable,
        matched: RuleMatch<'_>,
    ) -> Row {
        let mut data_line = line.clone();
        data_line.is_from_elt_data_lines = true;
        data_line.elt_id = Some(elt_id.to_string());
        data_line.id = format!("{}_{}", parent.id, line.id);

        for (column, lookup_key) in &line.lookup_by {
            let value = match matched {
                RuleMatch::NoWell => CellValue::Sentinel(Sentinel::LookupPending),
                RuleMatch::Unmatched => CellValue::Sentinel(Sentinel::Unassigned),
                RuleMatch::Matched(rule) => {
                    let numerical = match self.numeric {
                        Some(numeric) => numeric(lookup_key, rule),
                        None => root_is_numeric(lookup_key, rule),
                    };
                    let header_values = self.well.map(|w| &w.header_values);
                    resolve_cell(
                        lookup_key,
                        rule,
                        table.configuration.non_regular_header(),
                        header_values.unwrap_or(&WellHeaderValues::new()),
                        numerical,
                    )
                }
            };
            data_line.set_cell(column.clone(), value);
            data_line.cell_styles.insert(column.clone(), style_tag(column));
        }

        data_line
    }
}

fn root_is_numeric(lookup_key: &str, rule: &Rule) -> bool {
    rule.root
        .get(lookup_key)
        .and_then(CellValue::as_number)
        .is_some()
}

/// Compute one lookup column for a matched rule.
///
/// `regular` headers, or non-numerical columns, take the root value as is.
/// `ratio` scales it by the well's header value; `interpolation` walks the
/// rule's ladder for the first adjacent pair bracketing the well's value.
pub fn resolve_cell(
    lookup_key: &str,
    rule: &Rule,
    non_regular_header: Option<(&str, MatchBehavior)>,
    well_data: &WellHeaderValues,
    is_column_numerical: bool,
) -> CellValue {
    let root_value = || {
        rule.root
            .get(lookup_key)
            .cloned()
            .unwrap_or(CellValue::Sentinel(Sentinel::Unassigned))
    };

    let Some((header, behavior)) = non_regular_header else {
        return root_value();
    };
    if behavior == MatchBehavior::Regular || !is_column_numerical {
        return root_value();
    }

    let Some(well_value) = well_data.get(header).and_then(CellValue::as_number) else {
        return CellValue::Sentinel(Sentinel::Unassigned);
    };

    let resolved = match behavior {
        MatchBehavior::Ratio => ratio(&rule.root, lookup_key, header, well_value),
        MatchBehavior::Interpolation => interpolate(rule, lookup_key, header, well_value),
        MatchBehavior::Regular => None,
    };

    match resolved {
        Some(value) if value.is_finite() => CellValue::Number(round2(value)),
        _ => CellValue::Sentinel(Sentinel::Unassigned),
    }
}

fn number(row: &RuleRow, column: &str) -> Option<f64> {
    row.get(column).and_then(CellValue::as_number)
}

fn ratio(root: &RuleRow, lookup_key: &str, header: &str, well_value: f64) -> Option<f64> {
    let value = number(root, lookup_key)?;
    let base = number(root, header)?;
    Some(value / base * well_value)
}

fn interpolate(rule: &Rule, lookup_key: &str, header: &str, well_value: f64) -> Option<f64> {
    let ladder: Vec<&RuleRow> = rule.ladder().collect();

    for pair in ladder.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        let (Some(lower_h), Some(upper_h)) = (number(lower, header), number(upper, header)) else {
            continue;
        };

        let ascending = lower_h <= well_value && well_value <= upper_h;
        let descending = upper_h <= well_value && well_value <= lower_h;
        if !ascending && !descending {
            continue;
        }

        let lower_v = number(lower, lookup_key)?;
        let upper_v = number(upper, lookup_key)?;
        if upper_h == lower_h {
            return Some(lower_v);
        }
        return Some(lower_v + (well_value - lower_h) * (upper_v - lower_v) / (upper_h - lower_h));
    }

    None
}

/// Round to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
