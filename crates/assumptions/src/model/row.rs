//! Assumption table rows.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::cell::CellValue;
use super::window::PeriodWindow;
use crate::validation::RowIssue;

/// One line of an assumption table.
///
/// A row with a non-empty `key` starts a group (time series); rows without a
/// key continue the most recent group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Stable row identifier.
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Criteria label (`Flat`, `Dates`, `As Of`, `Oil Rate`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<CellValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<CellValue>,

    /// Continuation of the preceding group.
    #[serde(default)]
    pub is_nested_row: bool,

    /// Row that references a lookup table.
    #[serde(default, rename = "isELTRow")]
    pub is_elt_row: bool,

    /// Row generated from a lookup table's data lines.
    #[serde(default, rename = "isFromELTDataLines")]
    pub is_from_elt_data_lines: bool,

    #[serde(default, rename = "eltId", skip_serializing_if = "Option::is_none")]
    pub elt_id: Option<String>,

    #[serde(default, rename = "eltName", skip_serializing_if = "Option::is_none")]
    pub elt_name: Option<String>,

    /// Output column -> lookup key mappings (lookup table lines only).
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub lookup_by: IndexMap<String, String>,

    /// Display-style tags of computed lookup columns.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub cell_styles: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<PeriodWindow>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<RowIssue>,

    /// Any further columns.
    #[serde(flatten)]
    pub cells: IndexMap<String, CellValue>,
}

impl Row {
    /// Create an empty row with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.criteria = Some(criteria.into());
        self
    }

    pub fn with_period(mut self, period: impl Into<CellValue>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<CellValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Mark the row as a continuation of the preceding group.
    pub fn nested(mut self) -> Self {
        self.is_nested_row = true;
        self
    }

    /// Mark the row as referencing the lookup table `elt_id`.
    pub fn with_lookup_table(mut self, elt_id: impl Into<String>, elt_name: impl Into<String>) -> Self {
        self.is_elt_row = true;
        self.elt_id = Some(elt_id.into());
        self.elt_name = Some(elt_name.into());
        self
    }

    /// Map an output column to a lookup key (lookup table lines).
    pub fn with_lookup_by(mut self, column: impl Into<String>, lookup_key: impl Into<String>) -> Self {
        self.lookup_by.insert(column.into(), lookup_key.into());
        self
    }

    pub fn with_cell(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set_cell(column, value.into());
        self
    }

    /// Read a column by name; `period` and `value` address the typed fields.
    pub fn cell(&self, column: &str) -> Option<&CellValue> {
        match column {
            "period" => self.period.as_ref(),
            "value" => self.value.as_ref(),
            _ => self.cells.get(column),
        }
    }

    /// Write a column by name; `period` and `value` address the typed fields.
    pub fn set_cell(&mut self, column: impl Into<String>, value: CellValue) {
        let column = column.into();
        match column.as_str() {
            "period" => self.period = Some(value),
            "value" => self.value = Some(value),
            _ => {
                self.cells.insert(column, value);
            }
        }
    }

    /// Returns true if the row starts a group.
    pub fn is_group_head(&self) -> bool {
        non_empty(&self.key)
    }

    /// Returns true if the row carries a key, category or criteria.
    pub fn has_descriptor(&self) -> bool {
        non_empty(&self.key) || non_empty(&self.category) || non_empty(&self.criteria)
    }

    /// Returns true for lookup markers and lookup data lines.
    pub fn is_lookup(&self) -> bool {
        self.is_elt_row || self.is_from_elt_data_lines
    }

    pub fn key_str(&self) -> &str {
        self.key.as_deref().unwrap_or_default()
    }

    pub fn category_str(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    pub fn criteria_str(&self) -> &str {
        self.criteria.as_deref().unwrap_or_default()
    }
}

fn non_empty(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}
