//! Period windows derived from grouped rows.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cell::{CellValue, Sentinel};
use crate::period::dates;

/// One edge of a period window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "CellValue", from = "CellValue")]
pub enum Boundary {
    /// Month offset (offset schemes) or anchor value (rate schemes).
    Offset(i64),
    /// First day of a calendar month (date scheme).
    Month(NaiveDate),
    Flat,
    EconLimit,
    Infinity,
    /// A value that could not be interpreted; passed through untouched.
    Raw(String),
}

impl Boundary {
    /// Offset view of the boundary; anything non-numeric counts as zero.
    pub fn offset_or_zero(&self) -> i64 {
        match self {
            Boundary::Offset(n) => *n,
            _ => 0,
        }
    }

    pub fn as_month(&self) -> Option<NaiveDate> {
        match self {
            Boundary::Month(date) => Some(*date),
            _ => None,
        }
    }
}

impl From<Boundary> for CellValue {
    fn from(boundary: Boundary) -> Self {
        match boundary {
            Boundary::Offset(n) => CellValue::Number(n as f64),
            Boundary::Month(date) => CellValue::Text(dates::format_month(date)),
            Boundary::Flat => CellValue::Sentinel(Sentinel::Flat),
            Boundary::EconLimit => CellValue::Sentinel(Sentinel::EconLimit),
            Boundary::Infinity => CellValue::Sentinel(Sentinel::Infinity),
            Boundary::Raw(s) => CellValue::Text(s),
        }
    }
}

impl From<CellValue> for Boundary {
    fn from(cell: CellValue) -> Self {
        match cell {
            CellValue::Number(n) => Boundary::Offset(n.trunc() as i64),
            CellValue::Sentinel(Sentinel::Flat) => Boundary::Flat,
            CellValue::Sentinel(Sentinel::EconLimit) => Boundary::EconLimit,
            CellValue::Sentinel(Sentinel::Infinity) => Boundary::Infinity,
            CellValue::Sentinel(other) => Boundary::Raw(other.label().to_string()),
            CellValue::Text(s) => match dates::parse_month(&s) {
                Some(date) => Boundary::Month(date),
                None => Boundary::Raw(s),
            },
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", CellValue::from(self.clone()))
    }
}

/// The derived period window of a row.
///
/// A window's `end` equals the `start` of the next row in the same group;
/// only the last row of a group keeps an open-ended sentinel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodWindow {
    /// Criteria label the window was computed under.
    pub criteria: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Boundary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Boundary>,
    /// Normalized period of the following row in the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_period: Option<CellValue>,
    pub is_last_row: bool,
}

impl PeriodWindow {
    /// A window with no ranging semantics.
    pub fn blank(criteria: impl Into<String>, is_last_row: bool) -> Self {
        Self {
            criteria: criteria.into(),
            start: None,
            end: None,
            next_period: None,
            is_last_row,
        }
    }

    /// Replace the end boundary, returning a new window.
    pub fn closed_by(&self, next_start: Option<Boundary>, next_period: Option<CellValue>) -> Self {
        Self {
            end: next_start,
            next_period,
            ..self.clone()
        }
    }
}
