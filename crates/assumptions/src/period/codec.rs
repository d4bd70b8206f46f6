//! Persisted criteria shapes and the window <-> criteria codec.

use serde::{Deserialize, Serialize};

use crate::model::{Boundary, CellValue, PeriodWindow, Row, Sentinel};

use super::criteria::{period_months, CriteriaKind, FLAT};
use super::dates;

/// The `"Flat"` literal of a flat criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlatLiteral {
    Flat,
}

/// Criteria value as stored in assumption documents.
///
/// These shapes must stay byte-compatible with previously stored documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersistedCriteria {
    /// `"Flat"`
    Flat(FlatLiteral),
    /// `{start_date, end_date, period}`
    Dates {
        start_date: String,
        end_date: String,
        period: i64,
    },
    /// `{start, end, period}` with an inclusive `end`.
    ///
    /// A last row whose period is a sentinel keeps the sentinel as `period`
    /// and its open boundary as `end`.
    Offset {
        start: i64,
        end: Boundary,
        period: CellValue,
    },
    /// `{start, end}` of a rate-anchored row.
    Range { start: Boundary, end: Boundary },
}

impl PersistedCriteria {
    pub fn flat() -> Self {
        PersistedCriteria::Flat(FlatLiteral::Flat)
    }
}

/// Window and display period restored from a persisted criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredPeriod {
    pub period: Option<CellValue>,
    pub start: Option<Boundary>,
    pub end: Option<Boundary>,
}

/// Scheme a row was windowed under, preferring the window's criteria.
pub fn criteria_kind_of(row: &Row, rate_labels: &[String]) -> CriteriaKind {
    let label = row
        .window
        .as_ref()
        .map(|w| w.criteria.as_str())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| row.criteria_str());
    CriteriaKind::classify(label, rate_labels)
}

/// Serialize a row's window into its persisted criteria.
pub fn encode(row: &Row, kind: CriteriaKind) -> PersistedCriteria {
    let window = row.window.clone().unwrap_or_default();
    if kind == CriteriaKind::Flat || row.criteria_str() == FLAT || window.criteria == FLAT {
        return PersistedCriteria::flat();
    }

    match kind {
        CriteriaKind::Rate => PersistedCriteria::Range {
            start: window.start.unwrap_or(Boundary::Offset(0)),
            end: window.end.unwrap_or(Boundary::Infinity),
        },
        CriteriaKind::Dates => encode_dates(&window),
        _ => {
            let start = window.start.as_ref().map_or(0, Boundary::offset_or_zero);
            let period = match row.period.as_ref() {
                Some(CellValue::Sentinel(sentinel)) => CellValue::Sentinel(*sentinel),
                other => CellValue::from(period_months(other)),
            };
            let end = match (&period, window.is_last_row) {
                (CellValue::Sentinel(_), true) => window.end.unwrap_or(Boundary::EconLimit),
                (_, true) => {
                    let months = period_months(Some(&period));
                    Boundary::Offset(start.saturating_add(months).saturating_sub(1))
                }
                (_, false) => Boundary::Offset(
                    window
                        .end
                        .as_ref()
                        .map_or(0, Boundary::offset_or_zero)
                        .saturating_sub(1),
                ),
            };
            PersistedCriteria::Offset { start, end, period }
        }
    }
}

fn encode_dates(window: &PeriodWindow) -> PersistedCriteria {
    let start_month = window.start.as_ref().and_then(Boundary::as_month);
    let start_date = match (start_month, &window.start) {
        (Some(month), _) => dates::format_day(dates::first_day_of_month(month)),
        (None, Some(other)) => other.to_string(),
        (None, None) => String::new(),
    };

    if window.is_last_row {
        return PersistedCriteria::Dates {
            start_date,
            end_date: Sentinel::EconLimit.label().to_string(),
            period: 1,
        };
    }

    match (start_month, window.end.as_ref().and_then(Boundary::as_month)) {
        (Some(start), Some(end)) => {
            let end_day = dates::last_day_of_month(dates::add_months(end, -1));
            PersistedCriteria::Dates {
                start_date,
                end_date: dates::format_day(end_day),
                period: dates::months_between(end, dates::first_day_of_month(start)) + 1,
            }
        }
        _ => PersistedCriteria::Dates {
            start_date,
            end_date: window.end.as_ref().map(Boundary::to_string).unwrap_or_default(),
            period: 1,
        },
    }
}

/// Restore the display period and window boundaries from a persisted criteria.
///
/// Inverse of [`encode`] for every row that is not the last of its group.
pub fn decode(persisted: &PersistedCriteria) -> RestoredPeriod {
    match persisted {
        PersistedCriteria::Flat(_) => RestoredPeriod {
            period: Some(CellValue::Sentinel(Sentinel::Flat)),
            start: None,
            end: None,
        },
        PersistedCriteria::Offset { start, end, period } => RestoredPeriod {
            period: Some(period.clone()),
            start: Some(Boundary::Offset(*start)),
            end: Some(match end {
                Boundary::Offset(last) => Boundary::Offset(last.saturating_add(1)),
                open => open.clone(),
            }),
        },
        PersistedCriteria::Range { start, end } => RestoredPeriod {
            period: Some(CellValue::from(start.clone())),
            start: Some(start.clone()),
            end: Some(end.clone()),
        },
        PersistedCriteria::Dates {
            start_date,
            end_date,
            ..
        } => {
            let start = match dates::parse_month(start_date) {
                Some(month) => Boundary::Month(month),
                None => Boundary::Raw(start_date.clone()),
            };
            let end = if end_date == Sentinel::EconLimit.label() {
                Boundary::EconLimit
            } else {
                match dates::parse_month(end_date) {
                    Some(month) => Boundary::Month(dates::add_months(month, 1)),
                    None => Boundary::Raw(end_date.clone()),
                }
            };
            RestoredPeriod {
                period: Some(CellValue::from(start.clone())),
                start: Some(start),
                end: Some(end),
            }
        }
    }
}
