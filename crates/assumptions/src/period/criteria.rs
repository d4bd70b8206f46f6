//! Criteria schemes and period normalization.

use serde::{Deserialize, Serialize};

use crate::model::{Boundary, CellValue};

use super::dates;

/// Label of the flat criteria.
pub const FLAT: &str = "Flat";

/// Label of the absolute-date criteria.
pub const DATES: &str = "Dates";

/// How a row's period is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriteriaKind {
    /// Time-independent value.
    Flat,
    /// Period is an absolute calendar month.
    Dates,
    /// Period is an anchor on a product rate.
    Rate,
    /// Period is a duration in months accumulated from the group start.
    Offset,
}

impl CriteriaKind {
    /// Classify a criteria label given the caller's rate labels.
    pub fn classify(label: &str, rate_labels: &[String]) -> Self {
        let label = label.trim();
        if label == FLAT {
            CriteriaKind::Flat
        } else if label == DATES {
            CriteriaKind::Dates
        } else if rate_labels.iter().any(|rate| rate == label) {
            CriteriaKind::Rate
        } else {
            CriteriaKind::Offset
        }
    }

    /// Whether periods of this scheme add up along a group.
    pub fn accumulates(&self) -> bool {
        matches!(self, CriteriaKind::Rate | CriteriaKind::Offset)
    }

    /// Whether the window start is the period itself.
    pub fn is_anchored(&self) -> bool {
        matches!(self, CriteriaKind::Rate | CriteriaKind::Dates)
    }

    /// Open end boundary of the last row of a group.
    pub fn open_end(&self) -> Boundary {
        match self {
            CriteriaKind::Rate => Boundary::Infinity,
            _ => Boundary::EconLimit,
        }
    }
}

/// Normalize a displayed period for its scheme.
///
/// Dates become `MM/YYYY`; other non-flat schemes become whole month
/// offsets. Values that cannot be interpreted (including sentinels) pass
/// through unchanged.
pub fn normalize_period(period: Option<&CellValue>, kind: CriteriaKind) -> Option<CellValue> {
    let period = period?;
    let normalized = match (kind, period) {
        (CriteriaKind::Flat, _) => period.clone(),
        (CriteriaKind::Dates, CellValue::Text(text)) => match dates::parse_date(text) {
            Some(date) => CellValue::Text(dates::format_month(date)),
            None => period.clone(),
        },
        (CriteriaKind::Dates, _) => period.clone(),
        (_, CellValue::Sentinel(_)) => period.clone(),
        (_, _) => match period.as_number() {
            Some(n) => CellValue::Number(n.trunc()),
            None => period.clone(),
        },
    };
    Some(normalized)
}

/// Numeric contribution of a period to the running offset.
pub fn period_months(period: Option<&CellValue>) -> i64 {
    period
        .and_then(CellValue::as_number)
        .map(|n| n.trunc() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sentinel;

    fn rates() -> Vec<String> {
        vec!["Oil Rate".to_string(), "Gas Rate".to_string()]
    }

    #[test]
    fn test_classify() {
        assert_eq!(CriteriaKind::classify("Flat", &rates()), CriteriaKind::Flat);
        assert_eq!(CriteriaKind::classify("Dates", &rates()), CriteriaKind::Dates);
        assert_eq!(CriteriaKind::classify("Gas Rate", &rates()), CriteriaKind::Rate);
        assert_eq!(CriteriaKind::classify("As Of", &rates()), CriteriaKind::Offset);
    }

    #[test]
    fn test_normalize_dates() {
        let period = CellValue::from("2024-05-17");
        assert_eq!(
            normalize_period(Some(&period), CriteriaKind::Dates),
            Some(CellValue::Text("05/2024".to_string()))
        );

        let limit = CellValue::Sentinel(Sentinel::EconLimit);
        assert_eq!(normalize_period(Some(&limit), CriteriaKind::Dates), Some(limit));
    }

    #[test]
    fn test_normalize_offsets() {
        let period = CellValue::from("12.7");
        assert_eq!(
            normalize_period(Some(&period), CriteriaKind::Offset),
            Some(CellValue::Number(12.0))
        );
        let junk = CellValue::from("soon");
        assert_eq!(normalize_period(Some(&junk), CriteriaKind::Offset), Some(junk));
        assert_eq!(normalize_period(None, CriteriaKind::Rate), None);
    }

    #[test]
    fn test_period_months_treats_missing_as_zero() {
        assert_eq!(period_months(Some(&CellValue::Number(6.0))), 6);
        assert_eq!(period_months(Some(&CellValue::from("n/a"))), 0);
        assert_eq!(period_months(None), 0);
    }
}
