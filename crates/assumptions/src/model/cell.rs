//! Cell values and reserved sentinel literals.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Reserved literals that stand in for open-ended boundaries or
/// unresolved lookup results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentinel {
    /// Open end of a date or offset series.
    #[serde(rename = "Econ Limit")]
    EconLimit,
    /// Open end of a rate-anchored series.
    #[serde(rename = "inf")]
    Infinity,
    /// Period of a flat (time-independent) row.
    #[serde(rename = "Flat")]
    Flat,
    /// A lookup column for which no rule matched the selected well.
    #[serde(rename = "Unassigned")]
    Unassigned,
    /// A lookup column that cannot be evaluated until a well is selected.
    #[serde(rename = "Lookup Pending")]
    LookupPending,
}

impl Sentinel {
    /// The persisted literal for this sentinel.
    pub fn label(&self) -> &'static str {
        match self {
            Sentinel::EconLimit => "Econ Limit",
            Sentinel::Infinity => "inf",
            Sentinel::Flat => "Flat",
            Sentinel::Unassigned => "Unassigned",
            Sentinel::LookupPending => "Lookup Pending",
        }
    }

    /// Recognize a persisted literal.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Econ Limit" => Some(Sentinel::EconLimit),
            "inf" => Some(Sentinel::Infinity),
            "Flat" => Some(Sentinel::Flat),
            "Unassigned" => Some(Sentinel::Unassigned),
            "Lookup Pending" => Some(Sentinel::LookupPending),
            _ => None,
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single table cell: a number, a reserved literal or free text.
///
/// Serialized untagged so persisted documents keep plain JSON numbers and
/// strings. Integral numbers are written without a fractional part.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Sentinel(Sentinel),
    Text(String),
}

impl CellValue {
    /// Build a text cell, recognizing reserved literals.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        match Sentinel::from_label(&value) {
            Some(sentinel) => CellValue::Sentinel(sentinel),
            None => CellValue::Text(value),
        }
    }

    /// Numeric view of the cell. Text is parsed leniently; sentinels have none.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Number(_) => None,
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            CellValue::Sentinel(_) => None,
        }
    }

    /// The sentinel held by this cell, if any.
    pub fn as_sentinel(&self) -> Option<Sentinel> {
        match self {
            CellValue::Sentinel(s) => Some(*s),
            _ => None,
        }
    }

    /// Returns true for the given sentinel.
    pub fn is(&self, sentinel: Sentinel) -> bool {
        self.as_sentinel() == Some(sentinel)
    }

    /// Returns true if the cell would be considered empty in the table.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Sentinel(s) => s.serialize(serializer),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Sentinel(s) => write!(f, "{}", s),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::text(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::text(value)
    }
}

impl From<Sentinel> for CellValue {
    fn from(value: Sentinel) -> Self {
        CellValue::Sentinel(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_literals_deserialize_as_sentinels() {
        let cells: Vec<CellValue> =
            serde_json::from_str(r#"["Econ Limit", "inf", "Flat", 3, 2.5, "Oil"]"#).unwrap();
        assert_eq!(cells[0], CellValue::Sentinel(Sentinel::EconLimit));
        assert_eq!(cells[1], CellValue::Sentinel(Sentinel::Infinity));
        assert_eq!(cells[2], CellValue::Sentinel(Sentinel::Flat));
        assert_eq!(cells[3], CellValue::Number(3.0));
        assert_eq!(cells[4], CellValue::Number(2.5));
        assert_eq!(cells[5], CellValue::Text("Oil".to_string()));
    }

    #[test]
    fn test_integral_numbers_serialize_without_fraction() {
        let json = serde_json::to_string(&vec![
            CellValue::Number(5.0),
            CellValue::Number(1.25),
            CellValue::Sentinel(Sentinel::Unassigned),
        ])
        .unwrap();
        assert_eq!(json, r#"[5,1.25,"Unassigned"]"#);
    }

    #[test]
    fn test_as_number_parses_text() {
        assert_eq!(CellValue::from(" 12.5 ").as_number(), Some(12.5));
        assert_eq!(CellValue::from("Econ Limit").as_number(), None);
        assert_eq!(CellValue::from("abc").as_number(), None);
    }
}
