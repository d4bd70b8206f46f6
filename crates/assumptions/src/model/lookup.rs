//! Lookup table (ELT) model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::cell::CellValue;
use super::row::Row;

/// Header values of one rule row or of a well, keyed by header/column name.
pub type RuleRow = IndexMap<String, CellValue>;

/// Header values of the selected well.
pub type WellHeaderValues = IndexMap<String, CellValue>;

/// How a rule's value is adapted to a specific well's header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBehavior {
    /// Use the rule value as is.
    #[default]
    Regular,
    /// Scale the rule value by `well / rule` header values.
    Ratio,
    /// Interpolate linearly along the rule's nested ladder.
    Interpolation,
}

/// Which well headers drive rule matching, and how.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupConfiguration {
    #[serde(default)]
    pub selected_headers: Vec<String>,
    #[serde(default)]
    pub selected_headers_match_behavior: IndexMap<String, MatchBehavior>,
}

impl LookupConfiguration {
    /// Behavior configured for `header`, defaulting to regular.
    pub fn behavior(&self, header: &str) -> MatchBehavior {
        self.selected_headers_match_behavior
            .get(header)
            .copied()
            .unwrap_or_default()
    }

    /// The first selected header with a ratio or interpolation behavior.
    pub fn non_regular_header(&self) -> Option<(&str, MatchBehavior)> {
        self.selected_headers.iter().find_map(|header| match self.behavior(header) {
            MatchBehavior::Regular => None,
            behavior => Some((header.as_str(), behavior)),
        })
    }
}

/// A lookup rule: a root row plus an ordered interpolation ladder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rule {
    pub root: RuleRow,
    #[serde(default)]
    pub nested: Vec<RuleRow>,
}

impl Rule {
    pub fn new(root: RuleRow) -> Self {
        Self {
            root,
            nested: Vec::new(),
        }
    }

    pub fn with_nested(mut self, row: RuleRow) -> Self {
        self.nested.push(row);
        self
    }

    /// Root followed by nested rows.
    pub fn ladder(&self) -> impl Iterator<Item = &RuleRow> {
        std::iter::once(&self.root).chain(self.nested.iter())
    }
}

/// A resolved lookup table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LookupTable {
    #[serde(default)]
    pub configuration: LookupConfiguration,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub lines: Vec<Row>,
}

/// Build a rule row from `(column, value)` pairs.
pub fn rule_row<K, V>(cells: impl IntoIterator<Item = (K, V)>) -> RuleRow
where
    K: Into<String>,
    V: Into<CellValue>,
{
    cells
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_regular_header_follows_selection_order() {
        let config: LookupConfiguration = serde_json::from_str(
            r#"{"selectedHeaders":["state","perf_lateral_length","tvd"],
                "selectedHeadersMatchBehavior":{"state":"regular","tvd":"ratio","perf_lateral_length":"interpolation"}}"#,
        )
        .unwrap();

        assert_eq!(
            config.non_regular_header(),
            Some(("perf_lateral_length", MatchBehavior::Interpolation))
        );
        assert_eq!(config.behavior("missing"), MatchBehavior::Regular);
    }

    #[test]
    fn test_ladder_starts_at_root() {
        let rule = Rule::new(rule_row([("h", 10)])).with_nested(rule_row([("h", 20)]));
        let hs: Vec<_> = rule.ladder().map(|r| r["h"].clone()).collect();
        assert_eq!(hs, vec![CellValue::Number(10.0), CellValue::Number(20.0)]);
    }
}
