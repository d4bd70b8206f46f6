//! Cross-row context handed to the schema evaluator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Row;

/// A finding attached to a row by the schema evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssue {
    /// Column the issue refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl RowIssue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

/// Normalizes row keys for counting; stored rows are never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyNormalizer {
    /// Keys written in upper case (acronyms); everything else is title-cased.
    pub upper_case_keys: Vec<String>,
}

impl Default for KeyNormalizer {
    fn default() -> Self {
        Self {
            upper_case_keys: vec!["NGL".to_string(), "CO2".to_string()],
        }
    }
}

impl KeyNormalizer {
    pub fn new(upper_case_keys: Vec<String>) -> Self {
        Self { upper_case_keys }
    }

    pub fn normalize(&self, key: &str) -> String {
        let key = key.trim();
        if self
            .upper_case_keys
            .iter()
            .any(|upper| upper.eq_ignore_ascii_case(key))
        {
            return key.to_uppercase();
        }
        title_case(key)
    }
}

fn title_case(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// `(normalized key, category)` pair.
pub type KeyCategory = (String, String);

/// Frequency tables shared by every context of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowStatistics {
    /// Group heads per `(normalized key, category)`, lookup rows excluded.
    pub key_category_count: IndexMap<KeyCategory, usize>,
    /// References per lookup-table name.
    pub elt_count: IndexMap<String, usize>,
}

impl RowStatistics {
    pub fn collect(rows: &[Row], normalizer: &KeyNormalizer) -> Self {
        let mut stats = Self::default();

        for row in rows {
            if row.is_elt_row {
                if let Some(name) = row.elt_name.as_deref().filter(|n| !n.is_empty()) {
                    *stats.elt_count.entry(name.to_string()).or_insert(0) += 1;
                }
            }
            if row.is_lookup() || !row.is_group_head() {
                continue;
            }
            let pair = (normalizer.normalize(row.key_str()), row.category_str().to_string());
            *stats.key_category_count.entry(pair).or_insert(0) += 1;
        }

        stats
    }

    /// Number of group heads sharing this key and category.
    pub fn key_category(&self, key: &str, category: &str) -> usize {
        self.key_category_count
            .get(&(key.to_string(), category.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Number of references to a lookup table.
    pub fn elt(&self, name: &str) -> usize {
        self.elt_count.get(name).copied().unwrap_or(0)
    }
}

/// What the schema evaluator sees for one row.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Normalized key of the row's group.
    pub key: &'a str,
    pub category: &'a str,
    pub stats: &'a RowStatistics,
    /// Most recent non-continuation row (the row itself for heads).
    pub parent_row: Option<&'a Row>,
    /// Preceding row of the same group.
    pub prev_row: Option<&'a Row>,
    /// The next row is absent or starts a new group.
    pub is_last_time_series: bool,
    pub row: &'a Row,
}

impl ValidationContext<'_> {
    /// Key and category of the row's group, concatenated.
    pub fn row_type(&self) -> String {
        format!("{}{}", self.key, self.category)
    }

    /// Group heads sharing this row's key and category.
    pub fn key_category_count(&self) -> usize {
        self.stats.key_category(self.key, self.category)
    }
}

/// Normalized parent keys, computed once so contexts can borrow them.
pub struct ContextKeys {
    keys: Vec<String>,
}

impl ContextKeys {
    pub fn collect(rows: &[Row], normalizer: &KeyNormalizer) -> Self {
        let mut keys = Vec::with_capacity(rows.len());
        let mut current = String::new();
        for row in rows {
            if !row.is_nested_row {
                current = normalizer.normalize(row.key_str());
            }
            keys.push(current.clone());
        }
        Self { keys }
    }
}

/// Build the context of every row in one pass.
pub fn build_contexts<'a>(
    rows: &'a [Row],
    keys: &'a ContextKeys,
    stats: &'a RowStatistics,
) -> Vec<ValidationContext<'a>> {
    let mut contexts = Vec::with_capacity(rows.len());
    let mut parent: Option<&'a Row> = None;
    let mut prev: Option<&'a Row> = None;

    for (index, row) in rows.iter().enumerate() {
        if !row.is_nested_row {
            parent = Some(row);
            prev = None;
        }

        let category = parent.map(Row::category_str).unwrap_or_default();
        contexts.push(ValidationContext {
            key: keys.keys.get(index).map(String::as_str).unwrap_or_default(),
            category,
            stats,
            parent_row: parent,
            prev_row: prev,
            is_last_time_series: rows.get(index + 1).is_none_or(Row::is_group_head),
            row,
        });

        prev = Some(row);
    }

    debug!(rows = rows.len(), "built validation contexts");
    contexts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalization() {
        let normalizer = KeyNormalizer::default();
        assert_eq!(normalizer.normalize("ngl"), "NGL");
        assert_eq!(normalizer.normalize("co2"), "CO2");
        assert_eq!(normalizer.normalize("oIL"), "Oil");
        assert_eq!(normalizer.normalize("drip condensate"), "Drip Condensate");
    }

    #[test]
    fn test_statistics_skip_lookup_rows() {
        let mut data_line = Row::new("4").with_key("Oil").with_category("Price");
        data_line.is_from_elt_data_lines = true;
        let rows = vec![
            Row::new("1").with_key("oil").with_category("Price"),
            Row::new("2").with_key("Oil").with_category("Price"),
            Row::new("3").with_key("Oil").with_lookup_table("elt-1", "Pricing"),
            data_line,
            Row::new("5").with_key("Gas").with_lookup_table("elt-2", "Pricing"),
        ];

        let stats = RowStatistics::collect(&rows, &KeyNormalizer::default());

        assert_eq!(stats.key_category("Oil", "Price"), 2);
        assert_eq!(stats.elt("Pricing"), 2);
        assert_eq!(stats.key_category("Gas", ""), 0);
    }

    #[test]
    fn test_statistics_count_keyed_rows_only() {
        let rows = vec![
            Row::new("1").with_key("Oil").with_category("Price").with_criteria("As Of"),
            Row::new("2").with_category("Price").with_period(3).nested(),
            Row::new("3").with_period(4).nested(),
            Row::new("4").with_key("OIL").with_category("Price"),
        ];

        let stats = RowStatistics::collect(&rows, &KeyNormalizer::default());

        assert_eq!(stats.key_category("Oil", "Price"), 2);
        assert_eq!(stats.key_category("", "Price"), 0);
        assert_eq!(stats.key_category("", ""), 0);
    }

    #[test]
    fn test_contexts_track_parent_and_previous() {
        let rows = vec![
            Row::new("1").with_key("Oil").with_category("Price").with_criteria("As Of"),
            Row::new("2").with_period(3).nested(),
            Row::new("3").with_period(4).nested(),
            Row::new("4").with_key("Gas").with_category("Price"),
        ];
        let normalizer = KeyNormalizer::default();
        let stats = RowStatistics::collect(&rows, &normalizer);
        let keys = ContextKeys::collect(&rows, &normalizer);

        let contexts = build_contexts(&rows, &keys, &stats);

        assert_eq!(contexts[0].parent_row.map(|r| r.id.as_str()), Some("1"));
        assert!(contexts[0].prev_row.is_none());
        assert!(!contexts[0].is_last_time_series);

        assert_eq!(contexts[2].parent_row.map(|r| r.id.as_str()), Some("1"));
        assert_eq!(contexts[2].prev_row.map(|r| r.id.as_str()), Some("2"));
        assert!(contexts[2].is_last_time_series);
        assert_eq!(contexts[2].row_type(), "OilPrice");
        assert_eq!(contexts[2].key_category_count(), 1);

        assert!(contexts[3].prev_row.is_none());
        assert!(contexts[3].is_last_time_series);
    }

    #[test]
    fn test_keyless_continuation_keeps_series_open() {
        let rows = vec![
            Row::new("1").with_key("NGL").with_criteria("As Of").with_period(6).with_value(100),
            Row::new("2").with_period(9).with_value(99),
        ];
        let normalizer = KeyNormalizer::default();
        let stats = RowStatistics::collect(&rows, &normalizer);
        let keys = ContextKeys::collect(&rows, &normalizer);

        let contexts = build_contexts(&rows, &keys, &stats);

        assert!(!contexts[0].is_last_time_series);
        assert!(contexts[1].is_last_time_series);
        // Parent tracking follows the continuation flag, not the key.
        assert_eq!(contexts[1].parent_row.map(|r| r.id.as_str()), Some("2"));
    }
}
