//! Canonical ordering of rows for display and persistence.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Row;

/// Sort options of [`organize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeOptions {
    /// Sort by category first, then key. Key first otherwise.
    pub category_major: bool,
}

/// Position of `value` in a canonical ordering; unknown values sort last.
fn rank(order: &[String], value: &str) -> usize {
    order
        .iter()
        .position(|candidate| candidate == value)
        .unwrap_or(usize::MAX)
}

/// Fold rows into groups: a row with a key, category or criteria starts one.
fn fold_groups(rows: Vec<&Row>) -> Vec<Vec<&Row>> {
    let mut groups: Vec<Vec<&Row>> = Vec::new();
    for row in rows {
        match groups.last_mut() {
            Some(group) if !row.has_descriptor() => group.push(row),
            _ => groups.push(vec![row]),
        }
    }
    groups
}

/// Reorder rows into canonical groups.
///
/// Regular groups are stably sorted by the caller's key and category
/// orderings; lookup markers and lookup data lines follow in their original
/// relative order.
pub fn organize(
    rows: &[Row],
    sorted_keys: &[String],
    sorted_categories: &[String],
    options: OrganizeOptions,
) -> Vec<Row> {
    let (lookup, regular): (Vec<&Row>, Vec<&Row>) = rows.iter().partition(|row| row.is_lookup());

    let mut groups = fold_groups(regular);
    groups.sort_by(|a, b| compare_heads(a[0], b[0], sorted_keys, sorted_categories, options));

    debug!(groups = groups.len(), lookup = lookup.len(), "organized rows");

    groups
        .into_iter()
        .flatten()
        .chain(lookup)
        .cloned()
        .collect()
}

/// Compare two rows' group heads the way [`organize`] does.
pub fn compare_heads(
    a: &Row,
    b: &Row,
    sorted_keys: &[String],
    sorted_categories: &[String],
    options: OrganizeOptions,
) -> Ordering {
    let key = rank(sorted_keys, a.key_str()).cmp(&rank(sorted_keys, b.key_str()));
    let category =
        rank(sorted_categories, a.category_str()).cmp(&rank(sorted_categories, b.category_str()));
    if options.category_major {
        category.then(key)
    } else {
        key.then(category)
    }
}
