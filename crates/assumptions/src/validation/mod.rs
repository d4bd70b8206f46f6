//! Validation context building and per-row evaluation.

mod context;
mod evaluators;

pub use context::{
    build_contexts, ContextKeys, KeyCategory, KeyNormalizer, RowIssue, RowStatistics,
    ValidationContext,
};
pub use evaluators::{
    CompositeEvaluator, ContinuationEvaluator, DuplicateKeyCategoryEvaluator,
    LookupTableLimitEvaluator, SchemaEvaluator,
};

use crate::model::Row;

/// Evaluate every row and attach the returned issues.
///
/// Issues from a previous pass are replaced; no other field changes.
pub fn validate_rows(
    rows: &[Row],
    normalizer: &KeyNormalizer,
    evaluator: &dyn SchemaEvaluator,
) -> Vec<Row> {
    let stats = RowStatistics::collect(rows, normalizer);
    let keys = ContextKeys::collect(rows, normalizer);

    build_contexts(rows, &keys, &stats)
        .iter()
        .map(|context| Row {
            errors: evaluator.evaluate(context.row, context),
            ..context.row.clone()
        })
        .collect()
}
