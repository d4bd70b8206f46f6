//! Schema evaluators and the built-in row checks.

use crate::model::Row;
use crate::period::FLAT;

use super::context::{RowIssue, ValidationContext};

/// Evaluates one row in its cross-row context.
///
/// Implementations must not depend on anything but `row` and `context`, and
/// treat the frequency tables as read-only.
pub trait SchemaEvaluator {
    fn evaluate(&self, row: &Row, context: &ValidationContext<'_>) -> Vec<RowIssue>;
}

impl<F> SchemaEvaluator for F
where
    F: Fn(&Row, &ValidationContext<'_>) -> Vec<RowIssue>,
{
    fn evaluate(&self, row: &Row, context: &ValidationContext<'_>) -> Vec<RowIssue> {
        self(row, context)
    }
}

/// Flags group heads whose key/category pair repeats too often.
pub struct DuplicateKeyCategoryEvaluator {
    pub limit: usize,
}

impl Default for DuplicateKeyCategoryEvaluator {
    fn default() -> Self {
        Self { limit: 1 }
    }
}

impl SchemaEvaluator for DuplicateKeyCategoryEvaluator {
    fn evaluate(&self, row: &Row, context: &ValidationContext<'_>) -> Vec<RowIssue> {
        if row.is_nested_row || row.is_lookup() || !row.is_group_head() {
            return Vec::new();
        }

        let count = context.key_category_count();
        if count <= self.limit {
            return Vec::new();
        }

        vec![RowIssue::for_field(
            "key",
            format!(
                "'{}' / '{}' appears {} times, at most {} allowed",
                context.key, context.category, count, self.limit
            ),
        )]
    }
}

/// Flags lookup tables referenced from more rows than allowed.
pub struct LookupTableLimitEvaluator {
    pub limit: usize,
}

impl Default for LookupTableLimitEvaluator {
    fn default() -> Self {
        Self { limit: 1 }
    }
}

impl SchemaEvaluator for LookupTableLimitEvaluator {
    fn evaluate(&self, row: &Row, context: &ValidationContext<'_>) -> Vec<RowIssue> {
        let Some(name) = row.elt_name.as_deref().filter(|_| row.is_elt_row) else {
            return Vec::new();
        };

        let count = context.stats.elt(name);
        if count <= self.limit {
            return Vec::new();
        }

        vec![RowIssue::for_field(
            "eltName",
            format!("lookup table '{}' is used {} times, at most {} allowed", name, count, self.limit),
        )]
    }
}

/// Checks continuation rows against their group head.
pub struct ContinuationEvaluator;

impl SchemaEvaluator for ContinuationEvaluator {
    fn evaluate(&self, row: &Row, context: &ValidationContext<'_>) -> Vec<RowIssue> {
        if !row.is_nested_row {
            return Vec::new();
        }

        match context.parent_row {
            None => vec![RowIssue::new("continuation row has no parent row")],
            Some(parent) if parent.criteria_str() == FLAT => vec![RowIssue::for_field(
                "period",
                "flat criteria cannot be continued",
            )],
            Some(_) => Vec::new(),
        }
    }
}

/// Runs several evaluators and concatenates their issues.
pub struct CompositeEvaluator {
    evaluators: Vec<Box<dyn SchemaEvaluator>>,
}

impl CompositeEvaluator {
    /// Create an evaluator with all built-in checks.
    pub fn new() -> Self {
        Self {
            evaluators: vec![
                Box::new(DuplicateKeyCategoryEvaluator::default()),
                Box::new(LookupTableLimitEvaluator::default()),
                Box::new(ContinuationEvaluator),
            ],
        }
    }

    /// Create an evaluator with no checks.
    pub fn empty() -> Self {
        Self {
            evaluators: Vec::new(),
        }
    }

    pub fn with(mut self, evaluator: impl SchemaEvaluator + 'static) -> Self {
        self.evaluators.push(Box::new(evaluator));
        self
    }
}

impl Default for CompositeEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaEvaluator for CompositeEvaluator {
    fn evaluate(&self, row: &Row, context: &ValidationContext<'_>) -> Vec<RowIssue> {
        self.evaluators
            .iter()
            .flat_map(|evaluator| evaluator.evaluate(row, context))
            .collect()
    }
}
