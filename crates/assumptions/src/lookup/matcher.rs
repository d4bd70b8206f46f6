//! Rule matching strategy supplied by the caller.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{MatchBehavior, Rule, WellHeaderValues};

/// The selected well a lookup table is evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellContext {
    pub well_id: String,
    #[serde(default)]
    pub header_values: WellHeaderValues,
    /// Header name -> header type (`number`, `string`, `date`, ...).
    #[serde(default)]
    pub header_types: IndexMap<String, String>,
}

impl WellContext {
    pub fn new(well_id: impl Into<String>, header_values: WellHeaderValues) -> Self {
        Self {
            well_id: well_id.into(),
            header_values,
            header_types: IndexMap::new(),
        }
    }

    pub fn with_header_type(mut self, header: impl Into<String>, kind: impl Into<String>) -> Self {
        self.header_types.insert(header.into(), kind.into());
        self
    }

    /// Returns true if the well carries any header values to match on.
    pub fn is_evaluable(&self) -> bool {
        !self.well_id.is_empty() && !self.header_values.is_empty()
    }
}

/// Everything a matcher may consult to pick a rule.
#[derive(Debug, Clone, Copy)]
pub struct MatchRequest<'a> {
    pub selected_headers: &'a [String],
    pub header_types: &'a IndexMap<String, String>,
    pub well_header_values: &'a WellHeaderValues,
    pub match_behaviors: &'a IndexMap<String, MatchBehavior>,
}

/// Picks the lookup rule that applies to a well.
///
/// Implementations must be deterministic for a fixed input.
pub trait RuleMatcher {
    /// Index into `rules` of the matching rule, if any.
    fn find_rule(&self, request: &MatchRequest<'_>, rules: &[Rule]) -> Option<usize>;
}

impl<F> RuleMatcher for F
where
    F: Fn(&MatchRequest<'_>, &[Rule]) -> Option<usize>,
{
    fn find_rule(&self, request: &MatchRequest<'_>, rules: &[Rule]) -> Option<usize> {
        self(request, rules)
    }
}
