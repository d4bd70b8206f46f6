//! Table engine: configuration and the full row pipeline.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AssumptionError, Result};
use crate::grouping::group_time_series;
use crate::lookup::{LookupResolver, RuleMatcher, WellContext};
use crate::model::{LookupTable, Row};
use crate::organize::{organize, OrganizeOptions};
use crate::period::{adjust_ranges, criteria_kind_of, encode, PersistedCriteria};
use crate::validation::{validate_rows, KeyNormalizer, SchemaEvaluator};

/// Configuration for the table engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Keys whose groups have no ranging semantics.
    pub non_range_keys: Vec<String>,
    /// Criteria labels anchored on a product rate.
    pub rate_labels: Vec<String>,
    /// Canonical key ordering.
    pub sorted_keys: Vec<String>,
    /// Canonical category ordering.
    pub sorted_categories: Vec<String>,
    /// Sort by category before key.
    pub category_major: bool,
    /// Key normalization used when counting duplicates.
    pub normalizer: KeyNormalizer,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            non_range_keys: Vec::new(),
            rate_labels: ["Oil Rate", "Gas Rate", "Water Rate", "Total Fluid Rate"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sorted_keys: ["Oil", "Gas", "NGL", "Drip Condensate", "Water", "CO2"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sorted_categories: Vec::new(),
            category_major: false,
            normalizer: KeyNormalizer::default(),
        }
    }
}

impl EngineConfig {
    /// Read a configuration from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| AssumptionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn with_non_range_keys(mut self, keys: Vec<String>) -> Self {
        self.non_range_keys = keys;
        self
    }

    pub fn with_rate_labels(mut self, labels: Vec<String>) -> Self {
        self.rate_labels = labels;
        self
    }

    pub fn with_sort_order(mut self, keys: Vec<String>, categories: Vec<String>) -> Self {
        self.sorted_keys = keys;
        self.sorted_categories = categories;
        self
    }

    pub fn with_category_major(mut self, category_major: bool) -> Self {
        self.category_major = category_major;
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(label) = self
            .rate_labels
            .iter()
            .find(|label| matches!(label.as_str(), "Flat" | "Dates"))
        {
            return Err(AssumptionError::Config(format!(
                "'{}' is a reserved criteria and cannot be a rate label",
                label
            )));
        }
        Ok(())
    }
}

/// Loaded lookup tables and the well they are evaluated against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupInputs {
    #[serde(default)]
    pub tables: HashMap<String, LookupTable>,
    #[serde(default)]
    pub well: Option<WellContext>,
}

/// Runs the row pipeline: group check, period windows, lookup expansion,
/// validation and canonical ordering.
pub struct TableEngine {
    config: EngineConfig,
}

impl TableEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every stage over `rows` and return the resulting table.
    ///
    /// Fails only on structural errors; validation findings are attached to
    /// the rows.
    pub fn process(&self, rows: &[Row], evaluator: &dyn SchemaEvaluator) -> Result<Vec<Row>> {
        self.run(rows, evaluator, |windowed| windowed)
    }

    /// Like [`process`](Self::process), expanding lookup-table references
    /// after the period windows are computed.
    pub fn process_with_lookup<M: RuleMatcher>(
        &self,
        rows: &[Row],
        inputs: &LookupInputs,
        matcher: M,
        evaluator: &dyn SchemaEvaluator,
    ) -> Result<Vec<Row>> {
        self.run(rows, evaluator, |windowed| {
            LookupResolver::new(&inputs.tables, matcher)
                .with_well(inputs.well.as_ref())
                .expand(&windowed)
        })
    }

    fn run(
        &self,
        rows: &[Row],
        evaluator: &dyn SchemaEvaluator,
        expand: impl FnOnce(Vec<Row>) -> Vec<Row>,
    ) -> Result<Vec<Row>> {
        let groups = group_time_series(rows)?.len();
        debug!(rows = rows.len(), groups, "processing assumption table");

        let expanded = expand(self.adjust(rows));
        let validated = validate_rows(&expanded, &self.config.normalizer, evaluator);

        Ok(self.organize(&validated))
    }

    /// Compute period windows with the configured keys and rate labels.
    pub fn adjust(&self, rows: &[Row]) -> Vec<Row> {
        adjust_ranges(rows, &self.config.non_range_keys, &self.config.rate_labels)
    }

    /// Order rows canonically with the configured orderings.
    pub fn organize(&self, rows: &[Row]) -> Vec<Row> {
        organize(
            rows,
            &self.config.sorted_keys,
            &self.config.sorted_categories,
            OrganizeOptions {
                category_major: self.config.category_major,
            },
        )
    }

    /// Persisted criteria of every windowed, non-lookup row, keyed by row id.
    pub fn encode_rows(&self, rows: &[Row]) -> Vec<(String, PersistedCriteria)> {
        rows.iter()
            .filter(|row| !row.is_lookup() && row.window.is_some())
            .map(|row| {
                let kind = criteria_kind_of(row, &self.config.rate_labels);
                (row.id.clone(), encode(row, kind))
            })
            .collect()
    }
}

impl Default for TableEngine {
    fn default() -> Self {
        Self::new()
    }
}
