//! Assumptions: hierarchical assumption-table engine.
//!
//! An assumption table is an ordered list of rows. A row with a key starts a
//! group (a time series); the rows after it continue that group until the
//! next key. The engine turns such a table into persistence-ready rows:
//!
//! - **Period codec**: compute each row's period window and encode it into
//!   the persisted criteria shapes (`Flat`, dates, rate-anchored, offsets).
//! - **Lookup resolution**: expand rows referencing a lookup table into
//!   inline data rows, computing per-well values by ratio or interpolation.
//! - **Validation**: build cross-row context for a schema evaluator and
//!   attach its findings to the rows.
//! - **Organization**: reorder groups canonically by key and category.
//!
//! Every stage is a pure function over an immutable row slice.
//!
//! # Example
//!
//! ```
//! use assumptions::{CompositeEvaluator, Row, TableEngine};
//!
//! let rows = vec![
//!     Row::new("1").with_key("Oil").with_category("Price").with_criteria("As Of").with_period(6).with_value(100),
//!     Row::new("2").with_period(9).with_value(99).nested(),
//! ];
//!
//! let engine = TableEngine::new();
//! let table = engine.process(&rows, &CompositeEvaluator::new()).unwrap();
//! let persisted = engine.encode_rows(&table);
//!
//! assert_eq!(persisted.len(), 2);
//! ```

pub mod error;
pub mod grouping;
pub mod lookup;
pub mod model;
pub mod organize;
pub mod period;
pub mod validation;

mod engine;

pub use engine::{EngineConfig, LookupInputs, TableEngine};
pub use error::{AssumptionError, Result};
pub use grouping::group_time_series;
pub use lookup::{resolve_cell, LookupResolver, MatchRequest, RuleMatcher, WellContext};
pub use model::{
    Boundary, CellValue, LookupTable, MatchBehavior, PeriodWindow, Row, Rule, Sentinel,
};
pub use organize::{organize, OrganizeOptions};
pub use period::{adjust_ranges, decode, encode, CriteriaKind, PersistedCriteria};
pub use validation::{
    validate_rows, CompositeEvaluator, KeyNormalizer, RowIssue, SchemaEvaluator,
    ValidationContext,
};
