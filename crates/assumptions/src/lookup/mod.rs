//! Lookup-table (ELT) resolution.

mod matcher;
mod resolver;
mod style;

pub use matcher::{MatchRequest, RuleMatcher, WellContext};
pub use resolver::{resolve_cell, round2, LookupResolver, NumericColumnFn};
pub use style::style_tag;
