//! Data model for assumption tables.

mod cell;
mod lookup;
mod row;
mod window;

pub use cell::{CellValue, Sentinel};
pub use lookup::{
    rule_row, LookupConfiguration, LookupTable, MatchBehavior, Rule, RuleRow, WellHeaderValues,
};
pub use row::Row;
pub use window::{Boundary, PeriodWindow};
