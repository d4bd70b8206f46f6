//! Period codec: windows over time-series groups and their persisted shapes.

mod codec;
mod criteria;
pub mod dates;
mod ranges;

pub use codec::{criteria_kind_of, decode, encode, FlatLiteral, PersistedCriteria, RestoredPeriod};
pub use criteria::{normalize_period, period_months, CriteriaKind, DATES, FLAT};
pub use ranges::adjust_ranges;
