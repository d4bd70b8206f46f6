//! Fuzz target for period parsing and normalization.

#![no_main]

use libfuzzer_sys::fuzz_target;
use assumptions::period::{dates, normalize_period, period_months};
use assumptions::{CellValue, CriteriaKind, PersistedCriteria, decode};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    let _ = dates::parse_date(&input);
    let _ = dates::parse_month(&input);

    let cell = CellValue::from(input.as_ref());
    for kind in [CriteriaKind::Flat, CriteriaKind::Dates, CriteriaKind::Rate, CriteriaKind::Offset] {
        let normalized = normalize_period(Some(&cell), kind);
        let _ = period_months(normalized.as_ref());
    }

    if let Ok(persisted) = serde_json::from_slice::<PersistedCriteria>(data) {
        let _ = decode(&persisted);
    }
});
