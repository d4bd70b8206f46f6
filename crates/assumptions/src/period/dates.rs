//! Calendar-month helpers for the date criteria scheme.

use chrono::{Datelike, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Display format of a normalized month (`MM/YYYY`).
const MONTH_FORMAT: &str = "%m/%Y";

/// Persisted format of a calendar day.
const DAY_FORMAT: &str = "%Y-%m-%d";

static MONTH_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{4})$").expect("valid month regex")
});

static ISO_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})$").expect("valid ISO month regex")
});

/// Day formats accepted for date criteria, tried in order.
const DAY_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%m-%d-%Y"];

/// Parse a calendar date in any supported shape.
///
/// Month-only inputs (`MM/YYYY`, `YYYY-MM`) resolve to the first of the
/// month; timestamps are truncated to their date part.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = MONTH_ONLY.captures(trimmed) {
        return ymd(&caps[2], &caps[1]);
    }
    if let Some(caps) = ISO_MONTH.captures(trimmed) {
        return ymd(&caps[1], &caps[2]);
    }

    // ISO timestamps: keep the date part
    let day_part = match trimmed.find('T') {
        Some(pos) if pos == 10 => &trimmed[..pos],
        _ => trimmed,
    };

    DAY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day_part, fmt).ok())
}

fn ymd(year: &str, month: &str) -> Option<NaiveDate> {
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Parse a date and snap it to the first day of its month.
pub fn parse_month(input: &str) -> Option<NaiveDate> {
    parse_date(input).map(first_day_of_month)
}

/// Canonical month representation of a date.
pub fn format_month(date: NaiveDate) -> String {
    date.format(MONTH_FORMAT).to_string()
}

/// Persisted day representation of a date.
pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    first_day_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Shift a date by a signed number of months, clamping the day.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// Whole months from `earlier` to `later`, truncated toward zero.
pub fn months_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    if later < earlier {
        return -months_between(earlier, later);
    }
    let mut months = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month()) - i64::from(earlier.month());
    if later.day() < earlier.day() && later != last_day_of_month(later) {
        months -= 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_supported_shapes() {
        assert_eq!(parse_date("2024-03-15"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("03/15/2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("3/2024"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date("2024-03"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date("2024-03-15T00:00:00.000Z"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert_eq!(parse_date("Econ Limit"), None);
        assert_eq!(parse_date("13/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(first_day_of_month(date(2024, 2, 17)), date(2024, 2, 1));
        assert_eq!(last_day_of_month(date(2024, 2, 17)), date(2024, 2, 29));
        assert_eq!(last_day_of_month(date(2023, 12, 1)), date(2023, 12, 31));
    }

    #[test]
    fn test_months_between() {
        assert_eq!(months_between(date(2024, 3, 31), date(2024, 1, 1)), 2);
        assert_eq!(months_between(date(2024, 4, 1), date(2024, 1, 1)), 3);
        assert_eq!(months_between(date(2024, 1, 31), date(2024, 1, 1)), 0);
        assert_eq!(months_between(date(2024, 1, 1), date(2024, 4, 1)), -3);
    }

    #[test]
    fn test_format_month() {
        assert_eq!(format_month(date(2025, 7, 9)), "07/2025");
        assert_eq!(add_months(date(2025, 1, 1), -1), date(2024, 12, 1));
    }
}
