//! Date parsing and calendar arithmetic.
//!
//! Seed files are exported by different systems, so dates arrive in a handful
//! of layouts. Everything is reduced to a [`NaiveDate`]; time components are
//! discarded.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", // ISO 8601
    "%Y/%m/%d",
    "%m/%d/%Y", // US
    "%m-%d-%Y",
    "%d-%b-%Y", // 15-Jan-2024
    "%d %b %Y",
];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a date in any supported layout.
///
/// Returns `None` for blank or unrecognized input. Datetimes (with or without
/// a trailing `Z`) are truncated to their date.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use caremart_transform::expressions::parse_date;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
/// assert_eq!(parse_date("2024-03-05"), expected);
/// assert_eq!(parse_date("03/05/2024"), expected);
/// assert_eq!(parse_date("2024-03-05T08:15:00Z"), expected);
/// assert_eq!(parse_date("not a date"), None);
/// ```
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    let without_zone = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(without_zone, format).ok())
        .map(|dt| dt.date())
}

/// Whole years between `date_of_birth` and `reference_date`, floored.
///
/// A birthday later in the reference year has not happened yet. A birth date
/// after the reference date yields a negative age.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use caremart_transform::expressions::calculate_age;
///
/// let dob = NaiveDate::from_ymd_opt(1980, 7, 1).unwrap();
/// let before = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
/// let on = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
/// assert_eq!(calculate_age(dob, before), 43);
/// assert_eq!(calculate_age(dob, on), 44);
/// ```
pub fn calculate_age(date_of_birth: NaiveDate, reference_date: NaiveDate) -> i64 {
    let years = i64::from(reference_date.year()) - i64::from(date_of_birth.year());
    let birthday_pending =
        (reference_date.month(), reference_date.day()) < (date_of_birth.month(), date_of_birth.day());
    if reference_date >= date_of_birth {
        if birthday_pending { years - 1 } else { years }
    } else {
        -calculate_age(reference_date, date_of_birth)
    }
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Fiscal quarter label such as `FY2024 Q1`.
///
/// `start_month` is the first month (1-12) of the fiscal year. When the fiscal
/// year does not start in January it is named after the calendar year in which
/// it ends. Out-of-range start months are clamped into 1-12.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use caremart_transform::expressions::fiscal_quarter;
///
/// let date = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
/// assert_eq!(fiscal_quarter(date, 1), "FY2024 Q3");
/// assert_eq!(fiscal_quarter(date, 7), "FY2025 Q1");
/// ```
pub fn fiscal_quarter(date: NaiveDate, start_month: u32) -> String {
    let start = start_month.clamp(1, 12);
    let month = date.month();
    let offset = (month + 12 - start) % 12;
    let quarter = offset / 3 + 1;
    let fiscal_year = if start != 1 && month >= start {
        date.year() + 1
    } else {
        date.year()
    };
    format!("FY{fiscal_year} Q{quarter}")
}
