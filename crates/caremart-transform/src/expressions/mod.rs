//! Utility expression library.
//!
//! Every derived value in the staging and mart layers is computed by exactly
//! one function in this module:
//! - **dates**: flexible date parsing, age, day differences, fiscal quarters
//! - **numeric**: safe casts, null-safe division and percentages, currency
//! - **text**: trimming, case normalization, phone and email checks
//! - **categories**: bucketing and vocabulary mapping

pub mod categories;
pub mod dates;
pub mod numeric;
pub mod text;

pub use categories::{
    age_group, care_category, efficiency_category, emergency_category, interpret_result,
    is_cancelled_status, is_completed_status, is_emergency_visit, lab_status,
    utilization_category, visit_length_category,
};
pub use dates::{calculate_age, days_between, fiscal_quarter, parse_date};
pub use numeric::{
    format_currency, is_abnormal, parse_integer, parse_number, percentage, round_to, safe_divide,
};
pub use text::{
    clean_text, initcap, is_valid_email, is_valid_phone, lower_text, normalize_phone, parse_flag,
    upper_text,
};
