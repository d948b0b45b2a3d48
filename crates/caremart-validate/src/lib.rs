//! Data tests for materialized caremart relations.
//!
//! Tests are declared as data ([`DataTest`]) and evaluated against Polars
//! DataFrames keyed by relation name. The result is a
//! [`caremart_model::TestReport`] that counts offending rows per test.

mod checks;
mod runner;
mod suite;
mod util;

pub use checks::CheckOutcome;
pub use runner::{run_default_suite, run_tests};
pub use suite::{DataTest, Expectation, TestKind, default_suite};
