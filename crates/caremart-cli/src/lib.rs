//! Library components of the `caremart` command line.

pub mod logging;
pub mod pipeline;
pub mod project;
