//! Error types for transformation and materialization.

use caremart_ingest::IngestError;
use caremart_model::RelationName;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("failed to build {relation}: {message}")]
    Frame {
        relation: RelationName,
        message: String,
    },

    #[error("DataFrame error: {0}")]
    DataFrame(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
