//! Materialized relation frames.

use polars::prelude::DataFrame;

use caremart_model::{CREATED_AT, Layer, RelationName, UPDATED_AT};

/// A relation rendered as a Polars DataFrame in catalog column order.
#[derive(Debug, Clone)]
pub struct RelationFrame {
    pub name: RelationName,
    pub data: DataFrame,
}

impl RelationFrame {
    pub fn new(name: RelationName, data: DataFrame) -> Self {
        Self { name, data }
    }

    /// Returns the number of rows in the frame.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    pub fn layer(&self) -> Layer {
        self.name.layer()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// The frame without the wall-clock metadata columns, for comparing runs.
    pub fn without_metadata(&self) -> DataFrame {
        let mut data = self.data.clone();
        for column in [CREATED_AT, UPDATED_AT] {
            if let Ok(dropped) = data.drop(column) {
                data = dropped;
            }
        }
        data
    }
}
