//! Error taxonomy: load failures, undefined ratios. Data-quality issues live in
//! [`crate::data::quality`] since they never abort a computation.

use serde::{Serialize, Serializer};
use std::path::PathBuf;
use thiserror::Error;

/// One or more of the four input files is missing or unparseable.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Missing { path } | LoadError::Csv { path, .. } | LoadError::Io { path, .. } => {
                path
            }
        }
    }
}

/// A ratio whose denominator summed to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{numerator} / {denominator} is undefined: denominator is zero")]
pub struct DivisionUndefined {
    pub numerator: &'static str,
    pub denominator: &'static str,
}

/// Ratio value handed to the presentation layer.
pub type Ratio = Result<f64, DivisionUndefined>;

/// Divide, refusing a zero denominator.
pub fn ratio(
    numerator: f64,
    denominator: f64,
    labels: (&'static str, &'static str),
) -> Ratio {
    if denominator == 0.0 {
        return Err(DivisionUndefined {
            numerator: labels.0,
            denominator: labels.1,
        });
    }
    Ok(numerator / denominator)
}

/// Serialize a [`Ratio`] as a number, or `null` when undefined.
pub fn serialize_ratio<S: Serializer>(value: &Ratio, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Ok(v) => v.serialize(serializer),
        Err(_) => serializer.serialize_none(),
    }
}
