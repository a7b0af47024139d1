//! Regression models the service can score with.
//!
//! The service only ever talks to a model through [`Regressor`]; the concrete
//! types here are what a JSON artifact deserializes into.

pub mod artifact;
pub mod linear;
pub mod tree;

use ndarray::{Array1, ArrayView2};
use thiserror::Error;

pub use artifact::{load_model, LoadError, ModelArtifact};
pub use linear::LinearModel;
pub use tree::{Aggregation, Tree, TreeEnsemble, TreeNode};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("Model expects {expected} features per row, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },
    #[error("Model produced no output")]
    EmptyOutput,
    #[error("Prediction is not a finite number (raw model output {raw})")]
    NonFinite { raw: f64 },
    #[error("Model evaluation failed: {0}")]
    Evaluation(String),
}

/// A pre-trained regressor. Implementations are immutable once built and are
/// shared across worker threads.
pub trait Regressor: Send + Sync {
    /// Number of columns each input row must have.
    fn n_features(&self) -> usize;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;

    /// Score every row of `rows`, returning one output per row.
    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError>;
}

pub(crate) fn check_width(rows: &ArrayView2<'_, f64>, expected: usize) -> Result<(), ModelError> {
    let actual = rows.ncols();
    if actual != expected {
        return Err(ModelError::FeatureMismatch { expected, actual });
    }
    Ok(())
}
