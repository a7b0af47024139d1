use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{check_width, ModelError, Regressor};

/// Ordinary least squares style model: `intercept + coefficients · row`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("linear model has no coefficients".to_string());
        }
        if let Some(i) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(format!("coefficient {} is not finite", i));
        }
        if !self.intercept.is_finite() {
            return Err("intercept is not finite".to_string());
        }
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn describe(&self) -> String {
        format!("linear({} coefficients)", self.coefficients.len())
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError> {
        check_width(&rows, self.n_features())?;
        let weights = Array1::from(self.coefficients.clone());
        Ok(rows.dot(&weights) + self.intercept)
    }
}
