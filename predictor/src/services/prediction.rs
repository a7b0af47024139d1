use std::sync::Arc;

use crate::errors::PredictError;
use crate::features::PredictionRequest;
use crate::inference::{ModelError, Regressor};

/// Scores requests with a loaded model. Holds no mutable state, so one
/// instance serves every worker.
pub struct PredictionService {
    model: Arc<dyn Regressor>,
    strict_region: bool,
}

impl PredictionService {
    pub fn new(model: Arc<dyn Regressor>, strict_region: bool) -> Self {
        Self {
            model,
            strict_region,
        }
    }

    /// Parse a raw body and score it.
    pub fn predict_body(&self, body: &[u8]) -> Result<f64, PredictError> {
        let request = PredictionRequest::from_slice(body, self.strict_region)?;
        Ok(self.predict(&request)?)
    }

    /// Score one request. The model was trained on `log10(charges)`, so its raw
    /// output is mapped back with `10^raw`.
    pub fn predict(&self, request: &PredictionRequest) -> Result<f64, ModelError> {
        let row = request.features().to_row();
        let outputs = self.model.predict(row.view())?;
        let raw = outputs.get(0).copied().ok_or(ModelError::EmptyOutput)?;

        let prediction = inverse_log10(raw);
        if !prediction.is_finite() {
            return Err(ModelError::NonFinite { raw });
        }

        tracing::debug!(raw, prediction, "scored request");
        Ok(prediction)
    }
}

pub fn inverse_log10(raw: f64) -> f64 {
    10f64.powf(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Region, Sex, FEATURE_COUNT};
    use ndarray::{Array1, ArrayView2};

    struct Constant(f64);

    impl Regressor for Constant {
        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }

        fn describe(&self) -> String {
            "constant".to_string()
        }

        fn predict(&self, rows: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError> {
            Ok(Array1::from_elem(rows.nrows(), self.0))
        }
    }

    struct Empty;

    impl Regressor for Empty {
        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }

        fn describe(&self) -> String {
            "empty".to_string()
        }

        fn predict(&self, _rows: ArrayView2<'_, f64>) -> Result<Array1<f64>, ModelError> {
            Ok(Array1::zeros(0))
        }
    }

    fn request() -> PredictionRequest {
        PredictionRequest {
            age: 40.0,
            bmi: 30,
            children: 2,
            sex: Sex::Male,
            smoker: false,
            region: Region::Northwest,
        }
    }

    #[test]
    fn test_inverse_log_transform() {
        let service = PredictionService::new(Arc::new(Constant(2.0)), false);
        let prediction = service.predict(&request()).unwrap();
        assert!((prediction - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_raw_output() {
        let service = PredictionService::new(Arc::new(Constant(-1.0)), false);
        let prediction = service.predict(&request()).unwrap();
        assert!((prediction - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_overflow_is_inference_failure() {
        let service = PredictionService::new(Arc::new(Constant(400.0)), false);
        let err = service.predict(&request()).unwrap_err();
        assert_eq!(err, ModelError::NonFinite { raw: 400.0 });
    }

    #[test]
    fn test_empty_output_is_inference_failure() {
        let service = PredictionService::new(Arc::new(Empty), false);
        assert_eq!(service.predict(&request()).unwrap_err(), ModelError::EmptyOutput);
    }

    #[test]
    fn test_predict_body_tags_errors() {
        let service = PredictionService::new(Arc::new(Constant(1.0)), false);

        let err = service.predict_body(br#"{"age": 30}"#).unwrap_err();
        assert_eq!(err.kind(), "bad_input");

        let ok = service
            .predict_body(
                br#"{"age": 30, "bmi": 22.4, "children": 1, "sex": "male", "smoker": "no", "region": "southeast"}"#,
            )
            .unwrap();
        assert!((ok - 10.0).abs() < 1e-9);
    }
}
