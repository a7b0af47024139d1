use std::sync::Arc;
use std::time::Instant;

use chargecast_config::PredictorConfig;
use chargecast_observability::{log_model_load_failed, log_model_loaded};

use crate::features::FEATURE_COUNT;
use crate::inference::{load_model, Regressor};
use crate::models::ModelStatus;
use crate::services::PredictionService;
use crate::SERVICE_NAME;

/// Everything the handlers need, built once before the server starts and
/// cloned into each worker.
#[derive(Clone)]
pub struct AppState {
    pub prediction: Option<Arc<PredictionService>>,
    pub status: ModelStatus,
}

impl AppState {
    /// Load the model named by the configuration. A load failure is logged and
    /// leaves the state without a model rather than aborting startup.
    pub fn load(config: &PredictorConfig) -> Self {
        let path = config.model_path.display().to_string();
        let start = Instant::now();

        match load_model(&config.model_path, FEATURE_COUNT) {
            Ok(model) => {
                log_model_loaded(
                    SERVICE_NAME,
                    &path,
                    &model.describe(),
                    start.elapsed().as_millis() as u64,
                );
                Self::with_model(model, config.strict_region)
            }
            Err(e) => {
                log_model_load_failed(SERVICE_NAME, &path, &e.to_string());
                tracing::warn!("Service will start but prediction requests will fail");
                Self::without_model()
            }
        }
    }

    pub fn with_model(model: Arc<dyn Regressor>, strict_region: bool) -> Self {
        Self {
            prediction: Some(Arc::new(PredictionService::new(model, strict_region))),
            status: ModelStatus { loaded: true },
        }
    }

    pub fn without_model() -> Self {
        Self {
            prediction: None,
            status: ModelStatus { loaded: false },
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.prediction.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_model_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let config = PredictorConfig {
            model_path: dir.path().join("model.json"),
            ..Default::default()
        };

        let state = AppState::load(&config);

        assert!(!state.model_loaded());
        assert!(!state.status.loaded);
    }

    #[test]
    fn test_valid_model_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"kind": "linear", "coefficients": [0, 0, 0, 0, 0, 0, 0, 0], "intercept": 3.0}"#,
        )
        .unwrap();
        let config = PredictorConfig {
            model_path: file.path().to_path_buf(),
            ..Default::default()
        };

        let state = AppState::load(&config);

        assert!(state.model_loaded());
        assert!(state.status.loaded);
    }
}
