use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: f64,
    pub status: String,
}

impl PredictResponse {
    pub fn success(prediction: f64) -> Self {
        Self {
            prediction,
            status: "success".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ErrorResponse {
    /// `{"error": ...}` only.
    pub fn bare(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            status: None,
            kind: None,
        }
    }

    /// `{"error": ..., "status": "error", "kind": ...}`
    pub fn tagged(error: impl Into<String>, kind: &str) -> Self {
        Self {
            error: error.into(),
            status: Some("error".to_string()),
            kind: Some(kind.to_string()),
        }
    }
}

/// Load state of the model, shared read-only with the health handler.
#[derive(Debug, Clone, Default)]
pub struct ModelStatus {
    pub loaded: bool,
}
