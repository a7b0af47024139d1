use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::features::FeatureError;
use crate::inference::ModelError;
use crate::models::ErrorResponse;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Model not loaded")]
    ModelUnavailable,
    #[error(transparent)]
    BadInput(#[from] FeatureError),
    #[error(transparent)]
    InferenceFailed(#[from] ModelError),
}

impl PredictError {
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::ModelUnavailable => "model_unavailable",
            PredictError::BadInput(_) => "bad_input",
            PredictError::InferenceFailed(_) => "inference_failed",
        }
    }
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        match self {
            PredictError::ModelUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            PredictError::BadInput(_) | PredictError::InferenceFailed(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            PredictError::ModelUnavailable => ErrorResponse::bare(self.to_string()),
            _ => ErrorResponse::tagged(self.to_string(), self.kind()),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_model_unavailable_body() {
        let resp = PredictError::ModelUnavailable.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Model not loaded"}));
    }

    #[actix_web::test]
    async fn test_bad_input_body() {
        let err = PredictError::from(FeatureError::MissingField("age"));
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Missing required field: age");
        assert_eq!(json["status"], "error");
        assert_eq!(json["kind"], "bad_input");
    }

    #[test]
    fn test_inference_failure_is_client_error() {
        let err = PredictError::from(ModelError::EmptyOutput);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "inference_failed");
        assert_eq!(err.to_string(), "Model produced no output");
    }
}
