use actix_web::{HttpRequest, HttpResponse};
use chargecast_observability::{log_prediction, Outcome, RequestContextExt};

use crate::errors::PredictError;
use crate::SERVICE_NAME;

/// Registered on `/predict` when no model was loaded at startup. Answers
/// before the body is read, so any request content gets the same response.
pub async fn unavailable_handler(req: HttpRequest) -> Result<HttpResponse, PredictError> {
    let ctx = req.request_context();
    let err = PredictError::ModelUnavailable;
    log_prediction(
        SERVICE_NAME,
        Some(ctx.request_id.as_str()),
        Outcome::Unavailable,
        0,
        Some(err.to_string().as_str()),
    );
    Err(err)
}
