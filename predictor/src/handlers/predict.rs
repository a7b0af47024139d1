use actix_web::{web, HttpRequest, HttpResponse};
use chargecast_observability::{log_prediction, Outcome, RequestContextExt};
use std::time::Instant;

use crate::errors::PredictError;
use crate::models::PredictResponse;
use crate::services::PredictionService;
use crate::SERVICE_NAME;

/// `POST /predict`. The body is taken as raw bytes so malformed JSON is
/// reported through [`PredictError`] like every other bad input.
pub async fn predict_handler(
    req: HttpRequest,
    body: web::Bytes,
    service: web::Data<PredictionService>,
) -> Result<HttpResponse, PredictError> {
    let ctx = req.request_context();
    let start = Instant::now();

    let result = service.predict_body(&body);
    let duration_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => log_prediction(
            SERVICE_NAME,
            Some(ctx.request_id.as_str()),
            Outcome::Success,
            duration_ms,
            None,
        ),
        Err(e) => log_prediction(
            SERVICE_NAME,
            Some(ctx.request_id.as_str()),
            Outcome::Rejected,
            duration_ms,
            Some(e.to_string().as_str()),
        ),
    }

    let prediction = result?;
    Ok(HttpResponse::Ok().json(PredictResponse::success(prediction)))
}
