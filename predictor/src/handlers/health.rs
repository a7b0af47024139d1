use actix_web::{web, HttpResponse};

use crate::models::{HealthResponse, ModelStatus};

pub async fn health_handler(status: web::Data<ModelStatus>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: status.loaded,
    })
}
