//! Insurance charge prediction service.
//!
//! Loads a regression model once at startup and scores requests on
//! `POST /predict`. When the model cannot be loaded the service still starts,
//! answers `GET /health`, and fails every prediction with "Model not loaded".

pub mod errors;
pub mod features;
pub mod handlers;
pub mod inference;
pub mod models;
pub mod services;
pub mod state;

use actix_cors::Cors;
use actix_web::web;

use handlers::{health_handler, predict_handler, unavailable_handler};
use state::AppState;

pub const SERVICE_NAME: &str = "chargecast-predictor";

/// Route table for one worker. `/predict` is bound to the real handler only
/// when a model is loaded.
pub fn routes(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state.status.clone()))
            .route("/health", web::get().to(health_handler));

        match state.prediction {
            Some(service) => {
                cfg.app_data(web::Data::from(service))
                    .route("/predict", web::post().to(predict_handler));
            }
            None => {
                cfg.route("/predict", web::post().to(unavailable_handler));
            }
        }
    }
}

/// Cross-origin requests are accepted from anywhere.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
}
