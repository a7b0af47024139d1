use actix_web::{App, HttpServer};
use anyhow::Context;

use chargecast_config::PredictorConfig;
use chargecast_observability::{init_tracing, request_logging, TracingConfig};
use chargecast_predictor::{cors, routes, state::AppState, SERVICE_NAME};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = PredictorConfig::from_env().context("invalid predictor configuration")?;

    // Initialize logging
    init_tracing(TracingConfig::for_service(SERVICE_NAME, config.env_mode.as_str()));

    // Load the model once; a failure leaves the service in degraded mode
    tracing::info!(path = %config.model_path.display(), "Loading model");
    let state = AppState::load(&config);

    let (host, port) = config.bind_address();
    tracing::info!(
        host = %host,
        port = port,
        model_loaded = state.model_loaded(),
        workers = ?config.workers,
        env_mode = config.env_mode.as_str(),
        "Starting prediction service"
    );

    let slow_request_ms = config.slow_request_ms;
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(request_logging(SERVICE_NAME, slow_request_ms))
            .configure(routes(state.clone()))
    });

    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    server
        .bind((host.as_str(), port))
        .with_context(|| format!("failed to bind {}:{}", host, port))?
        .run()
        .await?;

    tracing::info!("Prediction service stopped");
    Ok(())
}
