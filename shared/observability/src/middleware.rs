//! HTTP middleware for request/response logging.
//!
//! Provides actix-web middleware that:
//! - Assigns every request a request id (reusing `x-request-id` when present)
//! - Logs responses with structured fields and duration
//! - Echoes the request id on the response

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    time::Instant,
};
use tracing::{error, info, span, warn, Instrument, Level};

use crate::request_context::{RequestContext, REQUEST_ID_HEADER};

/// Configuration for request logging middleware
#[derive(Debug, Clone)]
pub struct RequestLoggingConfig {
    /// Service name for log attribution
    pub service_name: String,
    /// Exact request paths that bypass logging and request ids
    pub exclude_paths: Vec<String>,
    /// Threshold in ms for slow request warnings
    pub slow_request_threshold_ms: u64,
}

impl Default for RequestLoggingConfig {
    fn default() -> Self {
        Self {
            service_name: "chargecast".to_string(),
            exclude_paths: vec!["/health".to_string(), "/favicon.ico".to_string()],
            slow_request_threshold_ms: 500,
        }
    }
}

impl RequestLoggingConfig {
    pub fn for_service(name: impl Into<String>) -> Self {
        Self {
            service_name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_slow_threshold(mut self, ms: u64) -> Self {
        self.slow_request_threshold_ms = ms;
        self
    }
}

/// Request logging middleware for actix-web
#[derive(Clone)]
pub struct RequestLogging {
    config: RequestLoggingConfig,
}

impl RequestLogging {
    pub fn new(config: RequestLoggingConfig) -> Self {
        Self { config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggingService {
            service: Rc::new(service),
            config: self.config.clone(),
        }))
    }
}

pub struct RequestLoggingService<S> {
    service: Rc<S>,
    config: RequestLoggingConfig,
}

impl<S, B> Service<ServiceRequest> for RequestLoggingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let config = self.config.clone();
        let service = self.service.clone();

        Box::pin(async move {
            let path = req.path().to_string();
            let method = req.method().to_string();

            if config.exclude_paths.iter().any(|p| *p == path) {
                return service.call(req).await;
            }

            let ctx = RequestContext::from_request(req.request());
            req.extensions_mut().insert(ctx.clone());

            let request_span = span!(
                Level::INFO,
                "http_request",
                request_id = %ctx.request_id,
                method = %method,
                path = %path,
                service = %config.service_name,
            );

            let start = Instant::now();
            let result = service.call(req).instrument(request_span).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(mut res) => {
                    let status_code = res.status().as_u16();

                    if let Ok(value) = HeaderValue::from_str(&ctx.request_id) {
                        res.headers_mut()
                            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                    }

                    if status_code >= 500 {
                        error!(
                            request_id = %ctx.request_id,
                            status = status_code,
                            duration_ms = duration_ms,
                            "← {} {} {} {}ms",
                            method, path, status_code, duration_ms
                        );
                    } else if status_code >= 400 {
                        warn!(
                            request_id = %ctx.request_id,
                            status = status_code,
                            duration_ms = duration_ms,
                            "← {} {} {} {}ms",
                            method, path, status_code, duration_ms
                        );
                    } else if duration_ms > config.slow_request_threshold_ms {
                        warn!(
                            request_id = %ctx.request_id,
                            status = status_code,
                            duration_ms = duration_ms,
                            "← SLOW {} {} {} {}ms",
                            method, path, status_code, duration_ms
                        );
                    } else {
                        info!(
                            request_id = %ctx.request_id,
                            status = status_code,
                            duration_ms = duration_ms,
                            "← {} {} {} {}ms",
                            method, path, status_code, duration_ms
                        );
                    }

                    Ok(res)
                }
                Err(e) => {
                    error!(
                        request_id = %ctx.request_id,
                        duration_ms = duration_ms,
                        error = %e,
                        "← {} {} ERROR {}ms: {}",
                        method, path, duration_ms, e
                    );
                    Err(e)
                }
            }
        })
    }
}

/// Request logging for a service, warning on successful requests slower than
/// `slow_request_threshold_ms`.
pub fn request_logging(
    service_name: impl Into<String>,
    slow_request_threshold_ms: u64,
) -> RequestLogging {
    RequestLogging::new(
        RequestLoggingConfig::for_service(service_name).with_slow_threshold(slow_request_threshold_ms),
    )
}
