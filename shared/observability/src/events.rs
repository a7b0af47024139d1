//! Structured events for model lifecycle and prediction outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of an operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Rejected,
    Unavailable,
    Failure,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Rejected => write!(f, "rejected"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Model,
    Prediction,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Prediction => write!(f, "prediction"),
        }
    }
}

/// A structured event for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEvent {
    pub timestamp: DateTime<Utc>,
    pub category: EventCategory,
    /// Specific event type (e.g. "model_loaded", "prediction_served")
    pub event_type: String,
    pub outcome: Outcome,
    pub duration_ms: Option<u64>,
    pub error: Option<String>,
    pub request_id: Option<String>,
    /// Service that emitted the event
    pub service: String,
    /// Additional structured metadata
    pub metadata: Option<serde_json::Value>,
}

impl ServiceEvent {
    pub fn new(
        service: impl Into<String>,
        category: EventCategory,
        event_type: impl Into<String>,
    ) -> ServiceEventBuilder {
        ServiceEventBuilder {
            service: service.into(),
            category,
            event_type: event_type.into(),
            outcome: Outcome::Success,
            duration_ms: None,
            error: None,
            request_id: None,
            metadata: None,
        }
    }
}

/// Builder for constructing service events
pub struct ServiceEventBuilder {
    service: String,
    category: EventCategory,
    event_type: String,
    outcome: Outcome,
    duration_ms: Option<u64>,
    error: Option<String>,
    request_id: Option<String>,
    metadata: Option<serde_json::Value>,
}

impl ServiceEventBuilder {
    pub fn success(mut self) -> Self {
        self.outcome = Outcome::Success;
        self
    }

    /// Mark the event with a non-success outcome and its error text.
    pub fn outcome(mut self, outcome: Outcome, error: impl Into<String>) -> Self {
        self.outcome = outcome;
        self.error = Some(error.into());
        self
    }

    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Build and emit the event as a log
    pub fn emit(self) {
        let event = self.build();
        let json = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());

        match event.outcome {
            Outcome::Success => tracing::info!(
                target: "service_event",
                category = %event.category,
                event_type = %event.event_type,
                outcome = "success",
                "ServiceEvent: {}", json
            ),
            Outcome::Rejected => tracing::warn!(
                target: "service_event",
                category = %event.category,
                event_type = %event.event_type,
                outcome = "rejected",
                error = ?event.error,
                "ServiceEvent: {}", json
            ),
            Outcome::Unavailable | Outcome::Failure => tracing::error!(
                target: "service_event",
                category = %event.category,
                event_type = %event.event_type,
                outcome = %event.outcome,
                error = ?event.error,
                "ServiceEvent: {}", json
            ),
        }
    }

    /// Build the event without emitting
    pub fn build(self) -> ServiceEvent {
        ServiceEvent {
            timestamp: Utc::now(),
            category: self.category,
            event_type: self.event_type,
            outcome: self.outcome,
            duration_ms: self.duration_ms,
            error: self.error,
            request_id: self.request_id,
            service: self.service,
            metadata: self.metadata,
        }
    }
}

// ============================================================================
// Convenience functions for common events
// ============================================================================

/// Log a successful model load
pub fn log_model_loaded(service: &str, path: &str, description: &str, duration_ms: u64) {
    ServiceEvent::new(service, EventCategory::Model, "model_loaded")
        .duration_ms(duration_ms)
        .metadata(serde_json::json!({ "path": path, "model": description }))
        .success()
        .emit();
}

/// Log a failed model load; the service keeps running without a model
pub fn log_model_load_failed(service: &str, path: &str, error: &str) {
    ServiceEvent::new(service, EventCategory::Model, "model_load_failed")
        .metadata(serde_json::json!({ "path": path }))
        .outcome(Outcome::Failure, error)
        .emit();
}

/// Log the outcome of one prediction request
pub fn log_prediction(
    service: &str,
    request_id: Option<&str>,
    outcome: Outcome,
    duration_ms: u64,
    error: Option<&str>,
) {
    let event_type = match outcome {
        Outcome::Success => "prediction_served",
        Outcome::Unavailable => "prediction_unavailable",
        Outcome::Rejected | Outcome::Failure => "prediction_rejected",
    };

    let mut builder =
        ServiceEvent::new(service, EventCategory::Prediction, event_type).duration_ms(duration_ms);

    if let Some(id) = request_id {
        builder = builder.request_id(id);
    }

    builder = match error {
        Some(err) if outcome != Outcome::Success => builder.outcome(outcome, err),
        _ => builder.success(),
    };

    builder.emit();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_event_builder() {
        let event = ServiceEvent::new("test-service", EventCategory::Prediction, "prediction_served")
            .request_id("req-1")
            .duration_ms(3)
            .success()
            .build();

        assert_eq!(event.service, "test-service");
        assert_eq!(event.event_type, "prediction_served");
        assert_eq!(event.request_id, Some("req-1".to_string()));
        assert_eq!(event.outcome, Outcome::Success);
        assert!(event.error.is_none());
    }

    #[test]
    fn test_rejected_event_serializes_error() {
        let event = ServiceEvent::new("svc", EventCategory::Prediction, "prediction_rejected")
            .outcome(Outcome::Rejected, "Missing required field: age")
            .build();

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["outcome"], "rejected");
        assert_eq!(json["category"], "prediction");
        assert_eq!(json["error"], "Missing required field: age");
    }
}
