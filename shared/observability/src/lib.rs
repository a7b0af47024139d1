//! ChargeCast Observability Library
//!
//! Logging and request tracing shared by the ChargeCast services.
//!
//! # Features
//! - Pretty or JSON structured logging selected per environment
//! - Request id assignment and propagation via `x-request-id`
//! - HTTP middleware for response logging and slow request detection
//! - Structured model and prediction events

pub mod events;
pub mod init;
pub mod middleware;
pub mod request_context;

pub use events::*;
pub use init::*;
pub use middleware::*;
pub use request_context::*;

// Re-export tracing for convenience
pub use tracing::{debug, error, info, trace, warn};
