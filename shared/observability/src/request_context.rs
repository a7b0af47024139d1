//! Per-request identifiers carried through the request extensions.

use actix_web::{HttpMessage, HttpRequest};
use std::fmt;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied request id we accept; longer values are replaced.
const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    /// Create a context with a fresh request id
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }

    /// Reuse the caller's `x-request-id` when it is printable ASCII, otherwise
    /// mint a new one.
    pub fn from_request(req: &HttpRequest) -> Self {
        req.headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| is_acceptable_id(id))
            .map(|id| Self {
                request_id: id.to_string(),
            })
            .unwrap_or_default()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request_id={}", self.request_id)
    }
}

fn is_acceptable_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Extension trait to get the RequestContext from actix-web requests
pub trait RequestContextExt {
    fn request_context(&self) -> RequestContext;
}

impl RequestContextExt for HttpRequest {
    fn request_context(&self) -> RequestContext {
        if let Some(ctx) = self.extensions().get::<RequestContext>() {
            return ctx.clone();
        }
        RequestContext::from_request(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_new_context_has_uuid() {
        let ctx = RequestContext::new();
        assert!(Uuid::parse_str(&ctx.request_id).is_ok());
    }

    #[test]
    fn test_header_is_reused() {
        let req = TestRequest::default()
            .insert_header((REQUEST_ID_HEADER, "abc-123"))
            .to_http_request();
        assert_eq!(RequestContext::from_request(&req).request_id, "abc-123");
    }

    #[test]
    fn test_unprintable_header_is_replaced() {
        let req = TestRequest::default()
            .insert_header((REQUEST_ID_HEADER, "has space"))
            .to_http_request();
        let ctx = RequestContext::from_request(&req);
        assert_ne!(ctx.request_id, "has space");
        assert!(Uuid::parse_str(&ctx.request_id).is_ok());
    }

    #[test]
    fn test_extension_wins_over_header() {
        let req = TestRequest::default()
            .insert_header((REQUEST_ID_HEADER, "from-header"))
            .to_http_request();
        req.extensions_mut().insert(RequestContext {
            request_id: "from-middleware".to_string(),
        });
        assert_eq!(req.request_context().request_id, "from-middleware");
    }
}
