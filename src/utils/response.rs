//! Unified response building utilities
//!
//! This module provides a consistent interface for building responses across
//! the handlers and route dispatchers.

use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use serde::Serialize;

use crate::core::AppResponse;

/// Standard content types
pub mod content_type {
    pub const TEXT_PLAIN: &str = "text/plain";
    pub const TEXT_HTML: &str = "text/html";
    pub const TEXT_XML: &str = "text/xml";
    pub const APPLICATION_JSON: &str = "application/json";
    pub const APPLICATION_XML: &str = "application/xml";
}

/// Unified response builder for handler and dispatch output
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Build a response with the given status, content type, and body.
    ///
    /// Total: an invalid content-type string is logged and dropped rather
    /// than failing the response.
    pub fn with_body(status: StatusCode, content_type: &str, body: impl Into<Bytes>) -> AppResponse {
        let mut response = http::Response::new(body.into());
        *response.status_mut() = status;

        match HeaderValue::from_str(content_type) {
            Ok(value) => {
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            }
            Err(e) => {
                log::error!("Invalid content type '{content_type}': {e}");
            }
        }

        response
    }

    /// Build an HTML response
    pub fn html(status: StatusCode, body: impl Into<Bytes>) -> AppResponse {
        Self::with_body(status, content_type::TEXT_HTML, body)
    }

    /// Build a plain-text response
    pub fn text(status: StatusCode, message: &str) -> AppResponse {
        Self::with_body(status, content_type::TEXT_PLAIN, message.as_bytes().to_vec())
    }

    /// Build a JSON response from any serializable value
    pub fn json<T: Serialize>(status: StatusCode, data: &T) -> AppResponse {
        match serde_json::to_vec(data) {
            Ok(body) => Self::with_body(status, content_type::APPLICATION_JSON, body),
            Err(e) => {
                log::error!("Failed to serialize JSON response: {e}");
                Self::text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "JSON serialization failed",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_response() {
        let response = ResponseBuilder::html(StatusCode::OK, "<h1>OK</h1>");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            content_type::TEXT_HTML
        );
        assert_eq!(response.body(), "<h1>OK</h1>");
    }

    #[test]
    fn test_json_response() {
        use serde_json::json;
        let data = json!({"message": "success", "code": 200});
        let response = ResponseBuilder::json(StatusCode::OK, &data);
        assert_eq!(response.status(), StatusCode::OK);
        let expected = r#"{"code":200,"message":"success"}"#;
        assert_eq!(response.body(), expected.as_bytes());
    }

    #[test]
    fn test_text_response() {
        let response = ResponseBuilder::text(StatusCode::BAD_REQUEST, "Missing parameter");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body(), "Missing parameter");
    }
}
