//! Request inspection helpers

use crate::core::AppRequest;

/// Retrieves the value of a specific header from the request.
///
/// Returns `None` if the header is not present or its value is not valid
/// UTF-8.
pub fn header_value<'a>(request: &'a AppRequest, key: &str) -> Option<&'a str> {
    request.headers().get(key).and_then(|value| value.to_str().ok())
}

/// Retrieves the `Accept` header used for content negotiation.
pub fn accept_header(request: &AppRequest) -> Option<&str> {
    header_value(request, "accept")
}
