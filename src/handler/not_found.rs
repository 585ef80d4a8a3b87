//! Not Found handler
//!
//! Outputs a simple localized message in JSON, XML, or HTML based on the
//! Accept header. Carries no error chain and never consults the
//! detail-display setting: there is nothing sensitive to hide.

use http::StatusCode;

use crate::core::{AppRequest, AppResponse};
use crate::utils::response::content_type::{APPLICATION_JSON, APPLICATION_XML, TEXT_XML};
use crate::utils::response::ResponseBuilder;

use super::{determine_content_type, escape_html};

const MESSAGE: &str = "Not Found";
const MESSAGE_TITLE: &str = "Page Not Found";

/// Renders the 404 payload for routes the host could not match.
#[derive(Default)]
pub struct NotFoundHandler {
    base_url: Option<String>,
}

impl NotFoundHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the home-page URL linked from the HTML rendering.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Render the 404 response with the negotiated format.
    pub fn handle(&self, request: &AppRequest) -> AppResponse {
        let content_type = determine_content_type(request);
        let output = match content_type {
            APPLICATION_JSON => format!("{{\"message\":\"{MESSAGE}\"}}"),
            APPLICATION_XML | TEXT_XML => {
                format!("<root><message>{MESSAGE}</message></root>")
            }
            _ => self.render_html(),
        };

        ResponseBuilder::with_body(StatusCode::NOT_FOUND, content_type, output)
    }

    fn render_html(&self) -> String {
        let notice = "The page you are looking for could not be found. \
            Check the address bar to ensure your URL is spelled correctly.";

        let mut body = format!("<h1>{MESSAGE_TITLE}</h1>\n<p>{notice}</p>\n");
        if let Some(base_url) = &self.base_url {
            body.push_str(&format!(
                "<p><a href=\"{}\">Visit the Home Page</a></p>\n",
                escape_html(base_url)
            ));
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<title>{MESSAGE_TITLE}</title>\n</head>\n<body>\n{body}</body>\n</html>\n"
        )
    }
}
