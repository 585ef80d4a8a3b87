//! Error handler
//!
//! Renders a caught error chain in JSON, XML, or HTML based on the Accept
//! header, with detail suppression in production mode: when details are
//! suppressed the full chain goes to the operational error log instead of
//! the response body.

use http::StatusCode;
use serde::Serialize;

use crate::core::{AppRequest, AppResponse};
use crate::utils::response::content_type::{APPLICATION_JSON, APPLICATION_XML, TEXT_XML};
use crate::utils::response::ResponseBuilder;

use super::{cdata_section, determine_content_type, escape_html, ErrorChain, ErrorRecord};

const MESSAGE_TITLE: &str = "Application Error";

/// Renders caught error chains for the host's top-level error boundary.
pub struct ErrorHandler {
    display_details: bool,
}

#[derive(Serialize)]
struct JsonPayload<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a [ErrorRecord]>,
}

impl ErrorHandler {
    pub fn new(display_details: bool) -> Self {
        Self { display_details }
    }

    /// Whether error details are rendered into the response body.
    pub fn display_details(&self) -> bool {
        self.display_details
    }

    /// Render the chain with the negotiated format.
    ///
    /// Total: every chain renders to completion. The response status is
    /// fixed at 500 with a `Content-Type` matching the negotiated format.
    pub fn handle(&self, request: &AppRequest, chain: &ErrorChain) -> AppResponse {
        let content_type = determine_content_type(request);
        let output = match content_type {
            APPLICATION_JSON => self.render_json(chain),
            APPLICATION_XML | TEXT_XML => self.render_xml(chain),
            _ => self.render_html(chain),
        };

        self.write_to_error_log(chain);

        ResponseBuilder::with_body(StatusCode::INTERNAL_SERVER_ERROR, content_type, output)
    }

    /// Write a plain-text rendering of the full chain to the error log when
    /// details are suppressed from the response. Skipped when details are
    /// shown: the caller already sees everything.
    fn write_to_error_log(&self, chain: &ErrorChain) {
        if self.display_details {
            return;
        }

        let mut message = format!("{MESSAGE_TITLE}:\n");
        for (i, record) in chain.records().iter().enumerate() {
            if i > 0 {
                message.push_str("\nPrevious exception:\n");
            }
            message.push_str(&render_text_record(record));
        }
        message.push_str("\nView in rendered output by enabling the \"display_error_details\" setting.\n");

        log::error!("{message}");
    }

    fn render_json(&self, chain: &ErrorChain) -> String {
        let payload = JsonPayload {
            message: MESSAGE_TITLE,
            error: self.display_details.then(|| chain.records()),
        };

        serde_json::to_string_pretty(&payload).unwrap_or_else(|e| {
            log::error!("Failed to serialize error payload: {e}");
            format!("{{\n    \"message\": \"{MESSAGE_TITLE}\"\n}}")
        })
    }

    fn render_xml(&self, chain: &ErrorChain) -> String {
        let mut xml = format!("<error>\n  <message>{MESSAGE_TITLE}</message>\n");
        if self.display_details {
            for record in chain.records() {
                xml.push_str("  <exception>\n");
                xml.push_str(&format!("    <type>{}</type>\n", record.type_name));
                xml.push_str(&format!("    <code>{}</code>\n", record.code));
                xml.push_str(&format!(
                    "    <message>{}</message>\n",
                    cdata_section(&record.message)
                ));
                xml.push_str(&format!("    <file>{}</file>\n", record.file));
                xml.push_str(&format!("    <line>{}</line>\n", record.line));
                xml.push_str(&format!(
                    "    <trace>{}</trace>\n",
                    cdata_section(&record.trace.join("\n"))
                ));
                xml.push_str("  </exception>\n");
            }
        }
        xml.push_str("</error>");
        xml
    }

    fn render_html(&self, chain: &ErrorChain) -> String {
        let body = if self.display_details {
            let mut html =
                String::from("<p>The application could not run because of the following error:</p>");
            for (i, record) in chain.records().iter().enumerate() {
                html.push_str(if i == 0 {
                    "<h2>Details</h2>"
                } else {
                    "<h2>Previous Exception</h2>"
                });
                html.push_str(&render_html_record(record));
            }
            html
        } else {
            String::from(
                "<p>A website error has occurred. Sorry for the temporary inconvenience.</p>",
            )
        };

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<title>{MESSAGE_TITLE}</title>\n</head>\n<body>\n<h1>{MESSAGE_TITLE}</h1>\n{body}\n</body>\n</html>\n"
        )
    }
}

/// Render one chain element as plain text, omitting empty fields.
fn render_text_record(record: &ErrorRecord) -> String {
    let mut text = format!("Type: {}\n", record.type_name);

    if record.code != 0 {
        text.push_str(&format!("Code: {}\n", record.code));
    }
    if !record.message.is_empty() {
        text.push_str(&format!("Message: {}\n", record.message));
    }
    if !record.file.is_empty() {
        text.push_str(&format!("File: {}\n", record.file));
    }
    if record.line != 0 {
        text.push_str(&format!("Line: {}\n", record.line));
    }
    if !record.trace.is_empty() {
        text.push_str(&format!("Trace: {}\n", record.trace.join("\n")));
    }

    text
}

/// Render one chain element as HTML, omitting empty fields.
fn render_html_record(record: &ErrorRecord) -> String {
    let mut html = format!(
        "<div><strong>Type:</strong> {}</div>",
        escape_html(&record.type_name)
    );

    if record.code != 0 {
        html.push_str(&format!("<div><strong>Code:</strong> {}</div>", record.code));
    }
    if !record.message.is_empty() {
        html.push_str(&format!(
            "<div><strong>Message:</strong> {}</div>",
            escape_html(&record.message)
        ));
    }
    if !record.file.is_empty() {
        html.push_str(&format!(
            "<div><strong>File:</strong> {}</div>",
            escape_html(&record.file)
        ));
    }
    if record.line != 0 {
        html.push_str(&format!("<div><strong>Line:</strong> {}</div>", record.line));
    }
    if !record.trace.is_empty() {
        html.push_str("<h2>Trace</h2>");
        html.push_str(&format!(
            "<pre>{}</pre>",
            escape_html(&record.trace.join("\n"))
        ));
    }

    html
}
