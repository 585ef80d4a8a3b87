//! Error and not-found handlers
//!
//! Handlers consume what the rest of the layer produces: a caught error
//! chain (or a missed route) plus the inbound request, and render a
//! negotiated JSON, XML, or HTML payload back to the host. They are total:
//! every chain, however deep, renders to completion without failing.

pub mod error;
pub mod not_found;

use serde::Serialize;

use crate::core::AppRequest;
use crate::utils::request::accept_header;
use crate::utils::response::content_type::{
    APPLICATION_JSON, APPLICATION_XML, TEXT_HTML, TEXT_XML,
};

pub use error::ErrorHandler;
pub use not_found::NotFoundHandler;

/// One element of a causal error chain.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    #[serde(rename = "type")]
    pub type_name: String,
    pub code: i64,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub trace: Vec<String>,
}

impl ErrorRecord {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            code: 0,
            message: message.into(),
            file: String::new(),
            line: 0,
            trace: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }

    pub fn with_trace(mut self, trace: Vec<String>) -> Self {
        self.trace = trace;
        self
    }
}

/// A chain of causally-linked errors, ordered from outermost to root cause.
///
/// Built once at catch time; renderers iterate the sequence rather than
/// re-walking source pointers.
#[derive(Debug, Clone, Default)]
pub struct ErrorChain {
    records: Vec<ErrorRecord>,
}

impl ErrorChain {
    pub fn new(records: Vec<ErrorRecord>) -> Self {
        Self { records }
    }

    /// Build a chain by walking an error's `source()` links.
    ///
    /// The concrete type name is only known for the outermost error; inner
    /// causes surface as plain `Error` records. Hosts wanting full per-cause
    /// detail construct the records explicitly.
    pub fn from_error<E: std::error::Error + ?Sized>(error: &E) -> Self {
        let mut records = vec![ErrorRecord::new(
            std::any::type_name::<E>(),
            error.to_string(),
        )];
        let mut source = error.source();
        while let Some(cause) = source {
            records.push(ErrorRecord::new("Error", cause.to_string()));
            source = cause.source();
        }
        Self { records }
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Selects the response serialization format from the request's `Accept`
/// header. The header is scanned in client order and the first recognized
/// media type wins; a missing or unrecognized preference defaults to HTML.
pub fn determine_content_type(request: &AppRequest) -> &'static str {
    const KNOWN: [&str; 4] = [APPLICATION_JSON, APPLICATION_XML, TEXT_XML, TEXT_HTML];

    if let Some(accept) = accept_header(request) {
        for part in accept.split(',') {
            let media = part.split(';').next().unwrap_or("").trim();
            for known in KNOWN {
                if media.eq_ignore_ascii_case(known) {
                    return known;
                }
            }
        }
    }

    TEXT_HTML
}

/// HTML-entity escaping for free-text fields embedded in HTML output.
pub(crate) fn escape_html(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Returns a CDATA section with the given content.
///
/// A literal `]]>` inside the content would terminate the section early; it
/// is escaped by splitting into two adjacent CDATA sections so the output
/// stays well-formed for any input.
pub(crate) fn cdata_section(content: &str) -> String {
    format!("<![CDATA[{}]]>", content.replace("]]>", "]]]]><![CDATA[>"))
}
