//! Template route handler

use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use log::debug;

use crate::core::{AppError, AppRequest, AppResponse, AppResult, ComponentRegistry, ErrorContext};

use super::TemplateRouteConfig;

/// Dispatches one template route: resolves the template controller,
/// initializes it with the request, applies route data, and wraps the
/// rendered document in an HTML response.
pub struct TemplateRoute {
    config: TemplateRouteConfig,
}

impl TemplateRoute {
    pub fn new(config: TemplateRouteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TemplateRouteConfig {
        &self.config
    }

    pub fn handle(
        &self,
        registry: &ComponentRegistry,
        request: &AppRequest,
        response: AppResponse,
    ) -> AppResult<AppResponse> {
        let ident = self.config.template_ident();
        debug!(
            "Dispatching template route '{}' to template '{}'",
            self.config.route.ident(),
            ident
        );

        let mut template = registry.create_template(ident)?;
        if !template.init(request) {
            return Err(AppError::Action(format!(
                "Template '{ident}' failed to initialize"
            )));
        }
        template.set_data(&self.config.template_data)?;
        let html = template
            .render()
            .with_context(&format!("Failed to render template '{ident}'"))?;

        let (mut parts, _) = response.into_parts();
        parts.status = StatusCode::OK;
        parts
            .headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        Ok(AppResponse::from_parts(parts, Bytes::from(html)))
    }
}
